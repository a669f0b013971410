//! Client share and register operations.

use crate::{
    errors::{slot_error, NodeError},
    ops::parse_share_name,
    state::{slots::ShareKind, NodeState},
    wire,
};
use shamir_sharing::party::PartyId;

/// Stores a client's share; each client can submit exactly once.
pub fn put_client_share(state: &mut NodeState, client_id: u64, share_hex: &str) -> Result<(), NodeError> {
    let field = state.parameters()?.field();
    let share = wire::decode(share_hex).map_err(|error| NodeError::bad_request(error.to_string()))?;
    let share = field.element(&share);
    if state.client_share(client_id).is_some() {
        return Err(NodeError::bad_request("shares already set for this client"));
    }
    state.client_shares.push((client_id, share));
    Ok(())
}

/// Writes a named scratch register.
pub fn set_share(state: &mut NodeState, name: &str, value_hex: &str) -> Result<(), NodeError> {
    let share_name = parse_share_name(name)?;
    let field = state.parameters()?.field();
    let value = wire::decode(value_hex).map_err(|error| NodeError::bad_request(error.to_string()))?;
    let value = field.element(&value);
    state.registers.set(&share_name, value);
    Ok(())
}

/// The client ids that have submitted shares, in insertion order.
pub fn bidders(state: &NodeState) -> Result<wire::Bidders, NodeError> {
    state.parameters()?;
    Ok(wire::Bidders { bidders: state.client_shares.iter().map(|(id, _)| *id).collect() })
}

/// Stores a share received from a peer (peer-facing).
///
/// The transport decides whether the request comes from a trusted peer;
/// untrusted requests are rejected before any state is consulted. A slot
/// that is already filled rejects the write, which makes inbound messages
/// idempotent at the transport level.
pub fn receive_share(
    state: &mut NodeState,
    kind: ShareKind,
    sender_id: u32,
    value_hex: &str,
    trusted: bool,
) -> Result<(), NodeError> {
    if !trusted {
        return Err(NodeError::Unauthorized);
    }
    let field = state.parameters()?.field().clone();
    let sender = PartyId::new(sender_id).map_err(|_| NodeError::bad_request("invalid party id"))?;
    let value = wire::decode(value_hex).map_err(|error| NodeError::bad_request(error.to_string()))?;
    let value = field.element(&value);
    state.slots_mut(kind).receive(sender, value).map_err(|error| slot_error(kind, error))?;
    tracing::debug!(kind = %kind, sender = %sender, "peer share received");
    Ok(())
}
