//! Opening a named share across the network.

use crate::{
    errors::NodeError,
    ops::parse_share_name,
    state::NodeState,
    transport::{fetch_share, PeerClient},
    wire,
};
use num_bigint::BigUint;
use rand::seq::SliceRandom;
use shamir_sharing::party::PartyId;
use std::time::Duration;

/// Returns this node's value of a named share (peer-facing).
///
/// The raw input buffers are not valid share names, so requests for
/// `client_shares`, `shared_q`, `shared_r`, or `shared_u` are rejected
/// before any lookup happens; opening them would leak secrets.
pub fn return_share_to_reconstruct(
    state: &NodeState,
    name: &str,
    trusted: bool,
) -> Result<wire::ReturnedShare, NodeError> {
    if !trusted {
        return Err(NodeError::Unauthorized);
    }
    let parameters = state.parameters()?;
    let share_name = parse_share_name(name)?;
    let value = state
        .registers
        .get(&share_name)
        .ok_or_else(|| NodeError::not_initialized(format!("share `{share_name}`")))?;
    Ok(wire::ReturnedShare { id: parameters.id().get(), value: wire::encode(value) })
}

/// Reconstructs the secret behind a named share.
///
/// Draws `t - 1` peers uniformly from the other `n - 1`, collects their
/// local values under the deadline, appends this node's own point, and
/// interpolates at zero.
pub async fn reconstruct_share(
    state: &NodeState,
    peers: &dyn PeerClient,
    name: &str,
    deadline: Duration,
) -> Result<BigUint, NodeError> {
    let parameters = state.parameters()?;
    let share_name = parse_share_name(name)?;
    let own_value = state
        .registers
        .get(&share_name)
        .cloned()
        .ok_or_else(|| NodeError::not_initialized(format!("share `{share_name}`")))?;

    let own_index = parameters.id().index();
    let other_indices: Vec<usize> =
        (0..parameters.party_count() as usize).filter(|index| *index != own_index).collect();
    let responders = parameters.threshold().saturating_sub(1) as usize;
    let selected: Vec<usize> =
        other_indices.choose_multiple(&mut rand::thread_rng(), responders).cloned().collect();
    if selected.len() != responders {
        return Err(NodeError::Internal("not enough peers to reconstruct from".into()));
    }

    let mut points: Vec<(PartyId, BigUint)> = Vec::with_capacity(responders + 1);
    for index in selected {
        let endpoint = parameters
            .parties()
            .get(index)
            .ok_or_else(|| NodeError::Internal("peer index out of range".into()))?;
        let returned = fetch_share(peers, endpoint, name, deadline)
            .await
            .map_err(|error| NodeError::PeerFailure(format!("peer {}: {error}", index + 1)))?;
        let party = PartyId::new(returned.id)
            .ok()
            .filter(|party| party.get() <= parameters.party_count())
            .ok_or_else(|| NodeError::PeerFailure(format!("peer {} returned an invalid id", index + 1)))?;
        let value = wire::decode(&returned.value)
            .map_err(|error| NodeError::PeerFailure(format!("peer {}: {error}", index + 1)))?;
        points.push((party, parameters.field().element(&value)));
    }
    points.push((parameters.id(), own_value));

    let shamir = parameters.shamir()?;
    let secret = shamir.recover_secret(points).map_err(|error| NodeError::PeerFailure(error.to_string()))?;
    tracing::debug!(share = %share_name, "share reconstructed");
    Ok(secret)
}
