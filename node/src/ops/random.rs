//! Shared random element, random bit, and random integer operations.

use crate::{
    errors::{slot_error, NodeError},
    state::{registers::ShareName, slots::ShareKind, NodeState},
    transport::{distribute_shares, DispatchReport, PeerClient},
};
use math_lib::random::secure_randint;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use shamir_sharing::protocol::PolyDegree;
use std::time::Duration;

/// Distributes shares of a locally drawn uniform nonzero element.
///
/// The sum of all parties' contributions is the shared element `u` used by
/// the square-root random-bit construction.
pub async fn redistribute_u(
    state: &mut NodeState,
    peers: &dyn PeerClient,
    deadline: Duration,
) -> Result<DispatchReport, NodeError> {
    let parameters = state.parameters()?.clone();
    let upper = parameters.field().prime() - BigUint::one();
    let secret = secure_randint(&BigUint::one(), &upper).map_err(|error| NodeError::Internal(error.to_string()))?;

    let shamir = parameters.shamir()?;
    let shares =
        shamir.generate_shares(&secret, PolyDegree::T).map_err(|error| NodeError::Internal(error.to_string()))?;
    let values: Vec<BigUint> = shares.into_iter().map(|(_, value)| value).collect();

    let own = values.get(parameters.id().index()).cloned().ok_or_else(|| {
        NodeError::Internal("own u share missing from the generated sharing".into())
    })?;
    state.shared_u.receive(parameters.id(), own).map_err(|error| slot_error(ShareKind::U, error))?;

    tracing::debug!(id = %parameters.id(), "distributing u shares");
    Ok(distribute_shares(peers, &parameters, ShareKind::U, &values, deadline).await)
}

/// Folds the received `u` contributions into the shared element register.
pub fn calculate_shared_u(state: &mut NodeState) -> Result<(), NodeError> {
    let field = state.parameters()?.field().clone();
    let mut sum = BigUint::zero();
    for value in state.shared_u.values().map_err(|error| slot_error(ShareKind::U, error))? {
        sum = field.add(&sum, value);
    }
    state.registers.set(&ShareName::U, sum);
    Ok(())
}

/// Stores the freshly generated bit share at the given bit position.
///
/// The bit share is taken from the `temporary_random_bit` register, where
/// the orchestrator committed the final multiplication of the square-root
/// construction.
pub fn store_random_number_bit(state: &mut NodeState, index: usize) -> Result<(), NodeError> {
    let bit = state
        .registers
        .get(&ShareName::Scratch("temporary_random_bit".into()))
        .cloned()
        .ok_or_else(|| NodeError::not_initialized("temporary_random_bit"))?;
    if state.random_number_bit_shares.len() <= index {
        state.random_number_bit_shares.resize(index + 1, None);
    }
    if let Some(slot) = state.random_number_bit_shares.get_mut(index) {
        *slot = Some(bit);
    }
    Ok(())
}

/// Aggregates the bit shares into the shared random integer.
///
/// `[r] = sum_i 2^i * [r_i] mod p`, little-endian over the stored bits.
pub fn calculate_random_number_share(state: &mut NodeState) -> Result<(), NodeError> {
    let field = state.parameters()?.field().clone();
    if state.random_number_bit_shares.is_empty() {
        return Err(NodeError::not_initialized("random_number_bit_shares"));
    }
    let mut sum = BigUint::zero();
    for (index, bit) in state.random_number_bit_shares.iter().enumerate() {
        let bit = bit
            .as_ref()
            .ok_or_else(|| NodeError::not_initialized(format!("random_number_bit_shares[{index}]")))?;
        let weight = field.two_pow(index as u64);
        sum = field.add(&sum, &field.mul(&weight, bit));
    }
    state.random_number_share = Some(sum);
    Ok(())
}
