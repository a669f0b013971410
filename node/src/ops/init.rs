//! Initialization operations.

use crate::{
    errors::NodeError,
    state::{stage::RoundStage, NodeState},
    wire,
};
use math_lib::{matrix::Matrix, modular::PrimeField};
use num_bigint::BigUint;
use shamir_sharing::party::PartyId;

/// Sets the node's protocol parameters.
///
/// `t` and `n` are inferred from the configured peer list: `n` is its
/// length and `t = (n - 1) / 2`, rejected unless `n = 2t + 1` holds.
pub fn set_initial_values(
    state: &mut NodeState,
    id: u32,
    prime_hex: &str,
    parties: Vec<String>,
) -> Result<(), NodeError> {
    let id = PartyId::new(id).map_err(|_| NodeError::bad_request("invalid party id"))?;
    let prime = wire::decode(prime_hex).map_err(|error| NodeError::bad_request(error.to_string()))?;
    let field = PrimeField::new(prime).map_err(|_| NodeError::bad_request("prime number must be positive"))?;
    state.initialize(id, field, parties)?;
    tracing::info!(id = %id, "initial protocol values set");
    Ok(())
}

/// Returns the currently configured parameters.
pub fn initial_values(state: &NodeState) -> Result<wire::InitialValues, NodeError> {
    let parameters = state.parameters()?;
    Ok(wire::InitialValues {
        t: parameters.threshold(),
        n: parameters.party_count(),
        p: wire::encode(parameters.field().prime()),
        parties: parameters.parties().to_vec(),
    })
}

/// Derives the degree-reduction matrix `A = B^-1 * P * B mod p`.
///
/// `B[j][k] = (k+1)^j` and `P` projects onto the first `t` coordinates, so
/// `A` maps a vector of point evaluations onto the evaluations of its
/// threshold-degree truncation.
pub fn compute_reduction_matrix(state: &mut NodeState) -> Result<(), NodeError> {
    if state.reduction_matrix().is_ok() {
        return Err(NodeError::AlreadyInitialized("A"));
    }
    let parameters = state.parameters()?;
    let field = parameters.field();
    let n = parameters.party_count() as usize;
    let abscissas: Vec<BigUint> = (1..=n as u32).map(BigUint::from).collect();

    let powers = Matrix::vandermonde(&abscissas, n, field)?.transpose()?;
    let inverse = powers.inverse(field)?;
    let projection = Matrix::projection(n, parameters.threshold() as usize)?;
    let reduction = inverse.mul(&projection, field)?.mul(&powers, field)?;

    state.set_reduction_matrix(reduction)?;
    tracing::debug!(n, "degree-reduction matrix computed");
    Ok(())
}

/// The node's current state-machine label.
pub fn status(state: &NodeState) -> RoundStage {
    state.stage()
}
