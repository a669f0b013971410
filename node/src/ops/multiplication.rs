//! The two-round degree-reduction multiplication protocol.

use crate::{
    errors::{slot_error, NodeError},
    ops::{operand_values, parse_share_name},
    state::{slots::ShareKind, stage::RoundStage, NodeState},
    transport::{distribute_shares, DispatchReport, PeerClient},
};
use num_bigint::BigUint;
use num_traits::Zero;
use shamir_sharing::protocol::PolyDegree;
use std::time::Duration;

/// Round Q: distributes a fresh degree-`2t` zero sharing.
///
/// The sum of all parties' `q` sharings cancels the degree-`2t` cross term
/// of the local products in Round R.
pub async fn redistribute_q(
    state: &mut NodeState,
    peers: &dyn PeerClient,
    deadline: Duration,
) -> Result<DispatchReport, NodeError> {
    let parameters = state.parameters()?.clone();
    state.require_stage(RoundStage::Initialized)?;

    let shamir = parameters.shamir()?;
    let shares = shamir
        .generate_shares(&BigUint::zero(), PolyDegree::TwoT)
        .map_err(|error| NodeError::Internal(error.to_string()))?;
    let values: Vec<BigUint> = shares.into_iter().map(|(_, value)| value).collect();

    let own = values.get(parameters.id().index()).cloned().ok_or_else(|| {
        NodeError::Internal("own q share missing from the generated sharing".into())
    })?;
    state.shared_q.receive(parameters.id(), own).map_err(|error| slot_error(ShareKind::Q, error))?;

    tracing::debug!(id = %parameters.id(), "distributing q shares");
    let report = distribute_shares(peers, &parameters, ShareKind::Q, &values, deadline).await;
    state.set_stage(RoundStage::QDistributed);
    Ok(report)
}

/// Round R: reduces the degree of the named operands' product sharing.
pub async fn redistribute_r(
    state: &mut NodeState,
    peers: &dyn PeerClient,
    first_name: &str,
    second_name: &str,
    deadline: Duration,
) -> Result<DispatchReport, NodeError> {
    let (first, second) = {
        state.parameters()?;
        state.reduction_matrix()?;
        state.require_stage(RoundStage::QDistributed)?;
        operand_values(state, first_name, second_name)?
    };
    let field = state.parameters()?.field().clone();
    let product = field.mul(&first, &second);
    run_round_r(state, peers, product, deadline).await
}

/// Shared Round-R core: projects `product + sum(q)` through this node's row
/// of `A` and distributes the per-peer points.
pub(crate) async fn run_round_r(
    state: &mut NodeState,
    peers: &dyn PeerClient,
    product: BigUint,
    deadline: Duration,
) -> Result<DispatchReport, NodeError> {
    let parameters = state.parameters()?.clone();
    state.reduction_matrix()?;
    state.require_stage(RoundStage::QDistributed)?;

    let field = parameters.field();
    let mut masked = product;
    for q in state.shared_q.values().map_err(|error| slot_error(ShareKind::Q, error))? {
        masked = field.add(&masked, q);
    }

    let n = parameters.party_count() as usize;
    let own_index = parameters.id().index();
    let matrix = state.reduction_matrix()?;
    let mut values = Vec::with_capacity(n);
    for i in 0..n {
        values.push(field.mul(&masked, matrix.entry(own_index, i)?));
    }

    let own = values.get(own_index).cloned().ok_or_else(|| {
        NodeError::Internal("own r share missing from the projected sharing".into())
    })?;
    state.shared_r.receive(parameters.id(), own).map_err(|error| slot_error(ShareKind::R, error))?;

    tracing::debug!(id = %parameters.id(), "distributing r shares");
    let report = distribute_shares(peers, &parameters, ShareKind::R, &values, deadline).await;
    state.set_stage(RoundStage::RDistributed);
    Ok(report)
}

/// Finalize: folds the received `r` shares into the multiplicative share.
pub fn calculate_multiplicative_share(state: &mut NodeState) -> Result<(), NodeError> {
    let field = state.parameters()?.field().clone();
    state.require_stage(RoundStage::RDistributed)?;
    let mut sum = BigUint::zero();
    for value in state.shared_r.values().map_err(|error| slot_error(ShareKind::R, error))? {
        sum = field.add(&sum, value);
    }
    state.multiplicative_share = Some(sum);
    state.set_stage(RoundStage::ShareCalculated);
    Ok(())
}

/// Copies the multiplicative share into a named register.
pub fn commit_multiplicative_share(state: &mut NodeState, name: &str) -> Result<(), NodeError> {
    let share_name = parse_share_name(name)?;
    let share = state
        .multiplicative_share
        .clone()
        .ok_or_else(|| NodeError::not_initialized("multiplicative_share"))?;
    state.registers.set(&share_name, share);
    Ok(())
}
