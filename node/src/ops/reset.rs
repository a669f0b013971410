//! Reset operations.

use crate::{errors::NodeError, state::NodeState};

/// Clears the transient primitive results and the round buffers, returning
/// the node to the start of a round group.
pub fn reset_calculation(state: &mut NodeState) -> Result<(), NodeError> {
    state.parameters()?;
    state.clear_calculation();
    tracing::debug!("calculation reset");
    Ok(())
}

/// Additionally clears the comparison tables, the random-number shares, and
/// the whole register file. Client shares survive.
pub fn reset_comparison(state: &mut NodeState) -> Result<(), NodeError> {
    state.parameters()?;
    state.clear_comparison();
    tracing::debug!("comparison reset");
    Ok(())
}

/// Wipes everything including the protocol parameters.
pub fn factory_reset(state: &mut NodeState) {
    state.wipe();
    tracing::info!("factory reset");
}
