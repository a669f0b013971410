//! Additive and XOR primitives.

use crate::{
    errors::NodeError,
    ops::{operand_values, parse_share_name},
    state::NodeState,
};
use num_bigint::BigUint;

/// Computes the additive share of two named operands.
pub fn calculate_additive_share(
    state: &mut NodeState,
    first_name: &str,
    second_name: &str,
) -> Result<(), NodeError> {
    let field = state.parameters()?.field().clone();
    let (first, second) = operand_values(state, first_name, second_name)?;
    state.additive_share = Some(field.add(&first, &second));
    Ok(())
}

/// Copies the additive share into a named register.
pub fn commit_additive_share(state: &mut NodeState, name: &str) -> Result<(), NodeError> {
    let share_name = parse_share_name(name)?;
    let share = state.additive_share.clone().ok_or_else(|| NodeError::not_initialized("additive_share"))?;
    state.registers.set(&share_name, share);
    Ok(())
}

/// Computes the XOR share from the preceding Add and Multiply results.
///
/// On shared bits, `[a ^ b] = [a] + [b] - 2 * [a * b] mod p`.
pub fn calculate_xor_share(state: &mut NodeState) -> Result<(), NodeError> {
    let field = state.parameters()?.field().clone();
    let additive = state.additive_share.clone().ok_or_else(|| NodeError::not_initialized("additive_share"))?;
    let multiplicative =
        state.multiplicative_share.clone().ok_or_else(|| NodeError::not_initialized("multiplicative_share"))?;
    let twice = field.add(&multiplicative, &multiplicative);
    state.xor_share = Some(field.sub(&additive, &twice));
    Ok(())
}

/// Copies the XOR share into a named register.
pub fn commit_xor_share(state: &mut NodeState, name: &str) -> Result<(), NodeError> {
    let share_name = parse_share_name(name)?;
    let share: BigUint = state.xor_share.clone().ok_or_else(|| NodeError::not_initialized("xor_share"))?;
    state.registers.set(&share_name, share);
    Ok(())
}
