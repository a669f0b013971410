//! The node's operation surface.
//!
//! Each operation maps to one request the transport layer exposes. All of
//! them take the node state (exclusively, matching the single-writer
//! ownership model) and enforce their preconditions before touching it, so
//! a failed call leaves the state exactly as it was.

pub mod additive;
pub mod comparison;
pub mod init;
pub mod multiplication;
pub mod random;
pub mod reconstruction;
pub mod reset;
pub mod shares;

use crate::{
    errors::NodeError,
    state::{registers::ShareName, NodeState},
};
use num_bigint::BigUint;

/// Parses a share name, mapping reserved names to a request error.
pub(crate) fn parse_share_name(name: &str) -> Result<ShareName, NodeError> {
    name.parse().map_err(|error: crate::state::registers::InvalidShareName| NodeError::bad_request(error.to_string()))
}

/// Looks up two operand registers by name.
pub(crate) fn operand_values(
    state: &NodeState,
    first_name: &str,
    second_name: &str,
) -> Result<(BigUint, BigUint), NodeError> {
    let first = state.registers.get(&parse_share_name(first_name)?);
    let second = state.registers.get(&parse_share_name(second_name)?);
    match (first, second) {
        (Some(first), Some(second)) => Ok((first.clone(), second.clone())),
        _ => Err(NodeError::bad_request("invalid share names provided")),
    }
}
