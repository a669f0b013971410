//! Wire formats at the node boundary.
//!
//! Field elements are exchanged as `0x`-prefixed lowercase hex strings;
//! any base-16 integer literal the transport parses is accepted, including
//! digit-grouping underscores.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encodes a field element for the wire.
pub fn encode(value: &BigUint) -> String {
    format!("{value:#x}")
}

/// Decodes a field element from a hex literal.
pub fn decode(text: &str) -> Result<BigUint, MalformedFieldElement> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return Err(MalformedFieldElement(text.into()));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| MalformedFieldElement(text.into()))
}

/// A value that could not be parsed as a base-16 integer literal.
#[derive(Error, Debug, Eq, PartialEq)]
#[error("`{0}` is not a base-16 field element")]
pub struct MalformedFieldElement(String);

/// A round share delivered from one peer to another.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeerShare {
    /// The sender's party id.
    pub party_id: u32,

    /// The hex-encoded share value.
    pub value: String,
}

/// A peer's answer to a reconstruction request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReturnedShare {
    /// The responder's party id.
    pub id: u32,

    /// The hex-encoded local value of the requested share.
    pub value: String,
}

/// The node's configured protocol parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitialValues {
    /// The corruption threshold.
    pub t: u32,

    /// The number of parties.
    pub n: u32,

    /// The hex-encoded prime.
    pub p: String,

    /// The ordered peer endpoints.
    pub parties: Vec<String>,
}

/// The client ids that have submitted shares, in insertion order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bidders {
    /// Unique client identifiers.
    pub bidders: Vec<u64>,
}
