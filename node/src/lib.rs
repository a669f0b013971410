//! Participant node engine for a secure multi-party computation protocol
//! over a prime field.
//!
//! The crate implements the node-side protocol state machine: the share
//! store, the degree-reduction multiplication rounds, the additive/XOR
//! primitives, random bit and random integer generation, the bit-level
//! comparison circuit, and Lagrange reconstruction across peers. Transport,
//! authentication, and orchestration live outside; they drive the node
//! through the operations in [`ops`] and deliver peer traffic through the
//! [`transport::PeerClient`] trait.
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::iterator_step_by_zero,
    clippy::invalid_regex,
    clippy::string_slice,
    clippy::unimplemented,
    clippy::todo
)]

pub mod errors;
pub mod ops;
pub mod state;
pub mod transport;
pub mod wire;
