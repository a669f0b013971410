//! Node error kinds.

use crate::state::{
    slots::{ShareKind, SlotError},
    stage::RoundStage,
};
use math_lib::matrix::MatrixError;
use thiserror::Error;

/// An error from a node operation.
///
/// Precondition failures leave the node state untouched; the caller can
/// correct the request and retry without resetting.
#[derive(Error, Debug)]
pub enum NodeError {
    /// The operation is invalid in the current round stage.
    #[error("operation invalid in stage `{0}`")]
    BadState(RoundStage),

    /// A required field is not initialized yet.
    #[error("{0} is not initialized")]
    NotInitialized(String),

    /// A field that can only be set once is already initialized.
    #[error("{0} is already initialized")]
    AlreadyInitialized(&'static str),

    /// Malformed input, invalid sender id, or an invalid share name.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The trust gate rejected the caller.
    #[error("caller is not authorized to access this resource")]
    Unauthorized,

    /// A peer share slot was already filled by an earlier message.
    #[error("{0} is already set from this party")]
    AlreadySet(ShareKind),

    /// The degree-reduction matrix cannot be derived from the current
    /// parameters; only a factory reset clears this.
    #[error("matrix is not invertible mod p")]
    Singular,

    /// Any other matrix computation failure.
    #[error("matrix error: {0}")]
    Matrix(MatrixError),

    /// A required peer did not return a usable response.
    #[error("peer failure: {0}")]
    PeerFailure(String),

    /// Invariant violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NodeError {
    /// Shorthand for a [`NodeError::NotInitialized`] over a named field.
    pub(crate) fn not_initialized(field: impl Into<String>) -> Self {
        Self::NotInitialized(field.into())
    }

    /// Shorthand for a [`NodeError::BadRequest`] with a detail message.
    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest(detail.into())
    }
}

impl From<MatrixError> for NodeError {
    fn from(error: MatrixError) -> Self {
        match error {
            MatrixError::Singular => NodeError::Singular,
            other => NodeError::Matrix(other),
        }
    }
}

/// Slot errors keep the offending kind so the duplicate-share guard can
/// name the round it fired in.
pub(crate) fn slot_error(kind: ShareKind, error: SlotError) -> NodeError {
    match error {
        SlotError::InvalidSender => NodeError::bad_request("invalid party id"),
        SlotError::AlreadySet => NodeError::AlreadySet(kind),
        SlotError::NotFull => NodeError::bad_request(format!("shared_{kind} is not fully populated")),
    }
}
