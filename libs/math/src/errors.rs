//! Crate errors.

use thiserror::Error;

/// The element has no inverse under the current modulus.
#[derive(Error, Debug, Eq, PartialEq)]
#[error("element is not invertible under this modulus")]
pub struct NotInvertible;

/// Failed interpolation error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum InterpolationError {
    /// Empty point sequence.
    #[error("empty point sequence")]
    EmptySequence,

    /// The point sequence has duplicate abscissas.
    #[error("point sequence has duplicate abscissas")]
    DuplicateAbscissas,

    /// A Lagrange denominator was not invertible.
    #[error("lagrange coefficient error: {0}")]
    Coefficient(#[from] NotInvertible),
}
