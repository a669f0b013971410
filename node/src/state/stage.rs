//! Round stage labels.

use strum::Display;

/// The node's position within a multiplication round group.
///
/// The label is reporting surface; operations gate on their concrete
/// preconditions and only the round transitions consult the stage itself.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum RoundStage {
    /// Protocol parameters have not been set.
    #[default]
    #[strum(serialize = "not-initialized")]
    NotInitialized,

    /// Parameters are set and no round is in flight.
    #[strum(serialize = "initialized")]
    Initialized,

    /// Round Q dispatched its shares.
    #[strum(serialize = "q-distributed")]
    QDistributed,

    /// Round R dispatched its shares.
    #[strum(serialize = "r-distributed")]
    RDistributed,

    /// The multiplicative share has been folded.
    #[strum(serialize = "share-calculated")]
    ShareCalculated,
}
