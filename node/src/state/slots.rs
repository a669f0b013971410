//! Incoming peer share buffers.

use num_bigint::BigUint;
use shamir_sharing::party::PartyId;
use std::fmt;

/// The per-round share kinds a node receives from its peers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShareKind {
    /// Degree-reduction randomization shares.
    Q,

    /// Projected product shares.
    R,

    /// Shared random element contributions.
    U,
}

impl fmt::Display for ShareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShareKind::Q => "q",
            ShareKind::R => "r",
            ShareKind::U => "u",
        };
        write!(f, "{name}")
    }
}

/// An `n`-slot buffer of incoming shares, indexed by sender id minus one.
///
/// Each slot transitions monotonically from empty to a single value within
/// a round; the first write wins and later writes are rejected, which is
/// the replay/duplication guard for inbound peer messages.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SlotArray {
    slots: Vec<Option<BigUint>>,
}

impl SlotArray {
    /// Constructs an empty buffer with one slot per party.
    pub fn new(parties: usize) -> Self {
        Self { slots: vec![None; parties] }
    }

    /// The number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the buffer has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Stores the share sent by `sender`, first write wins.
    pub fn receive(&mut self, sender: PartyId, value: BigUint) -> Result<(), SlotError> {
        let slot = self.slots.get_mut(sender.index()).ok_or(SlotError::InvalidSender)?;
        if slot.is_some() {
            return Err(SlotError::AlreadySet);
        }
        *slot = Some(value);
        Ok(())
    }

    /// The share at the given zero-based index, if received.
    pub fn get(&self, index: usize) -> Option<&BigUint> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Whether every slot has received its share.
    pub fn is_full(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(Option::is_some)
    }

    /// All received values in slot order; fails unless the buffer is full.
    pub fn values(&self) -> Result<Vec<&BigUint>, SlotError> {
        self.slots.iter().map(|slot| slot.as_ref().ok_or(SlotError::NotFull)).collect()
    }

    /// Empties every slot, keeping the size.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

/// An error writing into a slot buffer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SlotError {
    /// The sender id does not map to a slot.
    InvalidSender,

    /// The slot already holds a share from this sender.
    AlreadySet,

    /// A read required a fully populated buffer.
    NotFull,
}
