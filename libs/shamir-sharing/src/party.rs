//! Party identifiers.

use num_bigint::BigUint;
use std::fmt;
use thiserror::Error;

/// A 1-based party identifier.
///
/// The identifier doubles as the party's polynomial abscissa, so party `i`
/// always holds the share `f(i)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PartyId(u32);

impl PartyId {
    /// Constructs a party id, rejecting the reserved abscissa zero.
    pub fn new(id: u32) -> Result<Self, InvalidPartyId> {
        if id == 0 {
            return Err(InvalidPartyId);
        }
        Ok(Self(id))
    }

    /// The raw identifier.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The zero-based position of this party in the ordered peer list.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The abscissa this party's shares are evaluated at.
    pub fn abscissa(self) -> BigUint {
        BigUint::from(self.0)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Party id zero is reserved for the secret itself.
#[derive(Error, Debug, Eq, PartialEq)]
#[error("party ids are 1-based")]
pub struct InvalidPartyId;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(PartyId::new(0), Err(InvalidPartyId));
    }

    #[test]
    fn index_and_abscissa() {
        let party = PartyId::new(3).unwrap();
        assert_eq!(party.index(), 2);
        assert_eq!(party.abscissa(), BigUint::from(3u32));
    }
}
