//! Named share registers.

use num_bigint::BigUint;
use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;

/// A resolvable share name.
///
/// The protocol registers are a fixed set; anything else the orchestrator
/// names lands in the scratch map. The raw input buffers (`client_shares`,
/// `shared_q`, `shared_r`, `shared_u`) are not share names at all, which is
/// what keeps them out of reach of the reconstruction endpoints.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ShareName {
    /// The aggregated shared random element.
    U,

    /// The squared shared random element.
    V,

    /// The masked comparison operand.
    ComparisonA,

    /// The romb accumulator low word.
    Z,

    /// The romb accumulator high word.
    CapZ,

    /// Romb operand `x`.
    X,

    /// Romb operand `X`.
    CapX,

    /// Romb operand `y`.
    Y,

    /// Romb operand `Y`.
    CapY,

    /// The clear `l`-th bit of the opened comparison operand.
    AL,

    /// The share of the `l`-th random bit.
    RL,

    /// The comparison result share.
    Res,

    /// An orchestrator-defined scratch register.
    Scratch(String),
}

impl FromStr for ShareName {
    type Err = InvalidShareName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        const RESERVED: [&str; 4] = ["client_shares", "shared_q", "shared_r", "shared_u"];
        let parsed = match name {
            "u" => Self::U,
            "v" => Self::V,
            "comparison_a" => Self::ComparisonA,
            "z" => Self::Z,
            "Z" => Self::CapZ,
            "x" => Self::X,
            "X" => Self::CapX,
            "y" => Self::Y,
            "Y" => Self::CapY,
            "a_l" => Self::AL,
            "r_l" => Self::RL,
            "res" => Self::Res,
            other if other.is_empty() || RESERVED.contains(&other) => {
                return Err(InvalidShareName(name.into()));
            }
            other => Self::Scratch(other.into()),
        };
        Ok(parsed)
    }
}

impl fmt::Display for ShareName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U => "u",
            Self::V => "v",
            Self::ComparisonA => "comparison_a",
            Self::Z => "z",
            Self::CapZ => "Z",
            Self::X => "x",
            Self::CapX => "X",
            Self::Y => "y",
            Self::CapY => "Y",
            Self::AL => "a_l",
            Self::RL => "r_l",
            Self::Res => "res",
            Self::Scratch(other) => other,
        };
        write!(f, "{name}")
    }
}

/// The name is empty or reserved for a raw input buffer.
#[derive(Error, Debug, Eq, PartialEq)]
#[error("`{0}` is not a valid share name")]
pub struct InvalidShareName(String);

/// The register file: fixed protocol slots plus orchestrator scratch.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    u: Option<BigUint>,
    v: Option<BigUint>,
    comparison_a: Option<BigUint>,
    z: Option<BigUint>,
    cap_z: Option<BigUint>,
    x: Option<BigUint>,
    cap_x: Option<BigUint>,
    y: Option<BigUint>,
    cap_y: Option<BigUint>,
    a_l: Option<BigUint>,
    r_l: Option<BigUint>,
    res: Option<BigUint>,
    scratch: BTreeMap<String, BigUint>,
}

impl Registers {
    /// The value of a register, if set.
    pub fn get(&self, name: &ShareName) -> Option<&BigUint> {
        match name {
            ShareName::U => self.u.as_ref(),
            ShareName::V => self.v.as_ref(),
            ShareName::ComparisonA => self.comparison_a.as_ref(),
            ShareName::Z => self.z.as_ref(),
            ShareName::CapZ => self.cap_z.as_ref(),
            ShareName::X => self.x.as_ref(),
            ShareName::CapX => self.cap_x.as_ref(),
            ShareName::Y => self.y.as_ref(),
            ShareName::CapY => self.cap_y.as_ref(),
            ShareName::AL => self.a_l.as_ref(),
            ShareName::RL => self.r_l.as_ref(),
            ShareName::Res => self.res.as_ref(),
            ShareName::Scratch(key) => self.scratch.get(key),
        }
    }

    /// Writes a register, overwriting any previous value.
    pub fn set(&mut self, name: &ShareName, value: BigUint) {
        match name {
            ShareName::U => self.u = Some(value),
            ShareName::V => self.v = Some(value),
            ShareName::ComparisonA => self.comparison_a = Some(value),
            ShareName::Z => self.z = Some(value),
            ShareName::CapZ => self.cap_z = Some(value),
            ShareName::X => self.x = Some(value),
            ShareName::CapX => self.cap_x = Some(value),
            ShareName::Y => self.y = Some(value),
            ShareName::CapY => self.cap_y = Some(value),
            ShareName::AL => self.a_l = Some(value),
            ShareName::RL => self.r_l = Some(value),
            ShareName::Res => self.res = Some(value),
            ShareName::Scratch(key) => {
                self.scratch.insert(key.clone(), value);
            }
        }
    }

    /// Clears every register including the scratch map.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("client_shares")]
    #[case("shared_q")]
    #[case("shared_r")]
    #[case("shared_u")]
    #[case("")]
    fn reserved_names(#[case] name: &str) {
        assert!(name.parse::<ShareName>().is_err());
    }

    #[rstest]
    #[case("z", ShareName::Z)]
    #[case("Z", ShareName::CapZ)]
    #[case("a_l", ShareName::AL)]
    #[case("first_bid", ShareName::Scratch("first_bid".into()))]
    fn parsing(#[case] name: &str, #[case] expected: ShareName) {
        assert_eq!(name.parse::<ShareName>().unwrap(), expected);
    }

    #[test]
    fn fixed_and_scratch_are_disjoint() {
        let mut registers = Registers::default();
        registers.set(&ShareName::Z, BigUint::from(1u32));
        registers.set(&ShareName::Scratch("z_backup".into()), BigUint::from(2u32));
        assert_eq!(registers.get(&ShareName::Z), Some(&BigUint::from(1u32)));
        assert_eq!(registers.get(&ShareName::Scratch("z_backup".into())), Some(&BigUint::from(2u32)));
        assert_eq!(registers.get(&ShareName::Scratch("z".into())), None);
    }

    #[test]
    fn clear_wipes_everything() {
        let mut registers = Registers::default();
        registers.set(&ShareName::Res, BigUint::from(1u32));
        registers.set(&ShareName::Scratch("w_inverse".into()), BigUint::from(2u32));
        registers.clear();
        assert_eq!(registers, Registers::default());
    }
}
