//! Arithmetic modulo a runtime prime.

pub mod sqrt;

pub use sqrt::SqrtError;

use crate::errors::NotInvertible;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use thiserror::Error;

/// A prime field defined by a runtime modulus.
///
/// All operations take operands that are already canonical residues in
/// `[0, p)` and produce canonical residues. Use [`element`][PrimeField::element]
/// to bring arbitrary non-negative integers into the field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrimeField {
    prime: BigUint,
}

impl PrimeField {
    /// Constructs a field from the given prime.
    ///
    /// The primality of the modulus is the caller's responsibility; only
    /// trivially unusable moduli are rejected.
    pub fn new(prime: BigUint) -> Result<Self, FieldError> {
        if prime < BigUint::from(2u32) {
            return Err(FieldError::InvalidModulus);
        }
        Ok(Self { prime })
    }

    /// The prime modulus of this field.
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// Reduces a non-negative integer into the field.
    pub fn element(&self, value: &BigUint) -> BigUint {
        value % &self.prime
    }

    /// Reduces a signed integer into the field, flooring negatives.
    pub fn element_from_int(&self, value: &BigInt) -> BigUint {
        let modulus = BigInt::from_biguint(Sign::Plus, self.prime.clone());
        let reduced = ((value % &modulus) + &modulus) % &modulus;
        // The double reduction above makes the result non-negative.
        reduced.to_biguint().unwrap_or_default()
    }

    /// Modular addition.
    pub fn add(&self, left: &BigUint, right: &BigUint) -> BigUint {
        (left + right) % &self.prime
    }

    /// Modular subtraction.
    pub fn sub(&self, left: &BigUint, right: &BigUint) -> BigUint {
        ((left + &self.prime) - (right % &self.prime)) % &self.prime
    }

    /// Modular multiplication.
    pub fn mul(&self, left: &BigUint, right: &BigUint) -> BigUint {
        (left * right) % &self.prime
    }

    /// Modular negation.
    pub fn neg(&self, value: &BigUint) -> BigUint {
        (&self.prime - (value % &self.prime)) % &self.prime
    }

    /// Modular exponentiation with a non-negative exponent.
    pub fn pow(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.prime)
    }

    /// Raises two to the given power.
    pub fn two_pow(&self, exponent: u64) -> BigUint {
        self.pow(&BigUint::from(2u32), &BigUint::from(exponent))
    }

    /// Multiplicative inverse through the extended Euclidean algorithm.
    pub fn inverse(&self, value: &BigUint) -> Result<BigUint, NotInvertible> {
        let modulus = BigInt::from_biguint(Sign::Plus, self.prime.clone());
        let mut remainder = BigInt::from_biguint(Sign::Plus, value % &self.prime);
        let mut prev_remainder = modulus.clone();
        let mut coefficient = BigInt::one();
        let mut prev_coefficient = BigInt::zero();
        while !remainder.is_zero() {
            let quotient = &prev_remainder / &remainder;
            let next_remainder = &prev_remainder - &quotient * &remainder;
            prev_remainder = std::mem::replace(&mut remainder, next_remainder);
            let next_coefficient = &prev_coefficient - &quotient * &coefficient;
            prev_coefficient = std::mem::replace(&mut coefficient, next_coefficient);
        }
        if !prev_remainder.is_one() {
            return Err(NotInvertible);
        }
        let inverse = ((prev_coefficient % &modulus) + &modulus) % &modulus;
        Ok(inverse.to_biguint().unwrap_or_default())
    }

    /// Whether the value is the canonical zero residue.
    pub fn is_zero(&self, value: &BigUint) -> bool {
        (value % &self.prime).is_zero()
    }
}

/// An error constructing a field.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum FieldError {
    /// The modulus cannot define a field.
    #[error("modulus is not a usable prime")]
    InvalidModulus,
}
