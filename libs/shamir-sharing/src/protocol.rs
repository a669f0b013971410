//! Shamir secret sharing protocol.

use crate::party::PartyId;
use math_lib::{
    errors::InterpolationError,
    lagrange::interpolate_at_zero,
    modular::PrimeField,
    random::{secure_randint, RandomError},
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

/// Degree class of a generated polynomial.
///
/// The configured threshold `t` is the number of sampled coefficients, so a
/// class-`T` sharing is recoverable from any `t` points.
#[derive(Clone, Copy, Debug)]
pub enum PolyDegree {
    /// `t` coefficients, the sharing used for secrets.
    T,

    /// `2t` coefficients, the sharing used for the degree-reduction masks.
    TwoT,
}

/// Shamir secret sharing over a fixed party set.
pub struct Shamir {
    threshold: u32,
    parties: u32,
    field: PrimeField,
}

impl Shamir {
    /// Creates a new protocol instance for `parties` parties with the given threshold.
    pub fn new(threshold: u32, parties: u32, field: PrimeField) -> Result<Self, ShamirError> {
        if threshold == 0 {
            return Err(ShamirError::ZeroThreshold);
        }
        if parties < threshold {
            return Err(ShamirError::TooHighThreshold);
        }
        Ok(Self { threshold, parties, field })
    }

    /// The field this protocol operates in.
    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// The configured threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The number of parties shares are generated for.
    pub fn party_count(&self) -> u32 {
        self.parties
    }

    /// Generates one share per party for the given secret.
    ///
    /// The leading coefficient is resampled from `[1, p)` if it lands on
    /// zero, so the polynomial has the full coefficient count. The secret
    /// itself is never resampled.
    pub fn generate_shares(
        &self,
        secret: &BigUint,
        degree: PolyDegree,
    ) -> Result<Vec<(PartyId, BigUint)>, ShareGenerationError> {
        let coefficient_count = match degree {
            PolyDegree::T => self.threshold,
            PolyDegree::TwoT => self.threshold * 2,
        };
        let upper = self.field.prime() - BigUint::one();
        let mut coefficients = Vec::with_capacity(coefficient_count as usize);
        coefficients.push(self.field.element(secret));
        for _ in 1..coefficient_count {
            coefficients.push(secure_randint(&BigUint::zero(), &upper)?);
        }
        if coefficient_count > 1 {
            if let Some(leading) = coefficients.last_mut() {
                if leading.is_zero() {
                    *leading = secure_randint(&BigUint::one(), &upper)?;
                }
            }
        }

        let mut shares = Vec::with_capacity(self.parties as usize);
        for id in 1..=self.parties {
            let party = PartyId::new(id).map_err(|_| ShareGenerationError::Internal)?;
            shares.push((party, self.eval(&coefficients, &party.abscissa())));
        }
        Ok(shares)
    }

    /// Recovers the secret from the given shares.
    ///
    /// Callers supply any `t` shares with distinct party ids; more are
    /// accepted as long as they lie on the same polynomial.
    pub fn recover_secret<I>(&self, shares: I) -> Result<BigUint, RecoverSecretError>
    where
        I: IntoIterator<Item = (PartyId, BigUint)>,
    {
        let points: Vec<(BigUint, BigUint)> =
            shares.into_iter().map(|(party, value)| (party.abscissa(), value)).collect();
        if (points.len() as u64) < u64::from(self.threshold) {
            return Err(RecoverSecretError::NotEnoughShares(points.len(), self.threshold));
        }
        Ok(interpolate_at_zero(&points, &self.field)?)
    }

    /// Horner evaluation of the polynomial at `x`.
    fn eval(&self, coefficients: &[BigUint], x: &BigUint) -> BigUint {
        let mut result = BigUint::zero();
        for coefficient in coefficients.iter().rev() {
            result = self.field.add(&self.field.mul(&result, x), coefficient);
        }
        result
    }
}

/// An error creating the protocol instance.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ShamirError {
    /// The threshold must be positive.
    #[error("threshold must be positive")]
    ZeroThreshold,

    /// The threshold exceeds the party count.
    #[error("threshold exceeds party count")]
    TooHighThreshold,
}

/// An error during share generation.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum ShareGenerationError {
    /// Coefficient sampling failed.
    #[error("coefficient sampling failed: {0}")]
    Sampling(#[from] RandomError),

    /// Invariant violated.
    #[error("internal share generation error")]
    Internal,
}

/// An error during secret recovery.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum RecoverSecretError {
    /// Not enough shares were supplied.
    #[error("got {0} shares but the threshold is {1}")]
    NotEnoughShares(usize, u32),

    /// Interpolation failed.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}
