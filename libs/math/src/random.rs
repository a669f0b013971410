//! Uniform random integers from OS entropy.

use num_bigint::BigUint;
use num_traits::One;
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Uniform random integer in `[low, high]`, both ends inclusive.
///
/// Samples whole bytes from the OS CSPRNG and rejects values outside the
/// range, so the result is uniform rather than modular-reduced.
pub fn secure_randint(low: &BigUint, high: &BigUint) -> Result<BigUint, RandomError> {
    if low > high {
        return Err(RandomError::BadRange);
    }
    let range_size = (high - low) + BigUint::one();
    let byte_count = ((&range_size - BigUint::one()).bits() / 8 + 1) as usize;
    let mut buffer = vec![0u8; byte_count];
    loop {
        OsRng.fill_bytes(&mut buffer);
        let candidate = BigUint::from_bytes_be(&buffer);
        if candidate < range_size {
            return Ok(low + candidate);
        }
    }
}

/// Random integer error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum RandomError {
    /// The lower bound exceeds the upper bound.
    #[error("lower bound must be less than or equal to upper bound")]
    BadRange,
}
