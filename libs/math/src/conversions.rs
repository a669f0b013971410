//! Integer/bit conversions.

use num_bigint::BigUint;
use num_traits::Zero;

/// Little-endian bit expansion; zero expands to a single `0` bit.
pub fn bits_le(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return vec![0];
    }
    (0..value.bits()).map(|index| u8::from(value.bit(index))).collect()
}
