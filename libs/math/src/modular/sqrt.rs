//! Square roots in a prime field.

use super::PrimeField;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

impl PrimeField {
    /// The smaller of the two square roots of `value`, if any exists.
    pub fn sqrt(&self, value: &BigUint) -> Result<BigUint, SqrtError> {
        let value = self.element(value);
        if value.is_zero() {
            return Ok(BigUint::zero());
        }
        let one = BigUint::one();
        let two = BigUint::from(2u32);
        let four = BigUint::from(4u32);
        if self.prime() % &four == BigUint::from(3u32) {
            let exponent = (self.prime() + &one) / &four;
            let root = self.pow(&value, &exponent);
            if self.mul(&root, &root) != value {
                return Err(SqrtError::NonResidue);
            }
            return Ok(self.smaller_root(root));
        }

        // p % 4 = 1, run Tonelli-Shanks. Factor p - 1 = q * 2^s with q odd.
        let mut q = self.prime() - &one;
        let mut s = 0u64;
        while (&q % &two).is_zero() {
            q /= &two;
            s += 1;
        }

        // Find a quadratic non-residue z.
        let legendre_exponent = (self.prime() - &one) / &two;
        let mut z = two.clone();
        while self.pow(&z, &legendre_exponent).is_one() {
            z += &one;
        }

        let mut c = self.pow(&z, &q);
        let mut t = self.pow(&value, &q);
        let mut root = self.pow(&value, &((&q + &one) / &two));
        let mut order = s;
        loop {
            if t.is_one() {
                return Ok(self.smaller_root(root));
            }
            let mut i = 0u64;
            let mut squared = t.clone();
            while !squared.is_one() && i < order {
                squared = self.mul(&squared, &squared);
                i += 1;
            }
            if i == order {
                return Err(SqrtError::NonResidue);
            }
            let mut b = c.clone();
            for _ in 0..order.saturating_sub(i + 1) {
                b = self.mul(&b, &b);
            }
            order = i;
            c = self.mul(&b, &b);
            t = self.mul(&t, &c);
            root = self.mul(&root, &b);
        }
    }

    fn smaller_root(&self, root: BigUint) -> BigUint {
        let other = self.neg(&root);
        root.min(other)
    }
}

/// Square root error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum SqrtError {
    /// No square root exists.
    #[error("value is not a quadratic residue")]
    NonResidue,
}
