//! Lagrange interpolation at zero in a prime field.

use crate::{errors::InterpolationError, modular::PrimeField};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Lagrange coefficients for evaluating at zero: `L_i = prod_{j != i} x_j * (x_j - x_i)^-1`.
pub fn coefficients_at_zero(abscissas: &[BigUint], field: &PrimeField) -> Result<Vec<BigUint>, InterpolationError> {
    if abscissas.is_empty() {
        return Err(InterpolationError::EmptySequence);
    }
    let mut coefficients = Vec::with_capacity(abscissas.len());
    for (i, x_i) in abscissas.iter().enumerate() {
        let mut coefficient = BigUint::one();
        for (j, x_j) in abscissas.iter().enumerate() {
            if i == j {
                continue;
            }
            let difference = field.sub(x_j, x_i);
            if difference.is_zero() {
                return Err(InterpolationError::DuplicateAbscissas);
            }
            let term = field.mul(x_j, &field.inverse(&difference)?);
            coefficient = field.mul(&coefficient, &term);
        }
        coefficients.push(coefficient);
    }
    Ok(coefficients)
}

/// Interpolates the polynomial through the given points and evaluates it at zero.
pub fn interpolate_at_zero(points: &[(BigUint, BigUint)], field: &PrimeField) -> Result<BigUint, InterpolationError> {
    let abscissas: Vec<BigUint> = points.iter().map(|(x, _)| x.clone()).collect();
    let coefficients = coefficients_at_zero(&abscissas, field)?;
    let mut secret = BigUint::zero();
    for ((_, y), coefficient) in points.iter().zip(coefficients.iter()) {
        secret = field.add(&secret, &field.mul(y, coefficient));
    }
    Ok(secret)
}
