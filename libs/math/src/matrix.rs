//! Dense matrices over a prime field.

use crate::{errors::NotInvertible, modular::PrimeField};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

/// A dense matrix of field elements.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Matrix {
    /// Entries in row-major order.
    data: Vec<BigUint>,

    /// Number of rows.
    nrows: usize,

    /// Number of columns.
    ncols: usize,
}

impl Matrix {
    /// New matrix from row-major data.
    pub fn new(data: Vec<BigUint>, nrows: usize, ncols: usize) -> Result<Matrix, MatrixError> {
        let expected = nrows.checked_mul(ncols).ok_or(MatrixError::Arithmetic)?;
        if expected != data.len() {
            return Err(MatrixError::Build(data.len(), expected));
        }
        Ok(Matrix { data, nrows, ncols })
    }

    /// Zero matrix.
    pub fn zero(nrows: usize, ncols: usize) -> Matrix {
        Matrix { data: vec![BigUint::zero(); nrows.saturating_mul(ncols)], nrows, ncols }
    }

    /// Identity matrix.
    pub fn identity(size: usize) -> Result<Matrix, MatrixError> {
        Self::projection(size, size)
    }

    /// Diagonal matrix with ones in the first `rank` positions and zeros elsewhere.
    pub fn projection(size: usize, rank: usize) -> Result<Matrix, MatrixError> {
        if rank > size {
            return Err(MatrixError::Build(rank, size));
        }
        let mut matrix = Matrix::zero(size, size);
        for i in 0..rank {
            *matrix.entry_mut(i, i)? = BigUint::one();
        }
        Ok(matrix)
    }

    /// Vandermonde matrix: row `i` holds the powers `abscissas[i]^0 .. abscissas[i]^(ncols-1)`.
    pub fn vandermonde(abscissas: &[BigUint], ncols: usize, field: &PrimeField) -> Result<Matrix, MatrixError> {
        let mut data = Vec::with_capacity(abscissas.len().saturating_mul(ncols));
        for abscissa in abscissas {
            let mut power = BigUint::one();
            for _ in 0..ncols {
                data.push(power.clone());
                power = field.mul(&power, abscissa);
            }
        }
        Matrix::new(data, abscissas.len(), ncols)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Get the matrix entry `M[row,col]`.
    pub fn entry(&self, row: usize, col: usize) -> Result<&BigUint, MatrixError> {
        if row >= self.nrows || col >= self.ncols {
            return Err(MatrixError::IndexNotFound);
        }
        let index = row.checked_mul(self.ncols).and_then(|i| i.checked_add(col)).ok_or(MatrixError::Arithmetic)?;
        self.data.get(index).ok_or(MatrixError::IndexNotFound)
    }

    /// Get the matrix entry `M[row,col]` mutably.
    pub fn entry_mut(&mut self, row: usize, col: usize) -> Result<&mut BigUint, MatrixError> {
        if row >= self.nrows || col >= self.ncols {
            return Err(MatrixError::IndexNotFound);
        }
        let index = row.checked_mul(self.ncols).and_then(|i| i.checked_add(col)).ok_or(MatrixError::Arithmetic)?;
        self.data.get_mut(index).ok_or(MatrixError::IndexNotFound)
    }

    /// Transposed copy of this matrix.
    pub fn transpose(&self) -> Result<Matrix, MatrixError> {
        let mut transposed = Matrix::zero(self.ncols, self.nrows);
        for row in 0..self.nrows {
            for col in 0..self.ncols {
                *transposed.entry_mut(col, row)? = self.entry(row, col)?.clone();
            }
        }
        Ok(transposed)
    }

    /// Matrix multiplication with per-term reduction.
    pub fn mul(&self, other: &Matrix, field: &PrimeField) -> Result<Matrix, MatrixError> {
        if self.ncols != other.nrows {
            return Err(MatrixError::Dimensions(self.ncols, other.nrows));
        }
        let mut result = Matrix::zero(self.nrows, other.ncols);
        for row in 0..self.nrows {
            for col in 0..other.ncols {
                let mut sum = BigUint::zero();
                for k in 0..self.ncols {
                    let term = field.mul(self.entry(row, k)?, other.entry(k, col)?);
                    sum = field.add(&sum, &term);
                }
                *result.entry_mut(row, col)? = sum;
            }
        }
        Ok(result)
    }

    /// Inverse through Gauss-Jordan elimination.
    ///
    /// Pivot search scans rows `i..n` for the first entry that is nonzero
    /// mod p and swaps it up, so the input does not need to be in any
    /// particular form.
    pub fn inverse(&self, field: &PrimeField) -> Result<Matrix, MatrixError> {
        let size = self.nrows;
        if size != self.ncols {
            return Err(MatrixError::Singular);
        }
        let mut work = self.clone();
        let mut inverse = Matrix::identity(size)?;

        for i in 0..size {
            let pivot_row = (i..size)
                .find(|&row| work.entry(row, i).map(|value| !field.is_zero(value)).unwrap_or(false))
                .ok_or(MatrixError::Singular)?;
            if pivot_row != i {
                work.swap_rows(i, pivot_row)?;
                inverse.swap_rows(i, pivot_row)?;
            }

            let pivot = field.element(work.entry(i, i)?);
            let pivot_inverse = field.inverse(&pivot)?;
            work.scale_row(i, &pivot_inverse, field)?;
            inverse.scale_row(i, &pivot_inverse, field)?;

            for row in i + 1..size {
                let factor = field.element(work.entry(row, i)?);
                if !factor.is_zero() {
                    work.eliminate_row(row, i, &factor, field)?;
                    inverse.eliminate_row(row, i, &factor, field)?;
                }
            }
        }

        // Back substitution to clear the entries above the pivots.
        for i in (0..size).rev() {
            for row in (0..i).rev() {
                let factor = field.element(work.entry(row, i)?);
                if !factor.is_zero() {
                    work.eliminate_row(row, i, &factor, field)?;
                    inverse.eliminate_row(row, i, &factor, field)?;
                }
            }
        }

        Ok(inverse)
    }

    fn swap_rows(&mut self, first: usize, second: usize) -> Result<(), MatrixError> {
        for col in 0..self.ncols {
            let left = self.entry(first, col)?.clone();
            let right = std::mem::replace(self.entry_mut(second, col)?, left);
            *self.entry_mut(first, col)? = right;
        }
        Ok(())
    }

    fn scale_row(&mut self, row: usize, factor: &BigUint, field: &PrimeField) -> Result<(), MatrixError> {
        for col in 0..self.ncols {
            let scaled = field.mul(self.entry(row, col)?, factor);
            *self.entry_mut(row, col)? = scaled;
        }
        Ok(())
    }

    /// Subtracts `factor` times the pivot row from `row`.
    fn eliminate_row(
        &mut self,
        row: usize,
        pivot_row: usize,
        factor: &BigUint,
        field: &PrimeField,
    ) -> Result<(), MatrixError> {
        for col in 0..self.ncols {
            let subtrahend = field.mul(factor, self.entry(pivot_row, col)?);
            let eliminated = field.sub(self.entry(row, col)?, &subtrahend);
            *self.entry_mut(row, col)? = eliminated;
        }
        Ok(())
    }
}

/// Matrix error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum MatrixError {
    /// Inverse of a zero pivot requested.
    #[error("matrix operation error: {0}")]
    Operation(#[from] NotInvertible),

    /// Index not found error.
    #[error("index not found")]
    IndexNotFound,

    /// Integer overflow or underflow.
    #[error("integer overflow/underflow")]
    Arithmetic,

    /// Error building matrix.
    #[error("given data has {0} entries which does not match the expected {1}")]
    Build(usize, usize),

    /// Dimension mismatch during multiplication.
    #[error("matrix dimensions {0} and {1} do not match for multiplication")]
    Dimensions(usize, usize),

    /// Non-invertible, singular matrix.
    #[error("singular matrix can't be inverted")]
    Singular,
}
