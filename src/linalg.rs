//! Dense linear solves used by Taylor-map inversion.
//!
//! [`TaylorMap::invert`](crate::TaylorMap::invert) only needs to solve the
//! Jacobian system, so the solver is injected through [`LinearDecomposer`].
//! [`LuDecomposer`] is the bundled implementation; any closure
//! `Fn(&[Vec<T>], &[T]) -> Result<Vec<T>>` works as well, and the `nalgebra`
//! feature adds an adapter over `nalgebra`'s LU.

use crate::error::{check_dimension, DsError, Result};
use crate::field::Field;

/// Solver for square systems `A · x = b`, with `A` given as `a[row][col]`.
pub trait LinearDecomposer<T> {
    fn solve(&self, matrix: &[Vec<T>], rhs: &[T]) -> Result<Vec<T>>;

    /// `A⁻¹` as rows, one solve per unit right-hand side.
    fn inverse(&self, matrix: &[Vec<T>]) -> Result<Vec<Vec<T>>>
    where
        T: Field,
    {
        let n = matrix.len();
        let mut inverse = vec![vec![T::zero(); n]; n];
        for j in 0..n {
            let mut unit = vec![T::zero(); n];
            unit[j] = T::one();
            let column = self.solve(matrix, &unit)?;
            for (row, x) in inverse.iter_mut().zip(column) {
                row[j] = x;
            }
        }
        Ok(inverse)
    }
}

impl<T, C> LinearDecomposer<T> for C
where
    C: Fn(&[Vec<T>], &[T]) -> Result<Vec<T>>,
{
    fn solve(&self, matrix: &[Vec<T>], rhs: &[T]) -> Result<Vec<T>> {
        self(matrix, rhs)
    }
}

/// LU factorization with partial pivoting.
///
/// Stores the combined L/U factors in a single matrix (L below the diagonal
/// with an implicit unit diagonal, U on and above it) plus the row permutation.
#[derive(Clone, Debug)]
pub struct LuFactors<T> {
    lu: Vec<Vec<T>>,
    /// `perm[i]` is the original row index of factored row `i`.
    perm: Vec<usize>,
}

/// Gaussian elimination with row pivoting on [`Field::magnitude`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LuDecomposer {
    /// Pivots with a magnitude below this are treated as zero.
    pub singularity_threshold: f64,
}

impl Default for LuDecomposer {
    fn default() -> Self {
        LuDecomposer {
            singularity_threshold: 1e-12,
        }
    }
}

impl LuDecomposer {
    pub fn with_threshold(singularity_threshold: f64) -> Self {
        LuDecomposer {
            singularity_threshold,
        }
    }

    /// Factorize an `n × n` matrix.
    ///
    /// Fails with [`DsError::DimensionMismatch`] if a row has the wrong length
    /// and with [`DsError::SingularMatrix`] on a (near-)zero pivot.
    pub fn factor<T: Field>(&self, matrix: &[Vec<T>]) -> Result<LuFactors<T>> {
        let n = matrix.len();
        for row in matrix {
            check_dimension(row.len(), n)?;
        }

        let mut lu: Vec<Vec<T>> = matrix.to_vec();
        let mut perm: Vec<usize> = (0..n).collect();

        for col in 0..n {
            let mut max_val = lu[col][col].magnitude();
            let mut max_row = col;
            for row in (col + 1)..n {
                let v = lu[row][col].magnitude();
                if v > max_val {
                    max_val = v;
                    max_row = row;
                }
            }

            if max_val.is_nan() || max_val < self.singularity_threshold {
                return Err(DsError::SingularMatrix { dimension: n });
            }

            if max_row != col {
                lu.swap(col, max_row);
                perm.swap(col, max_row);
            }

            let pivot = lu[col][col].clone();
            for row in (col + 1)..n {
                let factor = lu[row][col].clone() / pivot.clone();
                for j in (col + 1)..n {
                    let val = lu[col][j].clone();
                    lu[row][j] = lu[row][j].clone() - factor.clone() * val;
                }
                lu[row][col] = factor;
            }
        }

        Ok(LuFactors { lu, perm })
    }
}

impl<T: Field> LuFactors<T> {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.perm.len()
    }

    /// Solve `A · x = b` with the stored factors.
    pub fn solve(&self, b: &[T]) -> Result<Vec<T>> {
        let n = self.dimension();
        check_dimension(b.len(), n)?;

        let mut y: Vec<T> = self.perm.iter().map(|&p| b[p].clone()).collect();

        // L has a unit diagonal
        for i in 1..n {
            for j in 0..i {
                let l_ij = self.lu[i][j].clone();
                y[i] = y[i].clone() - l_ij * y[j].clone();
            }
        }

        let mut x = vec![T::zero(); n];
        for i in (0..n).rev() {
            let mut sum = y[i].clone();
            for j in (i + 1)..n {
                sum = sum - self.lu[i][j].clone() * x[j].clone();
            }
            x[i] = sum / self.lu[i][i].clone();
        }
        Ok(x)
    }
}

impl<T: Field> LinearDecomposer<T> for LuDecomposer {
    fn solve(&self, matrix: &[Vec<T>], rhs: &[T]) -> Result<Vec<T>> {
        self.factor(matrix)?.solve(rhs)
    }

    fn inverse(&self, matrix: &[Vec<T>]) -> Result<Vec<Vec<T>>> {
        let factors = self.factor(matrix)?;
        let n = factors.dimension();
        let mut inverse = vec![vec![T::zero(); n]; n];
        for j in 0..n {
            let mut unit = vec![T::zero(); n];
            unit[j] = T::one();
            for (row, x) in inverse.iter_mut().zip(factors.solve(&unit)?) {
                row[j] = x;
            }
        }
        Ok(inverse)
    }
}
