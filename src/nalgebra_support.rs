//! nalgebra adapters for Taylor maps.
//!
//! An LU-backed [`LinearDecomposer`] for [`TaylorMap::invert`] and a Jacobian
//! export as `DMatrix<T>`.

use nalgebra::{ComplexField, DMatrix, DVector};

use crate::error::{check_dimension, DsError, Result};
use crate::field::Field;
use crate::linalg::LinearDecomposer;
use crate::taylor_map::TaylorMap;

/// [`LinearDecomposer`] backed by nalgebra's partially pivoted LU.
#[derive(Clone, Copy, Debug, Default)]
pub struct NalgebraLu;

impl<T: Field + ComplexField> LinearDecomposer<T> for NalgebraLu {
    fn solve(&self, matrix: &[Vec<T>], rhs: &[T]) -> Result<Vec<T>> {
        let n = matrix.len();
        for row in matrix {
            check_dimension(row.len(), n)?;
        }
        check_dimension(rhs.len(), n)?;
        let a = DMatrix::from_fn(n, n, |i, j| matrix[i][j].clone());
        let b = DVector::from_column_slice(rhs);
        a.lu()
            .solve(&b)
            .map(|x| x.iter().cloned().collect())
            .ok_or(DsError::SingularMatrix { dimension: n })
    }
}

/// Jacobian of the map at its point, `J[i][j] = ∂f_i/∂x_j`, as a `DMatrix`.
pub fn jacobian_nalgebra<T: Field + nalgebra::Scalar>(map: &TaylorMap<T>) -> Result<DMatrix<T>> {
    let j = map.jacobian()?;
    Ok(DMatrix::from_fn(map.nb_functions(), map.nb_parameters(), |r, c| {
        j[r][c].clone()
    }))
}
