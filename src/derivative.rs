//! The capability shared by every derivative representation.

use crate::error::{check_dimension, DsError, Result};
use crate::field::Field;
use crate::structure::DerivativeStructure;

/// A function value together with partial derivatives up to some order.
///
/// Implemented by the general [`DerivativeStructure`] and by the fixed-shape
/// [`Gradient`](crate::Gradient),
/// [`UnivariateDerivative1`](crate::UnivariateDerivative1) and
/// [`UnivariateDerivative2`](crate::UnivariateDerivative2). Every
/// implementation converts losslessly to a structure of the same shape.
pub trait Derivative<F: Field>: Clone {
    /// Number of free parameters `p`.
    fn free_parameters(&self) -> usize;

    /// Highest stored derivation order `n`.
    fn order(&self) -> usize;

    /// Function value.
    fn value(&self) -> F;

    /// Literal partial derivative for per-parameter `orders`.
    ///
    /// Fails with [`DsError::DimensionMismatch`]
    /// if `orders.len() != p`, or
    /// [`DsError::DerivationOrderNotAllowed`]
    /// if the total order exceeds `n`.
    fn partial_derivative(&self, orders: &[usize]) -> Result<F>;

    /// Equivalent general structure.
    fn to_structure(&self) -> Result<DerivativeStructure<F>>;

    /// Real part of the value.
    fn real(&self) -> f64 {
        self.value().real()
    }
}

impl<F: Field> Derivative<F> for DerivativeStructure<F> {
    fn free_parameters(&self) -> usize {
        self.free_parameters()
    }

    fn order(&self) -> usize {
        self.order()
    }

    fn value(&self) -> F {
        self.value()
    }

    fn partial_derivative(&self, orders: &[usize]) -> Result<F> {
        self.partial_derivative(orders)
    }

    fn to_structure(&self) -> Result<DerivativeStructure<F>> {
        Ok(self.clone())
    }
}

/// Shared argument check for the fixed-shape representations: `orders` must
/// have `parameters` entries summing to at most `order`.
pub(crate) fn check_orders(orders: &[usize], parameters: usize, order: usize) -> Result<usize> {
    check_dimension(orders.len(), parameters)?;
    let total = orders.iter().fold(0usize, |acc, &o| acc.saturating_add(o));
    if total > order {
        return Err(DsError::DerivationOrderNotAllowed { order: total, max: order });
    }
    Ok(total)
}
