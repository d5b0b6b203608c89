//! First-order derivatives with respect to any number of parameters.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::derivative::{check_orders, Derivative};
use crate::error::{check_dimension, DsError, Result};
use crate::field::Field;
use crate::structure::{DerivativeStructure, DsFactory};

/// Value and gradient: the `(p, 1)` shape.
///
/// `grad[i]` is `∂f/∂x_i`. The number of free parameters is `grad.len()`,
/// so values built for different parameter counts must not be mixed; the
/// operators panic if they are.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient<F> {
    pub value: F,
    pub grad: Vec<F>,
}

impl<F: Field + Display> Display for Gradient<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        for (i, g) in self.grad.iter().enumerate() {
            write!(f, " + {}\u{03b5}{}", g, i)?;
        }
        Ok(())
    }
}

impl<F: Field> Gradient<F> {
    #[inline]
    pub fn new(value: F, grad: Vec<F>) -> Self {
        Gradient { value, grad }
    }

    /// Constant over `parameters` free parameters.
    pub fn constant(value: F, parameters: usize) -> Self {
        Gradient {
            value,
            grad: vec![F::zero(); parameters],
        }
    }

    /// Free parameter `index` out of `parameters`, at `value`.
    ///
    /// Fails with [`DsError::OutOfRange`] if `index >= parameters`.
    pub fn variable(parameters: usize, index: usize, value: F) -> Result<Self> {
        if index >= parameters {
            return Err(DsError::OutOfRange {
                value: index,
                lo: 0,
                hi: parameters.saturating_sub(1),
            });
        }
        let mut g = Self::constant(value, parameters);
        g.grad[index] = F::one();
        Ok(g)
    }

    #[inline]
    pub fn value(&self) -> F {
        self.value.clone()
    }

    #[inline]
    pub fn order(&self) -> usize {
        1
    }

    #[inline]
    pub fn free_parameters(&self) -> usize {
        self.grad.len()
    }

    #[inline]
    pub fn gradient(&self) -> &[F] {
        &self.grad
    }

    /// `∂f/∂x_index`; fails with [`DsError::OutOfRange`] if `index >= p`.
    pub fn first_partial(&self, index: usize) -> Result<F> {
        self.grad.get(index).cloned().ok_or(DsError::OutOfRange {
            value: index,
            lo: 0,
            hi: self.grad.len().saturating_sub(1),
        })
    }

    /// Same function seen as depending on one more parameter, appended last
    /// with a zero derivative.
    pub fn stack_variable(&self) -> Self {
        let mut grad = Vec::with_capacity(self.grad.len() + 1);
        grad.extend_from_slice(&self.grad);
        grad.push(F::zero());
        Gradient {
            value: self.value.clone(),
            grad,
        }
    }

    pub(crate) fn apply(&self, d: &[F]) -> Self {
        Gradient {
            value: d[0].clone(),
            grad: self.grad.iter().map(|g| g.clone() * d[1].clone()).collect(),
        }
    }

    /// `g ∘ self` from `[g(value), g'(value)]`.
    pub fn compose(&self, derivatives: &[F]) -> Result<Self> {
        check_dimension(derivatives.len(), 2)?;
        Ok(self.apply(derivatives))
    }

    pub(crate) fn with_value(&self, value: F) -> Self {
        Gradient {
            value,
            grad: self.grad.clone(),
        }
    }

    pub(crate) fn constant_like(&self, value: F) -> Self {
        Self::constant(value, self.grad.len())
    }

    pub fn negate(&self) -> Self {
        Gradient {
            value: -self.value.clone(),
            grad: self.grad.iter().map(|g| -g.clone()).collect(),
        }
    }

    pub fn add_scalar(&self, value: F) -> Self {
        self.with_value(self.value.clone() + value)
    }

    pub fn subtract_scalar(&self, value: F) -> Self {
        self.with_value(self.value.clone() - value)
    }

    pub fn multiply_scalar(&self, value: F) -> Self {
        Gradient {
            value: self.value.clone() * value.clone(),
            grad: self.grad.iter().map(|g| g.clone() * value.clone()).collect(),
        }
    }

    pub fn divide_scalar(&self, value: F) -> Self {
        self.multiply_scalar(value.reciprocal())
    }

    pub fn reciprocal(&self) -> Self {
        let inv = self.value.reciprocal();
        let d1 = -(inv.clone() * inv.clone());
        self.apply(&[inv, d1])
    }

    /// `value + grad · delta`; fails with [`DsError::DimensionMismatch`] on length.
    pub fn taylor(&self, delta: &[F]) -> Result<F> {
        check_dimension(delta.len(), self.grad.len())?;
        Ok(self
            .grad
            .iter()
            .zip(delta)
            .fold(self.value.clone(), |acc, (g, d)| acc + g.clone() * d.clone()))
    }

    pub(crate) fn check_compatible(&self, other: &Self) -> Result<()> {
        check_dimension(other.grad.len(), self.grad.len())
    }

    /// `Σ coefficients[i] · terms[i]`.
    pub fn linear_combination(coefficients: &[F], terms: &[Self]) -> Result<Self> {
        check_dimension(terms.len(), coefficients.len())?;
        let first = terms
            .first()
            .ok_or(DsError::NumberOfElementsShouldBePositive { found: 0 })?;
        let mut sum = first.constant_like(F::zero());
        for (a, t) in coefficients.iter().zip(terms) {
            first.check_compatible(t)?;
            sum.value = sum.value + a.clone() * t.value.clone();
            for (s, g) in sum.grad.iter_mut().zip(&t.grad) {
                *s = s.clone() + a.clone() * g.clone();
            }
        }
        Ok(sum)
    }
}

impl<F: Field + PartialOrd> PartialOrd for Gradient<F> {
    /// Lexicographic over `(value, grad[0], grad[1], …)`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.value.partial_cmp(&other.value)? {
            Ordering::Equal => self.grad.partial_cmp(&other.grad),
            ordering => Some(ordering),
        }
    }
}

impl<F: Field> Derivative<F> for Gradient<F> {
    fn free_parameters(&self) -> usize {
        self.grad.len()
    }

    fn order(&self) -> usize {
        1
    }

    fn value(&self) -> F {
        self.value.clone()
    }

    fn partial_derivative(&self, orders: &[usize]) -> Result<F> {
        if check_orders(orders, self.grad.len(), 1)? == 0 {
            return Ok(self.value.clone());
        }
        let index = orders.iter().position(|&o| o == 1).unwrap_or_default();
        Ok(self.grad[index].clone())
    }

    fn to_structure(&self) -> Result<DerivativeStructure<F>> {
        let factory = DsFactory::new(self.grad.len(), 1)?;
        let mut derivatives = Vec::with_capacity(self.grad.len() + 1);
        derivatives.push(self.value.clone());
        derivatives.extend_from_slice(&self.grad);
        factory.build(&derivatives)
    }
}

impl<F: Field> TryFrom<&DerivativeStructure<F>> for Gradient<F> {
    type Error = DsError;

    /// Fails with [`DsError::DimensionMismatch`] unless the order is 1.
    fn try_from(ds: &DerivativeStructure<F>) -> Result<Self> {
        check_dimension(ds.order(), 1)?;
        let mut d = ds.all_derivatives();
        let grad = d.split_off(1);
        Ok(Gradient {
            value: d.swap_remove(0),
            grad,
        })
    }
}
