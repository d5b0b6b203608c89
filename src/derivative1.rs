use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::derivative::{check_orders, Derivative};
use crate::error::{check_dimension, DsError, Result};
use crate::field::Field;
use crate::structure::{DerivativeStructure, DsFactory};

/// Value and first derivative of a function of one parameter.
///
/// `UnivariateDerivative1 { f0, f1 }` is the `(p, n) = (1, 1)` shape, the
/// classic dual number `f0 + f1·ε` with `ε² = 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnivariateDerivative1<F> {
    /// Function value.
    pub f0: F,
    /// First derivative.
    pub f1: F,
}

impl<F: Field + Display> Display for UnivariateDerivative1<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}ε", self.f0, self.f1)
    }
}

impl<F: Field> From<F> for UnivariateDerivative1<F> {
    #[inline]
    fn from(value: F) -> Self {
        UnivariateDerivative1::constant(value)
    }
}

impl<F: Field> UnivariateDerivative1<F> {
    #[inline]
    pub fn new(f0: F, f1: F) -> Self {
        UnivariateDerivative1 { f0, f1 }
    }

    /// Constant (zero derivative).
    #[inline]
    pub fn constant(value: F) -> Self {
        UnivariateDerivative1 {
            f0: value,
            f1: F::zero(),
        }
    }

    /// The free parameter itself (unit derivative).
    #[inline]
    pub fn variable(value: F) -> Self {
        UnivariateDerivative1 {
            f0: value,
            f1: F::one(),
        }
    }

    #[inline]
    pub fn value(&self) -> F {
        self.f0.clone()
    }

    #[inline]
    pub fn order(&self) -> usize {
        1
    }

    #[inline]
    pub fn first_derivative(&self) -> F {
        self.f1.clone()
    }

    /// Chain rule: `d = [g(f0), g'(f0), …]`.
    #[inline]
    pub(crate) fn apply(&self, d: &[F]) -> Self {
        UnivariateDerivative1 {
            f0: d[0].clone(),
            f1: d[1].clone() * self.f1.clone(),
        }
    }

    /// `g ∘ self` from `[g(f0), g'(f0)]`.
    pub fn compose(&self, derivatives: &[F]) -> Result<Self> {
        check_dimension(derivatives.len(), 2)?;
        Ok(self.apply(derivatives))
    }

    #[inline]
    pub(crate) fn with_value(&self, value: F) -> Self {
        UnivariateDerivative1 {
            f0: value,
            f1: self.f1.clone(),
        }
    }

    #[inline]
    pub(crate) fn constant_like(&self, value: F) -> Self {
        Self::constant(value)
    }

    #[inline]
    pub fn negate(&self) -> Self {
        UnivariateDerivative1 {
            f0: -self.f0.clone(),
            f1: -self.f1.clone(),
        }
    }

    #[inline]
    pub fn add_scalar(&self, value: F) -> Self {
        self.with_value(self.f0.clone() + value)
    }

    #[inline]
    pub fn subtract_scalar(&self, value: F) -> Self {
        self.with_value(self.f0.clone() - value)
    }

    #[inline]
    pub fn multiply_scalar(&self, value: F) -> Self {
        UnivariateDerivative1 {
            f0: self.f0.clone() * value.clone(),
            f1: self.f1.clone() * value,
        }
    }

    #[inline]
    pub fn divide_scalar(&self, value: F) -> Self {
        self.multiply_scalar(value.reciprocal())
    }

    #[inline]
    pub fn reciprocal(&self) -> Self {
        let inv = self.f0.reciprocal();
        let d1 = -(inv.clone() * inv.clone());
        self.apply(&[inv, d1])
    }

    /// `f0 + f1·δ`.
    #[inline]
    pub fn taylor(&self, delta: F) -> F {
        self.f0.clone() + self.f1.clone() * delta
    }

    /// `Σ coefficients[i] · terms[i]`.
    pub fn linear_combination(coefficients: &[F], terms: &[Self]) -> Result<Self> {
        check_dimension(terms.len(), coefficients.len())?;
        if terms.is_empty() {
            return Err(DsError::NumberOfElementsShouldBePositive { found: 0 });
        }
        Ok(coefficients
            .iter()
            .zip(terms)
            .fold(Self::constant(F::zero()), |acc, (a, t)| {
                UnivariateDerivative1 {
                    f0: acc.f0 + a.clone() * t.f0.clone(),
                    f1: acc.f1 + a.clone() * t.f1.clone(),
                }
            }))
    }
}

impl<F: Field + PartialOrd> PartialOrd for UnivariateDerivative1<F> {
    /// Lexicographic over `(f0, f1)`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.f0.partial_cmp(&other.f0)? {
            Ordering::Equal => self.f1.partial_cmp(&other.f1),
            ordering => Some(ordering),
        }
    }
}

impl<F: Field> Derivative<F> for UnivariateDerivative1<F> {
    fn free_parameters(&self) -> usize {
        1
    }

    fn order(&self) -> usize {
        1
    }

    fn value(&self) -> F {
        self.f0.clone()
    }

    fn partial_derivative(&self, orders: &[usize]) -> Result<F> {
        Ok(match check_orders(orders, 1, 1)? {
            0 => self.f0.clone(),
            _ => self.f1.clone(),
        })
    }

    fn to_structure(&self) -> Result<DerivativeStructure<F>> {
        DsFactory::new(1, 1)?.build(&[self.f0.clone(), self.f1.clone()])
    }
}

impl<F: Field> TryFrom<&DerivativeStructure<F>> for UnivariateDerivative1<F> {
    type Error = DsError;

    /// Fails with [`DsError::DimensionMismatch`] unless the structure is `(1, 1)`.
    fn try_from(ds: &DerivativeStructure<F>) -> Result<Self> {
        check_dimension(ds.free_parameters(), 1)?;
        check_dimension(ds.order(), 1)?;
        let d = ds.all_derivatives();
        Ok(UnivariateDerivative1::new(d[0].clone(), d[1].clone()))
    }
}
