use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::derivative::{check_orders, Derivative};
use crate::error::{check_dimension, DsError, Result};
use crate::field::Field;
use crate::structure::{DerivativeStructure, DsFactory};

/// Value, first and second derivative of a function of one parameter.
///
/// The `(p, n) = (1, 2)` shape. Fields hold literal derivatives, not Taylor
/// coefficients: `f2` is `f''`, not `f'' / 2`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnivariateDerivative2<F> {
    pub f0: F,
    pub f1: F,
    pub f2: F,
}

impl<F: Field + Display> Display for UnivariateDerivative2<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.f0, self.f1, self.f2)
    }
}

impl<F: Field> From<F> for UnivariateDerivative2<F> {
    #[inline]
    fn from(value: F) -> Self {
        UnivariateDerivative2::constant(value)
    }
}

impl<F: Field> UnivariateDerivative2<F> {
    #[inline]
    pub fn new(f0: F, f1: F, f2: F) -> Self {
        UnivariateDerivative2 { f0, f1, f2 }
    }

    #[inline]
    pub fn constant(value: F) -> Self {
        UnivariateDerivative2 {
            f0: value,
            f1: F::zero(),
            f2: F::zero(),
        }
    }

    #[inline]
    pub fn variable(value: F) -> Self {
        UnivariateDerivative2 {
            f0: value,
            f1: F::one(),
            f2: F::zero(),
        }
    }

    #[inline]
    pub fn value(&self) -> F {
        self.f0.clone()
    }

    #[inline]
    pub fn order(&self) -> usize {
        2
    }

    #[inline]
    pub fn first_derivative(&self) -> F {
        self.f1.clone()
    }

    #[inline]
    pub fn second_derivative(&self) -> F {
        self.f2.clone()
    }

    /// Second-order chain rule: `(g∘f)'' = g'·f'' + g''·f'²`.
    pub(crate) fn apply(&self, d: &[F]) -> Self {
        UnivariateDerivative2 {
            f0: d[0].clone(),
            f1: d[1].clone() * self.f1.clone(),
            f2: d[1].clone() * self.f2.clone()
                + d[2].clone() * self.f1.clone() * self.f1.clone(),
        }
    }

    /// `g ∘ self` from `[g(f0), g'(f0), g''(f0)]`.
    pub fn compose(&self, derivatives: &[F]) -> Result<Self> {
        check_dimension(derivatives.len(), 3)?;
        Ok(self.apply(derivatives))
    }

    pub(crate) fn with_value(&self, value: F) -> Self {
        UnivariateDerivative2 {
            f0: value,
            f1: self.f1.clone(),
            f2: self.f2.clone(),
        }
    }

    pub(crate) fn constant_like(&self, value: F) -> Self {
        Self::constant(value)
    }

    pub fn negate(&self) -> Self {
        UnivariateDerivative2 {
            f0: -self.f0.clone(),
            f1: -self.f1.clone(),
            f2: -self.f2.clone(),
        }
    }

    pub fn add_scalar(&self, value: F) -> Self {
        self.with_value(self.f0.clone() + value)
    }

    pub fn subtract_scalar(&self, value: F) -> Self {
        self.with_value(self.f0.clone() - value)
    }

    pub fn multiply_scalar(&self, value: F) -> Self {
        UnivariateDerivative2 {
            f0: self.f0.clone() * value.clone(),
            f1: self.f1.clone() * value.clone(),
            f2: self.f2.clone() * value,
        }
    }

    pub fn divide_scalar(&self, value: F) -> Self {
        self.multiply_scalar(value.reciprocal())
    }

    pub fn reciprocal(&self) -> Self {
        let inv = self.f0.reciprocal();
        let inv2 = inv.clone() * inv.clone();
        let d2 = F::from_f64(2.0) * inv2.clone() * inv.clone();
        self.apply(&[inv, -inv2, d2])
    }

    /// `f0 + f1·δ + f2·δ²/2`.
    pub fn taylor(&self, delta: F) -> F {
        let half = F::from_f64(0.5);
        self.f0.clone() + delta.clone() * (self.f1.clone() + half * self.f2.clone() * delta)
    }

    pub fn linear_combination(coefficients: &[F], terms: &[Self]) -> Result<Self> {
        check_dimension(terms.len(), coefficients.len())?;
        if terms.is_empty() {
            return Err(DsError::NumberOfElementsShouldBePositive { found: 0 });
        }
        Ok(coefficients
            .iter()
            .zip(terms)
            .fold(Self::constant(F::zero()), |acc, (a, t)| {
                UnivariateDerivative2 {
                    f0: acc.f0 + a.clone() * t.f0.clone(),
                    f1: acc.f1 + a.clone() * t.f1.clone(),
                    f2: acc.f2 + a.clone() * t.f2.clone(),
                }
            }))
    }
}

impl<F: Field + PartialOrd> PartialOrd for UnivariateDerivative2<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.f0.partial_cmp(&other.f0)? {
            Ordering::Equal => match self.f1.partial_cmp(&other.f1)? {
                Ordering::Equal => self.f2.partial_cmp(&other.f2),
                ordering => Some(ordering),
            },
            ordering => Some(ordering),
        }
    }
}

impl<F: Field> Derivative<F> for UnivariateDerivative2<F> {
    fn free_parameters(&self) -> usize {
        1
    }

    fn order(&self) -> usize {
        2
    }

    fn value(&self) -> F {
        self.f0.clone()
    }

    fn partial_derivative(&self, orders: &[usize]) -> Result<F> {
        Ok(match check_orders(orders, 1, 2)? {
            0 => self.f0.clone(),
            1 => self.f1.clone(),
            _ => self.f2.clone(),
        })
    }

    fn to_structure(&self) -> Result<DerivativeStructure<F>> {
        DsFactory::new(1, 2)?.build(&[self.f0.clone(), self.f1.clone(), self.f2.clone()])
    }
}

impl<F: Field> TryFrom<&DerivativeStructure<F>> for UnivariateDerivative2<F> {
    type Error = DsError;

    fn try_from(ds: &DerivativeStructure<F>) -> Result<Self> {
        check_dimension(ds.free_parameters(), 1)?;
        check_dimension(ds.order(), 2)?;
        let d = ds.all_derivatives();
        Ok(UnivariateDerivative2::new(d[0].clone(), d[1].clone(), d[2].clone()))
    }
}
