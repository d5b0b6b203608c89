use std::ops::{Add, Div, Mul, Sub};

use crate::field::Field;
use crate::gradient::Gradient;

/// Combine two gradients lane by lane.
///
/// # Panics
///
/// Panics if the gradients have different lengths.
#[inline]
fn zip_lanes<F: Field>(
    lhs: &Gradient<F>,
    rhs: &Gradient<F>,
    value: F,
    lane: impl Fn(&F, &F) -> F,
) -> Gradient<F> {
    if let Err(e) = lhs.check_compatible(rhs) {
        panic!("gradient operands: {e}");
    }
    Gradient {
        value,
        grad: lhs.grad.iter().zip(&rhs.grad).map(|(a, b)| lane(a, b)).collect(),
    }
}

impl<F: Field> Add for &Gradient<F> {
    type Output = Gradient<F>;
    #[inline]
    fn add(self, rhs: Self) -> Gradient<F> {
        let value = self.value.clone() + rhs.value.clone();
        zip_lanes(self, rhs, value, |a, b| a.clone() + b.clone())
    }
}

impl<F: Field> Sub for &Gradient<F> {
    type Output = Gradient<F>;
    #[inline]
    fn sub(self, rhs: Self) -> Gradient<F> {
        let value = self.value.clone() - rhs.value.clone();
        zip_lanes(self, rhs, value, |a, b| a.clone() - b.clone())
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl<F: Field> Mul for &Gradient<F> {
    type Output = Gradient<F>;
    #[inline]
    fn mul(self, rhs: Self) -> Gradient<F> {
        let value = self.value.clone() * rhs.value.clone();
        zip_lanes(self, rhs, value, |a, b| {
            self.value.clone() * b.clone() + a.clone() * rhs.value.clone()
        })
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl<F: Field> Div for &Gradient<F> {
    type Output = Gradient<F>;
    #[inline]
    fn div(self, rhs: Self) -> Gradient<F> {
        let inv = rhs.value.reciprocal();
        let q = self.value.clone() * inv.clone();
        zip_lanes(self, rhs, q.clone(), |a, b| {
            (a.clone() - b.clone() * q.clone()) * inv.clone()
        })
    }
}

forward_binops!(Gradient);
impl_scalar_ops!(Gradient, f32);
impl_scalar_ops!(Gradient, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_rule_per_lane() {
        let x = Gradient::variable(2, 0, 3.0_f64).unwrap();
        let y = Gradient::variable(2, 1, -2.0_f64).unwrap();
        let f = &x * &y + x.clone();
        assert_eq!(f.value, -3.0);
        assert_eq!(f.grad, vec![-1.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn mismatched_lengths_panic() {
        let x = Gradient::variable(2, 0, 1.0_f64).unwrap();
        let y = Gradient::variable(3, 0, 1.0_f64).unwrap();
        let _ = x + y;
    }
}
