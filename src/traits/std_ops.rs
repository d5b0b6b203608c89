use std::ops::{Add, Div, Mul, Sub};

use crate::derivative1::UnivariateDerivative1;
use crate::derivative2::UnivariateDerivative2;
use crate::field::Field;

// ══════════════════════════════════════════════
//  UnivariateDerivative1
// ══════════════════════════════════════════════

impl<F: Field> Add for &UnivariateDerivative1<F> {
    type Output = UnivariateDerivative1<F>;
    #[inline]
    fn add(self, rhs: Self) -> UnivariateDerivative1<F> {
        UnivariateDerivative1 {
            f0: self.f0.clone() + rhs.f0.clone(),
            f1: self.f1.clone() + rhs.f1.clone(),
        }
    }
}

impl<F: Field> Sub for &UnivariateDerivative1<F> {
    type Output = UnivariateDerivative1<F>;
    #[inline]
    fn sub(self, rhs: Self) -> UnivariateDerivative1<F> {
        UnivariateDerivative1 {
            f0: self.f0.clone() - rhs.f0.clone(),
            f1: self.f1.clone() - rhs.f1.clone(),
        }
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl<F: Field> Mul for &UnivariateDerivative1<F> {
    type Output = UnivariateDerivative1<F>;
    #[inline]
    fn mul(self, rhs: Self) -> UnivariateDerivative1<F> {
        UnivariateDerivative1 {
            f0: self.f0.clone() * rhs.f0.clone(),
            f1: self.f0.clone() * rhs.f1.clone() + self.f1.clone() * rhs.f0.clone(),
        }
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl<F: Field> Div for &UnivariateDerivative1<F> {
    type Output = UnivariateDerivative1<F>;
    #[inline]
    fn div(self, rhs: Self) -> UnivariateDerivative1<F> {
        let inv = rhs.f0.reciprocal();
        let q0 = self.f0.clone() * inv.clone();
        UnivariateDerivative1 {
            f1: (self.f1.clone() - rhs.f1.clone() * q0.clone()) * inv,
            f0: q0,
        }
    }
}

forward_binops!(UnivariateDerivative1);
impl_scalar_ops!(UnivariateDerivative1, f32);
impl_scalar_ops!(UnivariateDerivative1, f64);

// ══════════════════════════════════════════════
//  UnivariateDerivative2
// ══════════════════════════════════════════════

impl<F: Field> Add for &UnivariateDerivative2<F> {
    type Output = UnivariateDerivative2<F>;
    #[inline]
    fn add(self, rhs: Self) -> UnivariateDerivative2<F> {
        UnivariateDerivative2 {
            f0: self.f0.clone() + rhs.f0.clone(),
            f1: self.f1.clone() + rhs.f1.clone(),
            f2: self.f2.clone() + rhs.f2.clone(),
        }
    }
}

impl<F: Field> Sub for &UnivariateDerivative2<F> {
    type Output = UnivariateDerivative2<F>;
    #[inline]
    fn sub(self, rhs: Self) -> UnivariateDerivative2<F> {
        UnivariateDerivative2 {
            f0: self.f0.clone() - rhs.f0.clone(),
            f1: self.f1.clone() - rhs.f1.clone(),
            f2: self.f2.clone() - rhs.f2.clone(),
        }
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl<F: Field> Mul for &UnivariateDerivative2<F> {
    type Output = UnivariateDerivative2<F>;
    /// Leibniz: `(ab)'' = a''b + 2a'b' + ab''`.
    #[inline]
    fn mul(self, rhs: Self) -> UnivariateDerivative2<F> {
        let two = F::from_f64(2.0);
        UnivariateDerivative2 {
            f0: self.f0.clone() * rhs.f0.clone(),
            f1: self.f0.clone() * rhs.f1.clone() + self.f1.clone() * rhs.f0.clone(),
            f2: self.f2.clone() * rhs.f0.clone()
                + two * self.f1.clone() * rhs.f1.clone()
                + self.f0.clone() * rhs.f2.clone(),
        }
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl<F: Field> Div for &UnivariateDerivative2<F> {
    type Output = UnivariateDerivative2<F>;
    /// Solved from `q·b = a` one order at a time.
    #[inline]
    fn div(self, rhs: Self) -> UnivariateDerivative2<F> {
        let inv = rhs.f0.reciprocal();
        let two = F::from_f64(2.0);
        let q0 = self.f0.clone() * inv.clone();
        let q1 = (self.f1.clone() - rhs.f1.clone() * q0.clone()) * inv.clone();
        let q2 = (self.f2.clone() - two * rhs.f1.clone() * q1.clone() - rhs.f2.clone() * q0.clone())
            * inv;
        UnivariateDerivative2 {
            f0: q0,
            f1: q1,
            f2: q2,
        }
    }
}

forward_binops!(UnivariateDerivative2);
impl_scalar_ops!(UnivariateDerivative2, f32);
impl_scalar_ops!(UnivariateDerivative2, f64);
