use std::ops::{Add, Div, Mul, Sub};

use crate::error::Result;
use crate::field::Field;
use crate::structure::DerivativeStructure;

/// Operators cannot return errors; a shape mismatch is a programming error.
#[inline]
fn or_panic<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|e| panic!("derivative structure operands: {e}"))
}

impl<F: Field> Add for &DerivativeStructure<F> {
    type Output = DerivativeStructure<F>;
    #[inline]
    fn add(self, rhs: Self) -> DerivativeStructure<F> {
        or_panic(self.checked_add(rhs))
    }
}

impl<F: Field> Sub for &DerivativeStructure<F> {
    type Output = DerivativeStructure<F>;
    #[inline]
    fn sub(self, rhs: Self) -> DerivativeStructure<F> {
        or_panic(self.checked_sub(rhs))
    }
}

impl<F: Field> Mul for &DerivativeStructure<F> {
    type Output = DerivativeStructure<F>;
    #[inline]
    fn mul(self, rhs: Self) -> DerivativeStructure<F> {
        or_panic(self.checked_mul(rhs))
    }
}

impl<F: Field> Div for &DerivativeStructure<F> {
    type Output = DerivativeStructure<F>;
    #[inline]
    fn div(self, rhs: Self) -> DerivativeStructure<F> {
        or_panic(self.checked_div(rhs))
    }
}

forward_binops!(DerivativeStructure);
impl_scalar_ops!(DerivativeStructure, f32);
impl_scalar_ops!(DerivativeStructure, f64);
