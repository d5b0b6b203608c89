//! Operator overloads for every derivative representation.
//!
//! Each type implements `&a op &b` directly; the owned and mixed forms and
//! the `*Assign` variants are forwarded to it by [`forward_binops!`].
//! Operators on shapes that do not match (structures with different `(p, n)`,
//! gradients of different length) panic; use the `checked_*` methods or
//! `linear_combination` to get a [`DsError`](crate::DsError) instead.

/// Owned, mixed and assigning forms of `+ - * /` on top of the `&a op &b` impls.
macro_rules! forward_binops {
    ($ty:ident) => {
        forward_binops!(@op $ty, Add, add, AddAssign, add_assign);
        forward_binops!(@op $ty, Sub, sub, SubAssign, sub_assign);
        forward_binops!(@op $ty, Mul, mul, MulAssign, mul_assign);
        forward_binops!(@op $ty, Div, div, DivAssign, div_assign);

        impl<F: Field> std::ops::Neg for $ty<F> {
            type Output = $ty<F>;
            #[inline]
            fn neg(self) -> $ty<F> {
                self.negate()
            }
        }

        impl<F: Field> std::ops::Neg for &$ty<F> {
            type Output = $ty<F>;
            #[inline]
            fn neg(self) -> $ty<F> {
                self.negate()
            }
        }
    };
    (@op $ty:ident, $op:ident, $method:ident, $op_assign:ident, $method_assign:ident) => {
        impl<F: Field> std::ops::$op<$ty<F>> for $ty<F> {
            type Output = $ty<F>;
            #[inline]
            fn $method(self, rhs: $ty<F>) -> $ty<F> {
                std::ops::$op::$method(&self, &rhs)
            }
        }

        impl<F: Field> std::ops::$op<&$ty<F>> for $ty<F> {
            type Output = $ty<F>;
            #[inline]
            fn $method(self, rhs: &$ty<F>) -> $ty<F> {
                std::ops::$op::$method(&self, rhs)
            }
        }

        impl<F: Field> std::ops::$op<$ty<F>> for &$ty<F> {
            type Output = $ty<F>;
            #[inline]
            fn $method(self, rhs: $ty<F>) -> $ty<F> {
                std::ops::$op::$method(self, &rhs)
            }
        }

        impl<F: Field> std::ops::$op_assign<&$ty<F>> for $ty<F> {
            #[inline]
            fn $method_assign(&mut self, rhs: &$ty<F>) {
                *self = std::ops::$op::$method(&*self, rhs);
            }
        }

        impl<F: Field> std::ops::$op_assign<$ty<F>> for $ty<F> {
            #[inline]
            fn $method_assign(&mut self, rhs: $ty<F>) {
                *self = std::ops::$op::$method(&*self, &rhs);
            }
        }
    };
}

/// Mixed arithmetic with a primitive float on either side.
macro_rules! impl_scalar_ops {
    ($ty:ident, $f:ty) => {
        impl std::ops::Add<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn add(self, rhs: $f) -> $ty<$f> {
                self.add_scalar(rhs)
            }
        }

        impl std::ops::Add<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn add(self, rhs: $ty<$f>) -> $ty<$f> {
                rhs.add_scalar(self)
            }
        }

        impl std::ops::Sub<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn sub(self, rhs: $f) -> $ty<$f> {
                self.subtract_scalar(rhs)
            }
        }

        impl std::ops::Sub<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn sub(self, rhs: $ty<$f>) -> $ty<$f> {
                rhs.negate().add_scalar(self)
            }
        }

        impl std::ops::Mul<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn mul(self, rhs: $f) -> $ty<$f> {
                self.multiply_scalar(rhs)
            }
        }

        impl std::ops::Mul<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn mul(self, rhs: $ty<$f>) -> $ty<$f> {
                rhs.multiply_scalar(self)
            }
        }

        impl std::ops::Div<$f> for $ty<$f> {
            type Output = $ty<$f>;
            #[inline]
            fn div(self, rhs: $f) -> $ty<$f> {
                self.divide_scalar(rhs)
            }
        }

        impl std::ops::Div<$ty<$f>> for $f {
            type Output = $ty<$f>;
            #[inline]
            fn div(self, rhs: $ty<$f>) -> $ty<$f> {
                rhs.reciprocal().multiply_scalar(self)
            }
        }
    };
}

pub mod gradient_ops;
pub mod std_ops;
pub mod structure_ops;
