//! The [`Field`] trait: the scalar arithmetic every derivative type is generic over.
//!
//! Derivative structures never look inside their scalar. They only need the
//! field operations bundled here, which keeps the engine usable with `f32`,
//! `f64` and (behind the `complex` feature) complex numbers.

use std::fmt::Debug;
use std::ops::Neg;

use num_traits::Num;

/// Scalar field used as the coefficient type of derivative structures.
///
/// Addition, subtraction, multiplication, division, zero and one come from
/// [`num_traits::Num`]; negation from [`Neg`].
pub trait Field: Clone + Debug + PartialEq + Num + Neg<Output = Self> + Send + Sync + 'static {
    /// Lift a double into the field.
    fn from_f64(value: f64) -> Self;

    /// Real part of the element, as a double.
    fn real(&self) -> f64;

    /// Magnitude used when choosing pivots in linear solves.
    fn magnitude(&self) -> f64;

    /// Multiplicative inverse.
    ///
    /// Zero maps to whatever the field does for `1 / 0` (infinity for IEEE
    /// floats); no error is raised here.
    #[inline]
    fn reciprocal(&self) -> Self {
        Self::one() / self.clone()
    }
}

impl Field for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn real(&self) -> f64 {
        f64::from(*self)
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        f64::from(self.abs())
    }
}

impl Field for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn real(&self) -> f64 {
        *self
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        self.abs()
    }
}

#[cfg(feature = "complex")]
mod complex {
    use num_complex::Complex;

    use super::Field;

    impl Field for Complex<f64> {
        #[inline]
        fn from_f64(value: f64) -> Self {
            Complex::new(value, 0.0)
        }

        #[inline]
        fn real(&self) -> f64 {
            self.re
        }

        #[inline]
        fn magnitude(&self) -> f64 {
            self.norm()
        }
    }

    impl Field for Complex<f32> {
        #[inline]
        fn from_f64(value: f64) -> Self {
            Complex::new(value as f32, 0.0)
        }

        #[inline]
        fn real(&self) -> f64 {
            f64::from(self.re)
        }

        #[inline]
        fn magnitude(&self) -> f64 {
            f64::from(self.norm())
        }
    }
}

/// Sign test used by `copy_sign`: NaN counts as positive whatever its sign bit.
#[inline]
pub(crate) fn is_negative<F: num_traits::Float>(x: F) -> bool {
    !x.is_nan() && x.is_sign_negative()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_widens_exactly() {
        let x = 0.1_f32;
        assert_eq!(x.real(), f64::from(0.1_f32));
        assert_eq!((-x).magnitude(), x.real());
    }

    #[test]
    fn reciprocal_of_zero_is_infinite() {
        assert!(0.0_f64.reciprocal().is_infinite());
        assert_eq!(4.0_f64.reciprocal(), 0.25);
    }

    #[test]
    fn nan_is_treated_as_positive() {
        assert!(!is_negative(f64::NAN));
        assert!(!is_negative(-f64::NAN));
        assert!(is_negative(-0.0_f64));
        assert!(!is_negative(0.0_f64));
    }
}
