//! Elementary functions on every derivative representation.
//!
//! Each function fetches the derivative array of its univariate counterpart
//! from [`univariate`] and composes it with the operand, so the four
//! representations agree by construction up to rounding. Two-argument
//! functions are written in terms of the operators; for
//! [`DerivativeStructure`] and [`Gradient`] they panic when the operands
//! have different shapes, like the operators themselves.
//!
//! Only available for real scalars (`F: num_traits::Float`).

use num_traits::Float;

use crate::derivative1::UnivariateDerivative1;
use crate::derivative2::UnivariateDerivative2;
use crate::field::{is_negative, Field};
use crate::gradient::Gradient;
use crate::structure::DerivativeStructure;
use crate::univariate;

/// Round half to even.
fn rint<F: Float>(x: F) -> F {
    let floor = x.floor();
    let diff = x - floor;
    let two = F::one() + F::one();
    let half = two.recip();
    if diff < half {
        floor
    } else if diff > half || (floor / two).floor() * two != floor {
        floor + F::one()
    } else {
        floor
    }
}

/// `x · 2ⁿ`, split in two factors so neither power of two overflows alone.
fn scalb<F: Float>(x: F, n: i32) -> F {
    let two = F::one() + F::one();
    let half = n / 2;
    x * two.powi(half) * two.powi(n - half)
}

/// Unbiased binary exponent, `⌊log₂|x|⌋` for normal values. Zero and
/// subnormals report one below the smallest normal exponent, NaN and
/// infinities one above the largest.
fn exponent<F: Float>(x: F) -> i32 {
    if !x.is_finite() {
        return exponent(F::max_value()) + 1;
    }
    if x.abs() < F::min_positive_value() {
        return exponent(F::min_positive_value()) - 1;
    }
    let (mantissa, exp, _) = x.integer_decode();
    i32::from(exp) + 63 - mantissa.leading_zeros() as i32
}

/// Distance from `|x|` to the next larger representable magnitude.
fn ulp<F: Float>(x: F) -> F {
    if x.is_nan() {
        return x;
    }
    if x.is_infinite() {
        return F::infinity();
    }
    let e = exponent(x).max(exponent(F::min_positive_value()));
    scalb(F::epsilon(), e)
}

macro_rules! impl_elementary {
    ($ty:ident) => {
        impl<F: Field + Float> $ty<F> {
            // ── Powers ──

            pub fn sqrt(&self) -> Self {
                self.apply(&univariate::sqrt(self.value(), self.order()))
            }

            pub fn cbrt(&self) -> Self {
                self.apply(&univariate::cbrt(self.value(), self.order()))
            }

            /// `n`-th root; odd roots of negative values are real.
            pub fn root_n(&self, n: i32) -> Self {
                self.apply(&univariate::root_n(self.value(), n, self.order()))
            }

            pub fn powf(&self, p: F) -> Self {
                self.apply(&univariate::powf(self.value(), p, self.order()))
            }

            pub fn powi(&self, n: i32) -> Self {
                self.apply(&univariate::powi(self.value(), n, self.order()))
            }

            /// `self^e = exp(e · ln(self))`, with the value taken from `powf`.
            pub fn pow(&self, e: &Self) -> Self {
                let value = self.value().powf(e.value());
                (&self.ln() * e).exp().with_value(value)
            }

            /// `baseˣ` for a constant base, with `x = self`.
            pub fn const_pow(base: F, x: &Self) -> Self {
                x.apply(&univariate::exp_base(base, x.value(), x.order()))
            }

            // ── Exponentials and logarithms ──

            pub fn exp(&self) -> Self {
                self.apply(&univariate::exp(self.value(), self.order()))
            }

            pub fn exp_m1(&self) -> Self {
                self.apply(&univariate::exp_m1(self.value(), self.order()))
            }

            pub fn ln(&self) -> Self {
                self.apply(&univariate::ln(self.value(), self.order()))
            }

            pub fn ln_1p(&self) -> Self {
                self.apply(&univariate::ln_1p(self.value(), self.order()))
            }

            pub fn log10(&self) -> Self {
                self.apply(&univariate::log10(self.value(), self.order()))
            }

            pub fn log2(&self) -> Self {
                self.apply(&univariate::log2(self.value(), self.order()))
            }

            // ── Trigonometric ──

            pub fn sin(&self) -> Self {
                self.apply(&univariate::sin(self.value(), self.order()))
            }

            pub fn cos(&self) -> Self {
                self.apply(&univariate::cos(self.value(), self.order()))
            }

            pub fn sin_cos(&self) -> (Self, Self) {
                (self.sin(), self.cos())
            }

            pub fn tan(&self) -> Self {
                self.apply(&univariate::tan(self.value(), self.order()))
            }

            pub fn asin(&self) -> Self {
                self.apply(&univariate::asin(self.value(), self.order()))
            }

            pub fn acos(&self) -> Self {
                self.apply(&univariate::acos(self.value(), self.order()))
            }

            pub fn atan(&self) -> Self {
                self.apply(&univariate::atan(self.value(), self.order()))
            }

            /// Four-quadrant `atan(self / x)` via the half-angle identity, which
            /// stays smooth away from the origin.
            pub fn atan2(&self, x: &Self) -> Self {
                let r = (&(self * self) + &(x * x)).sqrt();
                let two = F::one() + F::one();
                let angle = if x.value() >= F::zero() {
                    (self / &(&r + x)).atan().multiply_scalar(two)
                } else {
                    let tmp = (self / &(&r - x)).atan().multiply_scalar(-two);
                    let pi = F::from_f64(std::f64::consts::PI);
                    if tmp.value() <= F::zero() {
                        tmp.add_scalar(-pi)
                    } else {
                        tmp.add_scalar(pi)
                    }
                };
                angle.with_value(self.value().atan2(x.value()))
            }

            // ── Hyperbolic ──

            pub fn sinh(&self) -> Self {
                self.apply(&univariate::sinh(self.value(), self.order()))
            }

            pub fn cosh(&self) -> Self {
                self.apply(&univariate::cosh(self.value(), self.order()))
            }

            pub fn sinh_cosh(&self) -> (Self, Self) {
                (self.sinh(), self.cosh())
            }

            pub fn tanh(&self) -> Self {
                self.apply(&univariate::tanh(self.value(), self.order()))
            }

            pub fn asinh(&self) -> Self {
                self.apply(&univariate::asinh(self.value(), self.order()))
            }

            pub fn acosh(&self) -> Self {
                self.apply(&univariate::acosh(self.value(), self.order()))
            }

            pub fn atanh(&self) -> Self {
                self.apply(&univariate::atanh(self.value(), self.order()))
            }

            // ── Two-argument ──

            /// `sqrt(self² + y²)` without intermediate overflow or underflow;
            /// infinite or NaN operands give a constant.
            pub fn hypot(&self, y: &Self) -> Self {
                let (a, b) = (self.value(), y.value());
                if a.is_infinite() || b.is_infinite() {
                    return self.constant_like(F::infinity());
                }
                if a.is_nan() || b.is_nan() {
                    return self.constant_like(F::nan());
                }
                let (exp_a, exp_b) = (exponent(a), exponent(b));
                if exp_a > exp_b + 27 {
                    // y² is below half an ulp of self²
                    return self.abs();
                }
                if exp_b > exp_a + 27 {
                    return y.abs();
                }
                let middle = (exp_a + exp_b) / 2;
                let sa = self.scalb(-middle);
                let sb = y.scalb(-middle);
                (&(&sa * &sa) + &(&sb * &sb))
                    .sqrt()
                    .scalb(middle)
                    .with_value(a.hypot(b))
            }

            /// IEEE remainder `self − rint(self / divisor) · divisor`.
            pub fn remainder(&self, divisor: &Self) -> Self {
                let (a, b) = (self.value(), divisor.value());
                let k = rint(a / b);
                (self - &divisor.multiply_scalar(k)).with_value(a - k * b)
            }

            /// IEEE remainder by a constant divisor.
            pub fn remainder_scalar(&self, divisor: F) -> Self {
                let a = self.value();
                let k = rint(a / divisor);
                self.add_scalar(-(k * divisor)).with_value(a - k * divisor)
            }

            // ── Binary representation ──

            /// `self · 2ⁿ`, exact unless it overflows or underflows.
            pub fn scalb(&self, n: i32) -> Self {
                let two = F::one() + F::one();
                let half = n / 2;
                self.multiply_scalar(two.powi(half))
                    .multiply_scalar(two.powi(n - half))
            }

            /// Unbiased binary exponent of the value.
            pub fn exponent(&self) -> i32 {
                exponent(self.value())
            }

            /// Unit in the last place of the value, as a constant.
            pub fn ulp(&self) -> Self {
                self.constant_like(ulp(self.value()))
            }

            // ── Sign and rounding ──

            /// Absolute value by sign bit, so `-0.0` is flipped too.
            pub fn abs(&self) -> Self {
                if self.value().is_sign_negative() {
                    self.negate()
                } else {
                    self.clone()
                }
            }

            /// `±1` or zero as a constant; derivatives vanish.
            pub fn signum(&self) -> Self {
                let v = self.value();
                if v == F::zero() || v.is_nan() {
                    self.constant_like(v)
                } else {
                    self.constant_like(v.signum())
                }
            }

            /// Magnitude of `self` with the sign of `sign`; NaN counts as positive.
            pub fn copy_sign(&self, sign: F) -> Self {
                if is_negative(self.value()) == is_negative(sign) {
                    self.clone()
                } else {
                    self.negate()
                }
            }

            pub fn copy_sign_of(&self, sign: &Self) -> Self {
                self.copy_sign(sign.value())
            }

            pub fn floor(&self) -> Self {
                self.constant_like(self.value().floor())
            }

            pub fn ceil(&self) -> Self {
                self.constant_like(self.value().ceil())
            }

            /// Nearest integer, ties to even.
            pub fn rint(&self) -> Self {
                self.constant_like(rint(self.value()))
            }

            pub fn to_degrees(&self) -> Self {
                self.multiply_scalar(F::from_f64(180.0 / std::f64::consts::PI))
            }

            pub fn to_radians(&self) -> Self {
                self.multiply_scalar(F::from_f64(std::f64::consts::PI / 180.0))
            }
        }
    };
}

impl_elementary!(DerivativeStructure);
impl_elementary!(Gradient);
impl_elementary!(UnivariateDerivative1);
impl_elementary!(UnivariateDerivative2);
