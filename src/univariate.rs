//! Derivative arrays of univariate elementary functions.
//!
//! Every supplier returns `[g(x), g'(x), …, g⁽ⁿ⁾(x)]`, the input expected by
//! [`DerivativeStructure::compose`](crate::DerivativeStructure::compose) and
//! the typed wrappers. Closed forms are used where the derivatives have one;
//! the inverse trigonometric and hyperbolic families go through the
//! truncated Taylor series of `g(x + t)` in `t` (coefficients
//! `c[k] = g⁽ᵏ⁾(x) / k!`) and are rescaled by `k!` at the end.

use num_traits::Float;

use crate::field::Field;

// ══════════════════════════════════════════════
//  Series helpers
// ══════════════════════════════════════════════

#[inline]
fn real<F: Field + Float>(value: f64) -> F {
    F::from_f64(value)
}

/// Turn Taylor coefficients `g⁽ᵏ⁾/k!` into derivatives `g⁽ᵏ⁾`.
fn to_derivatives<F: Field + Float>(mut c: Vec<F>) -> Vec<F> {
    let mut factorial = 1.0;
    for (k, ck) in c.iter_mut().enumerate().skip(1) {
        factorial *= k as f64;
        *ck = *ck * real(factorial);
    }
    c
}

/// `c[0] = c0`, `c[k] = g[k-1] / k`: the series whose `t`-derivative is `g`.
fn integrate_series<F: Field + Float>(c0: F, g: &[F], order: usize) -> Vec<F> {
    let mut c = Vec::with_capacity(order + 1);
    c.push(c0);
    for k in 1..=order {
        c.push(g[k - 1] / real(k as f64));
    }
    c
}

/// Series of `(q₀ + q₁t + q₂t²)^α` up to `t^order`.
///
/// From `q g' = α q' g`:
/// `g[k] = Σ_{j=1}^{min(k,2)} (αj − (k − j)) q[j] g[k−j] / (k q₀)`.
fn quadratic_power<F: Field + Float>(q: [F; 3], alpha: F, order: usize) -> Vec<F> {
    let mut g = Vec::with_capacity(order + 1);
    g.push(q[0].powf(alpha));
    for k in 1..=order {
        let mut sum = F::zero();
        for j in 1..=k.min(2) {
            let weight = alpha * real(j as f64) - real((k - j) as f64);
            sum = sum + weight * q[j] * g[k - j];
        }
        g.push(sum / (real::<F>(k as f64) * q[0]));
    }
    g
}

/// `c = tan(x + t)` (`sign = 1`) or `tanh(x + t)` (`sign = −1`).
///
/// `c' = 1 ± c²`, so with `s = 1 ± c²`: `c[k] = s[k−1] / k` and
/// `s[k] = ±Σ_{j=0}^{k} c[j] c[k−j]`.
fn tangent_series<F: Field + Float>(c0: F, sign: F, order: usize) -> Vec<F> {
    let mut c = vec![F::zero(); order + 1];
    let mut s = vec![F::zero(); order + 1];
    c[0] = c0;
    s[0] = F::one() + sign * c0 * c0;
    for k in 1..=order {
        c[k] = s[k - 1] / real(k as f64);
        let mut sum = F::zero();
        for j in 0..=k {
            sum = sum + c[j] * c[k - j];
        }
        s[k] = sign * sum;
    }
    c
}

/// Falling factorial `e (e − 1) ⋯ (e − k + 1)` for `k = 0..=order`.
fn falling_factorials<F: Field + Float>(exponent: F, order: usize) -> Vec<F> {
    let mut ff = Vec::with_capacity(order + 1);
    let mut current = F::one();
    ff.push(current);
    for k in 0..order {
        current = current * (exponent - real(k as f64));
        ff.push(current);
    }
    ff
}

// ══════════════════════════════════════════════
//  Powers and roots
// ══════════════════════════════════════════════

/// `x^p` for a real exponent.
pub fn powf<F: Field + Float>(x: F, p: F, order: usize) -> Vec<F> {
    falling_factorials(p, order)
        .into_iter()
        .enumerate()
        .map(|(k, ff)| {
            if ff == F::zero() {
                F::zero()
            } else {
                ff * x.powf(p - real(k as f64))
            }
        })
        .collect()
}

/// `x^n` for an integer exponent.
pub fn powi<F: Field + Float>(x: F, n: i32, order: usize) -> Vec<F> {
    falling_factorials(real::<F>(f64::from(n)), order)
        .into_iter()
        .enumerate()
        .map(|(k, ff)| {
            // derivatives past the degree of a polynomial vanish, even at x = 0
            if ff == F::zero() {
                F::zero()
            } else {
                ff * x.powi(n - k as i32)
            }
        })
        .collect()
}

/// `ⁿ√x`, defined for negative `x` when `n` is odd.
pub fn root_n<F: Field + Float>(x: F, n: i32, order: usize) -> Vec<F> {
    let root = match n {
        2 => x.sqrt(),
        3 => x.cbrt(),
        _ if x < F::zero() && n % 2 != 0 => -(-x).powf(real(1.0 / f64::from(n))),
        _ => x.powf(real(1.0 / f64::from(n))),
    };
    // d[k] = ff(1/n, k) · root / xᵏ
    let inv_x = F::one() / x;
    let mut scale = root;
    let mut d = Vec::with_capacity(order + 1);
    d.push(root);
    for ff in falling_factorials(real::<F>(1.0 / f64::from(n)), order).into_iter().skip(1) {
        scale = scale * inv_x;
        d.push(ff * scale);
    }
    d
}

pub fn sqrt<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    root_n(x, 2, order)
}

pub fn cbrt<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    root_n(x, 3, order)
}

// ══════════════════════════════════════════════
//  Exponentials and logarithms
// ══════════════════════════════════════════════

pub fn exp<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    vec![x.exp(); order + 1]
}

/// `aˣ` for a constant base `a`.
///
/// A zero base gives `1` with alternating infinite derivatives at `x = 0`,
/// NaN everywhere for `x < 0` and zero for `x > 0`.
pub fn exp_base<F: Field + Float>(a: F, x: F, order: usize) -> Vec<F> {
    if a == F::zero() {
        if x == F::zero() {
            let mut d = Vec::with_capacity(order + 1);
            d.push(F::one());
            let mut infinity = F::infinity();
            for _ in 0..order {
                infinity = -infinity;
                d.push(infinity);
            }
            return d;
        }
        let fill = if x < F::zero() { F::nan() } else { F::zero() };
        return vec![fill; order + 1];
    }
    let ln_a = a.ln();
    let mut current = a.powf(x);
    let mut d = Vec::with_capacity(order + 1);
    d.push(current);
    for _ in 0..order {
        current = current * ln_a;
        d.push(current);
    }
    d
}

/// `eˣ − 1`: only the value differs from [`exp`].
pub fn exp_m1<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let mut d = exp(x, order);
    d[0] = x.exp_m1();
    d
}

/// Derivatives of `ln(x)` scaled by `1 / base_ln`, value supplied separately.
///
/// `d[1] = 1/x`, `d[k+1] = −k d[k] / x`.
fn log_derivatives<F: Field + Float>(value: F, x: F, base_ln: F, order: usize) -> Vec<F> {
    let mut d = Vec::with_capacity(order + 1);
    d.push(value);
    if order >= 1 {
        let inv_x = F::one() / x;
        let mut current = inv_x / base_ln;
        d.push(current);
        for k in 1..order {
            current = -current * real(k as f64) * inv_x;
            d.push(current);
        }
    }
    d
}

pub fn ln<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    log_derivatives(x.ln(), x, F::one(), order)
}

/// `ln(1 + x)`, accurate for small `x`.
pub fn ln_1p<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    log_derivatives(x.ln_1p(), F::one() + x, F::one(), order)
}

pub fn log10<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    log_derivatives(x.log10(), x, real(std::f64::consts::LN_10), order)
}

pub fn log2<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    log_derivatives(x.log2(), x, real(std::f64::consts::LN_2), order)
}

// ══════════════════════════════════════════════
//  Trigonometric
// ══════════════════════════════════════════════

/// Cycle `[a, b, −a, −b, a, …]` of length `order + 1`.
fn four_cycle<F: Field + Float>(a: F, b: F, order: usize) -> Vec<F> {
    let cycle = [a, b, -a, -b];
    (0..=order).map(|k| cycle[k % 4]).collect()
}

pub fn sin<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let (s, c) = x.sin_cos();
    four_cycle(s, c, order)
}

pub fn cos<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let (s, c) = x.sin_cos();
    four_cycle(c, -s, order)
}

pub fn tan<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    to_derivatives(tangent_series(x.tan(), F::one(), order))
}

/// `atan` via `c' = (1 + (x+t)²)⁻¹`.
pub fn atan<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let g = quadratic_power([F::one() + x * x, x + x, F::one()], -F::one(), order);
    to_derivatives(integrate_series(x.atan(), &g, order))
}

/// `asin` via `c' = (1 − (x+t)²)^(−1/2)`.
pub fn asin<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let g = quadratic_power([F::one() - x * x, -(x + x), -F::one()], real(-0.5), order);
    to_derivatives(integrate_series(x.asin(), &g, order))
}

/// `acos = π/2 − asin`.
pub fn acos<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let mut d: Vec<F> = asin(x, order).into_iter().map(|v| -v).collect();
    d[0] = x.acos();
    d
}

// ══════════════════════════════════════════════
//  Hyperbolic
// ══════════════════════════════════════════════

/// Alternation `[a, b, a, b, …]` of length `order + 1`.
fn two_cycle<F: Field + Float>(a: F, b: F, order: usize) -> Vec<F> {
    (0..=order).map(|k| if k % 2 == 0 { a } else { b }).collect()
}

pub fn sinh<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    two_cycle(x.sinh(), x.cosh(), order)
}

pub fn cosh<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    two_cycle(x.cosh(), x.sinh(), order)
}

pub fn tanh<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    to_derivatives(tangent_series(x.tanh(), -F::one(), order))
}

pub fn asinh<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let g = quadratic_power([F::one() + x * x, x + x, F::one()], real(-0.5), order);
    to_derivatives(integrate_series(x.asinh(), &g, order))
}

pub fn acosh<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let g = quadratic_power([x * x - F::one(), x + x, F::one()], real(-0.5), order);
    to_derivatives(integrate_series(x.acosh(), &g, order))
}

pub fn atanh<F: Field + Float>(x: F, order: usize) -> Vec<F> {
    let g = quadratic_power([F::one() - x * x, -(x + x), -F::one()], -F::one(), order);
    to_derivatives(integrate_series(x.atanh(), &g, order))
}
