use approx::assert_relative_eq;
use multijet::{DsError, UnivariateDerivative1, UnivariateDerivative2, UnivariateDerivative2_64};

/// Central finite difference: (f(x+h) - f(x-h)) / 2h
fn finite_diff(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = 1e-6;
    (f(x + h) - f(x - h)) / (2.0 * h)
}

#[test]
fn product_rule() {
    // (3 + ε)(4 + ε) = 12 + 7ε
    let a = UnivariateDerivative1::new(3.0_f64, 1.0);
    let b = UnivariateDerivative1::new(4.0, 1.0);
    let c = a * b;
    assert_eq!(c.f0, 12.0);
    assert_eq!(c.f1, 7.0);
}

#[test]
fn second_derivative_of_polynomial() {
    // x³ − 2x at 1.5
    let x = UnivariateDerivative2::variable(1.5_f64);
    let f = x * x * x - 2.0 * x;
    assert_relative_eq!(f.value(), 0.375);
    assert_relative_eq!(f.first_derivative(), 4.75);
    assert_relative_eq!(f.second_derivative(), 9.0);
}

#[test]
fn elementary_against_finite_differences() {
    let x0 = 0.7;
    type U2 = UnivariateDerivative2_64;
    let cases: [(fn(U2) -> U2, fn(f64) -> f64); 5] = [
        (|x: U2| x.sin() * x.exp(), |x: f64| x.sin() * x.exp()),
        (|x: U2| x.tan().atan(), |x: f64| x.tan().atan()),
        (|x: U2| (x * x + 1.0).sqrt().ln(), |x: f64| (x * x + 1.0).sqrt().ln()),
        (|x: U2| x.cosh() / x.sinh(), |x: f64| x.cosh() / x.sinh()),
        (|x: U2| x.powf(1.5).asinh(), |x: f64| x.powf(1.5).asinh()),
    ];
    for (dual, plain) in cases {
        let f = dual(UnivariateDerivative2::variable(x0));
        assert_relative_eq!(f.f0, plain(x0), max_relative = 1e-14);
        assert_relative_eq!(f.f1, finite_diff(plain, x0), epsilon = 1e-8, max_relative = 1e-7);
        let slope = |x: f64| dual(UnivariateDerivative2::variable(x)).f1;
        assert_relative_eq!(f.f2, finite_diff(slope, x0), epsilon = 1e-8, max_relative = 1e-7);
    }
}

#[test]
fn compose_applies_chain_rule() {
    // g(u) with u = 2x + x², at x = 1: u' = 4, u'' = 2
    let x = UnivariateDerivative2::variable(1.0_f64);
    let u = 2.0 * x + x * x;
    let h = u.compose(&[5.0, 3.0, -1.0]).unwrap();
    assert_eq!(h.f0, 5.0);
    assert_eq!(h.f1, 12.0);
    // g'·u'' + g''·u'²
    assert_eq!(h.f2, 3.0 * 2.0 - 16.0);
    assert_eq!(
        u.compose(&[5.0, 3.0]).unwrap_err(),
        DsError::DimensionMismatch {
            found: 2,
            expected: 3
        }
    );

    let v = UnivariateDerivative1::variable(1.0_f64);
    assert_eq!(
        v.compose(&[1.0, 2.0, 3.0]).unwrap_err(),
        DsError::DimensionMismatch {
            found: 3,
            expected: 2
        }
    );
}

#[test]
fn taylor_expansions() {
    let e = UnivariateDerivative2::variable(0.0_f64).exp();
    assert_relative_eq!(e.taylor(0.1), 1.105, epsilon = 1e-15);
    let s = UnivariateDerivative1::variable(0.0_f64).sin();
    assert_relative_eq!(s.taylor(0.1), 0.1);
}

#[test]
fn constants_from_scalars() {
    let c = UnivariateDerivative2::from(3.0);
    assert_eq!(c, UnivariateDerivative2::constant(3.0));
    let d = UnivariateDerivative1::from(3.0);
    assert_eq!(d.first_derivative(), 0.0);
    assert_eq!(UnivariateDerivative2::<f64>::default().value(), 0.0);
}

#[test]
fn ordering_and_display() {
    let a = UnivariateDerivative1::new(1.0, 2.0);
    let b = UnivariateDerivative1::new(1.0, 3.0);
    assert!(a < b);
    assert!(UnivariateDerivative2::new(0.0, 9.0, 9.0) < UnivariateDerivative2::new(1.0, 0.0, 0.0));
    assert_eq!(a.to_string(), "1 + 2ε");
    assert_eq!(UnivariateDerivative2::new(1.0, 2.0, 3.0).to_string(), "[1, 2, 3]");
}

#[test]
fn single_precision() {
    let x = UnivariateDerivative2::variable(4.0f32);
    let r = x.sqrt();
    assert_relative_eq!(r.f0, 2.0f32);
    assert_relative_eq!(r.f1, 0.25f32);
    assert_relative_eq!(r.f2, -1.0f32 / 32.0, max_relative = 1e-6);
}
