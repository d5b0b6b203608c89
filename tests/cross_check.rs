//! Every representation must agree with the general derivative structure.

use approx::assert_relative_eq;
use multijet::{
    Derivative, DerivativeStructure, DsError, DsFactory, Gradient, UnivariateDerivative1,
    UnivariateDerivative2,
};

fn close(actual: f64, expected: f64) {
    assert_relative_eq!(actual, expected, epsilon = 1e-13, max_relative = 1e-13);
}

fn assert_agree(
    ds: &DerivativeStructure<f64>,
    u1: &UnivariateDerivative1<f64>,
    u2: &UnivariateDerivative2<f64>,
    g: &Gradient<f64>,
) {
    let d = ds.all_derivatives();
    close(u1.f0, d[0]);
    close(u1.f1, d[1]);
    close(u2.f0, d[0]);
    close(u2.f1, d[1]);
    close(u2.f2, d[2]);
    close(g.value, d[0]);
    close(g.grad[0], d[1]);
}

/// Evaluate `$body` with `$v` bound to a univariate variable at `$x0` in every
/// representation and compare value, first and second derivatives.
macro_rules! cross_check {
    ($x0:expr, |$v:ident| $body:expr) => {{
        let x0: f64 = $x0;
        let factory = DsFactory::<f64>::new(1, 2).unwrap();
        let ds = {
            let $v = factory.variable(0, x0).unwrap();
            $body
        };
        let u1 = {
            let $v = UnivariateDerivative1::variable(x0);
            $body
        };
        let u2 = {
            let $v = UnivariateDerivative2::variable(x0);
            $body
        };
        let g = {
            let $v = Gradient::variable(1, 0, x0).unwrap();
            $body
        };
        assert_agree(&ds, &u1, &u2, &g);
    }};
}

#[test]
fn powers_and_roots() {
    cross_check!(0.8, |x| x.sqrt());
    cross_check!(0.8, |x| x.cbrt());
    cross_check!(-0.8, |x| x.cbrt());
    cross_check!(2.5, |x| x.root_n(5));
    cross_check!(-2.5, |x| x.root_n(3));
    cross_check!(1.3, |x| x.powf(2.7));
    cross_check!(-1.3, |x| x.powi(3));
    cross_check!(1.3, |x| x.powi(-2));
    cross_check!(1.3, |x| x.pow(&x.sin()));
    cross_check!(1.3, |x| x.reciprocal());
}

#[test]
fn exponentials_and_logarithms() {
    cross_check!(0.4, |x| x.exp());
    cross_check!(0.4, |x| x.exp_m1());
    cross_check!(0.4, |x| x.ln());
    cross_check!(0.4, |x| x.ln_1p());
    cross_check!(3.0, |x| x.log10());
    cross_check!(3.0, |x| x.log2());
}

#[test]
fn trigonometric() {
    cross_check!(0.4, |x| x.sin());
    cross_check!(0.4, |x| x.cos());
    cross_check!(0.4, |x| x.tan());
    cross_check!(0.4, |x| x.asin());
    cross_check!(-0.4, |x| x.acos());
    cross_check!(0.4, |x| x.atan());
    cross_check!(0.4, |x| x.sin_cos().1);
    cross_check!(0.7, |x| x.atan2(&x.cos()));
    cross_check!(0.7, |x| x.atan2(&(-&x.exp())));
    cross_check!(0.7, |x| x.to_degrees());
    cross_check!(40.0, |x| x.to_radians());
}

#[test]
fn hyperbolic() {
    cross_check!(0.4, |x| x.sinh());
    cross_check!(0.4, |x| x.cosh());
    cross_check!(0.4, |x| x.tanh());
    cross_check!(0.4, |x| x.sinh_cosh().0);
    cross_check!(0.4, |x| x.asinh());
    cross_check!(1.7, |x| x.acosh());
    cross_check!(0.4, |x| x.atanh());
}

#[test]
fn arithmetic_and_piecewise() {
    cross_check!(0.6, |x| &(&x * &x.exp()) / &(&x.sin() + &x.cos()));
    cross_check!(0.6, |x| &x - &x.sqrt());
    cross_check!(0.6, |x| x.hypot(&x.exp()));
    cross_check!(7.3, |x| x.remainder(&x.sqrt()));
    cross_check!(-0.6, |x| x.abs());
    cross_check!(-0.6, |x| x.signum());
    cross_check!(0.6, |x| x.copy_sign(-1.0));
    cross_check!(2.4, |x| x.floor());
    cross_check!(2.4, |x| x.ceil());
    cross_check!(2.5, |x| x.rint());
}

#[test]
fn binary_representation() {
    cross_check!(0.6, |x| x.scalb(3));
    cross_check!(0.6, |x| x.scalb(-5));
    cross_check!(0.6, |x| x.ulp());
    cross_check!(7.3, |x| x.remainder_scalar(2.0));
    cross_check!(-7.3, |x| x.remainder_scalar(2.0));

    let x = UnivariateDerivative2::variable(6.0_f64);
    assert_eq!(x.exponent(), 2);
    assert_eq!(x.ulp().f0, 4.0 * f64::EPSILON);
    assert_eq!(x.ulp().f1, 0.0);
    let r = x.remainder_scalar(4.0);
    assert_eq!((r.f0, r.f1), (-2.0, 1.0));
    assert_eq!(Gradient::variable(2, 1, 0.3_f64).unwrap().exponent(), -2);
    let ds = DsFactory::<f64>::new(2, 2).unwrap().variable(0, 3.0).unwrap();
    let scaled = ds.scalb(-2);
    assert_eq!(scaled.value(), 0.75);
    assert_eq!(scaled.first_partial(0).unwrap(), 0.25);
}

#[test]
fn constant_base_power() {
    let (a, x0): (f64, f64) = (1.7, 0.6);
    let factory = DsFactory::<f64>::new(1, 2).unwrap();
    let x = factory.variable(0, x0).unwrap();
    let ds = DerivativeStructure::const_pow(a, &x);
    let u1 = UnivariateDerivative1::const_pow(a, &UnivariateDerivative1::variable(x0));
    let u2 = UnivariateDerivative2::const_pow(a, &UnivariateDerivative2::variable(x0));
    let g = Gradient::const_pow(a, &Gradient::variable(1, 0, x0).unwrap());
    assert_agree(&ds, &u1, &u2, &g);

    // aˣ = exp(x ln a)
    let reference = x.multiply_scalar(a.ln()).exp();
    for (actual, expected) in ds.all_derivatives().iter().zip(reference.all_derivatives()) {
        close(*actual, expected);
    }
}

#[test]
fn constant_base_power_of_zero() {
    let at_zero = UnivariateDerivative1::const_pow(0.0, &UnivariateDerivative1::variable(0.0_f64));
    assert_eq!(at_zero.f0, 1.0);
    assert_eq!(at_zero.f1, f64::NEG_INFINITY);

    let negative = Gradient::const_pow(0.0, &Gradient::variable(1, 0, -1.0_f64).unwrap());
    assert!(negative.value.is_nan());
    assert!(negative.grad[0].is_nan());

    let positive = UnivariateDerivative2::const_pow(0.0, &UnivariateDerivative2::variable(2.0_f64));
    assert_eq!((positive.f0, positive.f1, positive.f2), (0.0, 0.0, 0.0));
}

/// `hypot` of `(3s, 4s)` as a second-order structure: value `5s`, gradient
/// `(0.6, 0.8)` and Hessian `(16, −12, 9) / (125 s)`.
fn check_hypot_at_scale(s: f64) {
    let factory = DsFactory::<f64>::new(2, 2).unwrap();
    let x = factory.variable(0, 3.0 * s).unwrap();
    let y = factory.variable(1, 4.0 * s).unwrap();
    let h = x.hypot(&y);
    let rel = |actual: f64, expected: f64| {
        assert_relative_eq!(actual, expected, max_relative = 1e-14);
    };
    rel(h.value(), 5.0 * s);
    rel(h.partial_derivative(&[1, 0]).unwrap(), 0.6);
    rel(h.partial_derivative(&[0, 1]).unwrap(), 0.8);
    rel(h.partial_derivative(&[2, 0]).unwrap(), 0.128 / s);
    rel(h.partial_derivative(&[1, 1]).unwrap(), -0.096 / s);
    rel(h.partial_derivative(&[0, 2]).unwrap(), 0.072 / s);

    let gx = Gradient::variable(2, 0, 3.0 * s).unwrap();
    let gy = Gradient::variable(2, 1, 4.0 * s).unwrap();
    let g = gx.hypot(&gy);
    rel(g.value, 5.0 * s);
    rel(g.grad[0], 0.6);
    rel(g.grad[1], 0.8);
}

#[test]
fn hypot_at_extreme_magnitudes() {
    check_hypot_at_scale(1e200);
    check_hypot_at_scale(1e-200);
    check_hypot_at_scale(1.0);

    let u = UnivariateDerivative1::variable(3e-200_f64);
    let h = u.hypot(&UnivariateDerivative1::constant(4e-200));
    assert_relative_eq!(h.f1, 0.6, max_relative = 1e-14);
}

#[test]
fn hypot_neglects_a_far_smaller_operand() {
    let x = Gradient::variable(2, 0, -1e10_f64).unwrap();
    let y = Gradient::variable(2, 1, 1e-10_f64).unwrap();
    let h = x.hypot(&y);
    assert_eq!(h.value, 1e10);
    // |x| of a negative x
    assert_eq!(h.grad, vec![-1.0, 0.0]);
    assert_eq!(y.hypot(&x).grad, vec![-1.0, 0.0]);
}

#[test]
fn linear_combinations_agree() {
    let x0 = 0.3;
    let factory = DsFactory::<f64>::new(1, 2).unwrap();
    let x = factory.variable(0, x0).unwrap();
    let ds = DerivativeStructure::linear_combination(&[2.0, -0.5], &[x.sin(), x.exp()]).unwrap();

    let u = UnivariateDerivative2::variable(x0);
    let u2 = UnivariateDerivative2::linear_combination(&[2.0, -0.5], &[u.sin(), u.exp()]).unwrap();

    let g = Gradient::variable(1, 0, x0).unwrap();
    let g = Gradient::linear_combination(&[2.0, -0.5], &[g.sin(), g.exp()]).unwrap();

    let d = ds.all_derivatives();
    close(u2.f0, d[0]);
    close(u2.f1, d[1]);
    close(u2.f2, d[2]);
    close(g.value, d[0]);
    close(g.grad[0], d[1]);
}

#[test]
fn gradients_agree_with_two_parameter_structures() {
    let (x0, y0) = (0.8, -1.4);
    let factory = DsFactory::<f64>::new(2, 1).unwrap();
    let x = factory.variable(0, x0).unwrap();
    let y = factory.variable(1, y0).unwrap();
    let gx = Gradient::variable(2, 0, x0).unwrap();
    let gy = Gradient::variable(2, 1, y0).unwrap();

    let pairs = [
        (x.atan2(&y), gx.atan2(&gy)),
        (y.atan2(&x), gy.atan2(&gx)),
        (x.hypot(&y), gx.hypot(&gy)),
        (&x * &y.exp(), &gx * &gy.exp()),
        (&x.sin() / &y, &gx.sin() / &gy),
        (x.pow(&(&y * &y)), gx.pow(&(&gy * &gy))),
    ];
    for (ds, g) in &pairs {
        close(g.value(), ds.value());
        for v in 0..2 {
            close(g.first_partial(v).unwrap(), ds.first_partial(v).unwrap());
        }
        assert_eq!(g.to_structure().unwrap().free_parameters(), 2);
    }
}

#[test]
fn conversions_to_and_from_structures() {
    let u = UnivariateDerivative2::variable(0.5_f64).exp();
    let ds = u.to_structure().unwrap();
    assert_eq!(ds.order(), 2);
    let back = UnivariateDerivative2::try_from(&ds).unwrap();
    close(back.f0, u.f0);
    close(back.f1, u.f1);
    close(back.f2, u.f2);
    close(u.partial_derivative(&[2]).unwrap(), u.f2);

    let u1 = UnivariateDerivative1::variable(0.5_f64).sin();
    assert_eq!(
        UnivariateDerivative1::try_from(&ds).unwrap_err(),
        DsError::DimensionMismatch {
            found: 2,
            expected: 1
        }
    );
    let back1 = UnivariateDerivative1::try_from(&u1.to_structure().unwrap()).unwrap();
    assert_eq!(back1, u1);

    let two = DsFactory::<f64>::new(2, 1).unwrap();
    let g = Gradient::try_from(&two.variable(1, 3.0).unwrap()).unwrap();
    assert_eq!(g.grad, vec![0.0, 1.0]);
    assert_eq!(
        Gradient::try_from(&ds).unwrap_err(),
        DsError::DimensionMismatch {
            found: 2,
            expected: 1
        }
    );
}

#[test]
fn trait_objects_share_queries() {
    fn describe<D: Derivative<f64>>(d: &D) -> (usize, usize, f64) {
        (d.free_parameters(), d.order(), d.real())
    }
    let x = 1.25;
    assert_eq!(describe(&UnivariateDerivative1::variable(x)), (1, 1, x));
    assert_eq!(describe(&UnivariateDerivative2::variable(x)), (1, 2, x));
    assert_eq!(describe(&Gradient::variable(3, 2, x).unwrap()), (3, 1, x));
    let ds = DsFactory::new(2, 4).unwrap().variable(0, x).unwrap();
    assert_eq!(describe(&ds), (2, 4, x));
    assert_eq!(
        UnivariateDerivative2::variable(x).partial_derivative(&[3]),
        Err(DsError::DerivationOrderNotAllowed { order: 3, max: 2 })
    );
}
