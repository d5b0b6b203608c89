use approx::assert_relative_eq;
use multijet::{DsError, Gradient, Gradient64};

fn rosenbrock(x: &Gradient64, y: &Gradient64) -> Gradient64 {
    let a = 1.0 - x.clone();
    let b = y - &(x * x);
    &a * &a + 100.0 * (&b * &b)
}

#[test]
fn rosenbrock_gradient() {
    let x = Gradient::variable(2, 0, 1.0).unwrap();
    let y = Gradient::variable(2, 1, 2.0).unwrap();
    let f = rosenbrock(&x, &y);
    assert_relative_eq!(f.value, 100.0);
    assert_relative_eq!(f.grad[0], -400.0);
    assert_relative_eq!(f.grad[1], 200.0);

    let at_minimum = rosenbrock(
        &Gradient::variable(2, 0, 1.0).unwrap(),
        &Gradient::variable(2, 1, 1.0).unwrap(),
    );
    assert_eq!(at_minimum.grad, vec![0.0, 0.0]);
}

#[test]
fn constants_and_variables() {
    let c = Gradient::constant(2.5_f64, 3);
    assert_eq!(c.free_parameters(), 3);
    assert_eq!(c.order(), 1);
    assert_eq!(c.gradient(), &[0.0, 0.0, 0.0]);
    assert_eq!(
        Gradient::variable(3, 5, 1.0).unwrap_err(),
        DsError::OutOfRange {
            value: 5,
            lo: 0,
            hi: 2
        }
    );
}

#[test]
fn compose_scales_every_lane() {
    let g = Gradient::new(0.5_f64, vec![1.0, -2.0, 3.0]);
    let h = g.compose(&[0.25, 4.0]).unwrap();
    assert_eq!(h.value, 0.25);
    assert_eq!(h.grad, vec![4.0, -8.0, 12.0]);
    assert_eq!(
        g.compose(&[1.0]).unwrap_err(),
        DsError::DimensionMismatch {
            found: 1,
            expected: 2
        }
    );
}

#[test]
fn stacking_keeps_existing_lanes() {
    let x = Gradient::variable(1, 0, 2.0).unwrap().stack_variable();
    let y = Gradient::variable(2, 1, 3.0).unwrap();
    let f = &x * &y;
    assert_eq!(f.grad, vec![3.0, 2.0]);
}

#[test]
fn first_order_taylor_expansion() {
    let x = Gradient::variable(2, 0, 1.0).unwrap();
    let y = Gradient::variable(2, 1, 2.0).unwrap();
    let f = &x * &y;
    assert_relative_eq!(f.taylor(&[0.1, -0.2]).unwrap(), 2.0 + 0.2 - 0.2);
    assert_eq!(
        f.taylor(&[0.1]).unwrap_err(),
        DsError::DimensionMismatch {
            found: 1,
            expected: 2
        }
    );
}

#[test]
fn scalar_helpers() {
    let g = Gradient::new(4.0_f64, vec![2.0, -1.0]);
    assert_eq!(g.add_scalar(1.0).value, 5.0);
    assert_eq!(g.subtract_scalar(1.0).grad, g.grad);
    assert_eq!(g.multiply_scalar(2.0).grad, vec![4.0, -2.0]);
    assert_eq!(g.divide_scalar(2.0).grad, vec![1.0, -0.5]);
    let r = g.reciprocal();
    assert_eq!(r.value, 0.25);
    assert_eq!(r.grad, vec![-0.125, 0.0625]);
    assert_eq!((2.0 / g.clone()).value, 0.5);
}

#[test]
fn lexicographic_ordering() {
    let a = Gradient::new(1.0, vec![0.0, 5.0]);
    let b = Gradient::new(1.0, vec![1.0, 0.0]);
    let c = Gradient::new(2.0, vec![-9.0, -9.0]);
    assert!(a < b);
    assert!(b < c);
}

#[test]
fn display_lists_lanes() {
    let g = Gradient::new(1.0, vec![2.0, 3.0]);
    assert_eq!(g.to_string(), "1 + 2ε0 + 3ε1");
}

#[test]
#[should_panic(expected = "gradient operands")]
fn mismatched_lanes_panic() {
    let a = Gradient::variable(2, 0, 1.0).unwrap();
    let b = Gradient::variable(3, 0, 1.0).unwrap();
    let _ = &a + &b;
}
