#![cfg(feature = "complex")]

use multijet::{DsFactory, LuDecomposer, TaylorMap};
use num_complex::Complex64;

fn assert_close(actual: Complex64, expected: Complex64) {
    assert!(
        (actual - expected).norm() < 1e-13,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn holomorphic_polynomial() {
    let z0 = Complex64::new(1.0, 1.0);
    let factory = DsFactory::new(1, 3).unwrap();
    let z = factory.variable(0, z0).unwrap();
    let cube = &(&z * &z) * &z;
    let d = cube.all_derivatives();
    assert_close(d[0], z0 * z0 * z0);
    assert_close(d[1], 3.0 * z0 * z0);
    assert_close(d[2], 6.0 * z0);
    assert_close(d[3], Complex64::new(6.0, 0.0));
}

#[test]
fn complex_reciprocal() {
    let z0 = Complex64::new(0.5, -2.0);
    let factory = DsFactory::new(1, 2).unwrap();
    let r = factory.variable(0, z0).unwrap().reciprocal();
    let d = r.all_derivatives();
    assert_close(d[0], 1.0 / z0);
    assert_close(d[1], -1.0 / (z0 * z0));
    assert_close(d[2], 2.0 / (z0 * z0 * z0));
}

#[test]
fn complex_series_inversion() {
    // w = z + z² inverts to z = w − w² + 2w³ − …
    let factory = DsFactory::new(1, 3).unwrap();
    let z = factory.variable(0, Complex64::new(0.0, 0.0)).unwrap();
    let map = TaylorMap::new(vec![Complex64::new(0.0, 0.0)], vec![&z + &(&z * &z)]).unwrap();
    let inverse = map.invert(&LuDecomposer::default()).unwrap();
    let c = inverse.functions()[0].coefficients();
    assert_close(c[0], Complex64::new(0.0, 0.0));
    assert_close(c[1], Complex64::new(1.0, 0.0));
    assert_close(c[2], Complex64::new(-1.0, 0.0));
    assert_close(c[3], Complex64::new(2.0, 0.0));
}
