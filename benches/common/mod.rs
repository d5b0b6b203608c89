use multijet::{DerivativeStructure, DsFactory};

// ─── Rosenbrock ────────────────────────────────────────────────────────────

pub fn rosenbrock(x: &[DerivativeStructure<f64>]) -> DerivativeStructure<f64> {
    (0..x.len() - 1)
        .map(|i| {
            let t1 = 1.0 - x[i].clone();
            let t2 = &x[i + 1] - &(&x[i] * &x[i]);
            &t1 * &t1 + 100.0 * (&t2 * &t2)
        })
        .reduce(|a, b| a + b)
        .unwrap()
}

// ─── Transcendental mix ────────────────────────────────────────────────────
// Σ exp(sin(x_i))·ln(1 + x_i²): exercises the composition table.

pub fn transcendental(x: &[DerivativeStructure<f64>]) -> DerivativeStructure<f64> {
    x.iter()
        .map(|xi| &xi.sin().exp() * &((xi * xi) + 1.0).ln())
        .reduce(|a, b| a + b)
        .unwrap()
}

// ─── Helpers ───────────────────────────────────────────────────────────────

pub fn make_input(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.01 * i as f64).collect()
}

pub fn make_variables(x: &[f64], order: usize) -> Vec<DerivativeStructure<f64>> {
    let factory = DsFactory::new(x.len(), order).unwrap();
    x.iter()
        .enumerate()
        .map(|(i, &xi)| factory.variable(i, xi).unwrap())
        .collect()
}
