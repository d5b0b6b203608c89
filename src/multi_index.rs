//! Per-parameter derivation orders.

use std::fmt::{self, Display};

/// Exponents of one monomial of a derivative structure, one per free
/// parameter. `[2, 0, 1]` stands for `∂³f / ∂x₀² ∂x₂`, or equivalently for
/// the Taylor coefficient of `δx₀² δx₂`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MultiIndex {
    orders: Vec<u8>,
}

impl MultiIndex {
    pub fn new(orders: &[u8]) -> Self {
        MultiIndex {
            orders: orders.to_vec(),
        }
    }

    /// Index of the value itself over `parameters` parameters.
    pub fn zero(parameters: usize) -> Self {
        MultiIndex {
            orders: vec![0; parameters],
        }
    }

    /// `Σ orders[i]`.
    pub fn total_order(&self) -> usize {
        self.orders.iter().map(|&o| o as usize).sum()
    }

    pub fn free_parameters(&self) -> usize {
        self.orders.len()
    }

    pub fn orders(&self) -> &[u8] {
        &self.orders
    }

    /// Orders widened to `usize`, as taken by
    /// [`Compiler::index_of`](crate::Compiler::index_of) and
    /// [`DerivativeStructure::partial_derivative`](crate::DerivativeStructure::partial_derivative).
    pub fn to_usize(&self) -> Vec<usize> {
        self.orders.iter().map(|&o| o as usize).collect()
    }

    /// `∏ orders[i]!`: a partial derivative is its Taylor coefficient times this.
    pub fn factorial(&self) -> f64 {
        self.orders
            .iter()
            .flat_map(|&o| 2..=o as u32)
            .fold(1.0, |acc, k| acc * f64::from(k))
    }
}

impl Display for MultiIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, o) in self.orders.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", o)?;
        }
        write!(f, "]")
    }
}

impl From<&[u8]> for MultiIndex {
    fn from(orders: &[u8]) -> Self {
        MultiIndex::new(orders)
    }
}
