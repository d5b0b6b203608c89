//! Compiled indirection tables for derivative structures.
//!
//! A [`Compiler`] fixes the number of free parameters `p` and the truncation
//! order `n`. It enumerates every multi-index of total degree `≤ n` once, and
//! precomputes the tables that turn arithmetic on dense coefficient arrays
//! into plain indexed loops:
//!
//! - **products**: for every destination offset `k`, the pairs `(i, j)` whose
//!   multi-indices add up to the one at `k`. Pairs whose sum would exceed
//!   degree `n` are simply never recorded (Taylor truncation).
//! - **lowers**: for every offset `k` and every variable `v` with a non-zero
//!   exponent, the offset of the multi-index with that exponent decremented,
//!   tagged with the exponent. Drives differentiation, integration and
//!   monomial evaluation.
//! - **compositions**: for every offset `k`, one term per multiset partition
//!   of its multi-index into non-zero parts (multivariate Faà di Bruno).
//!
//! # Enumeration
//!
//! Offsets are graded: all multi-indices of degree `d` come before those of
//! degree `d + 1`. Inside one degree the first exponent decreases, then the
//! second, and so on. The value sits at offset `0` and `∂/∂x_i` at offset
//! `1 + i`. Because the enumeration of one degree does not depend on `n`, the
//! table for `(p, n')` is a prefix of the table for `(p, n)` whenever
//! `n' ≤ n`; truncation is a slice.
//!
//! # Cost
//!
//! The coefficient count is `C(n + p, p)`, the product table holds
//! `Σ_k ∏_v (m_v + 1)` pairs and the composition table one entry per multiset
//! partition, so everything grows combinatorially with both `p` and `n`.
//! Requests beyond [`MAX_SIZE`] coefficients or [`MAX_TABLE_TERMS`] table
//! entries fail with [`DsError::TooLarge`] instead of exhausting memory.
//!
//! Compilers are built once per `(p, n)` by [`Compiler::get`] and shared
//! through a process-wide cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::{debug, trace};

use crate::error::{check_dimension, DsError, Result};
use crate::multi_index::MultiIndex;

/// Largest accepted coefficient count `C(n + p, p)`.
pub const MAX_SIZE: usize = 1 << 16;

/// Largest accepted number of entries in the product or composition table.
pub const MAX_TABLE_TERMS: usize = 1 << 22;

/// Largest accepted truncation order (exponents are stored as `u8`).
pub const MAX_ORDER: usize = u8::MAX as usize;

/// One `lhs × rhs` contribution to a product coefficient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductTerm {
    pub lhs: usize,
    pub rhs: usize,
}

/// Link from a multi-index to the one with `variable`'s exponent decremented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LowerTerm {
    pub variable: usize,
    pub lower: usize,
    /// Exponent of `variable` before decrementing.
    pub exponent: usize,
}

/// One partition term of the composition rule.
///
/// Contributes `coeff · g_k · ∏ c[factors]` where `k = factors.len()` and
/// `g_k` is the `k`-th Taylor coefficient of the outer univariate function.
/// `coeff` counts the distinct orderings of the factors and is always an
/// integer.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositionTerm {
    pub coeff: f64,
    pub factors: Box<[usize]>,
}

impl CompositionTerm {
    /// Number of factors, i.e. which derivative of the outer function is used.
    #[inline]
    pub fn degree(&self) -> usize {
        self.factors.len()
    }
}

/// Immutable indirection tables for a fixed `(parameters, order)` pair.
pub struct Compiler {
    parameters: usize,
    order: usize,
    size: usize,
    /// `sizes[q][k] = C(k + q, q)`: coefficient count for `q` parameters at order `k`.
    sizes: Vec<Vec<usize>>,
    /// Flattened exponents, `parameters` entries per offset.
    orders: Vec<u8>,
    order_sums: Vec<usize>,
    /// `∏ m_v!` per offset.
    factorials: Vec<f64>,
    products: Vec<Vec<ProductTerm>>,
    lowers: Vec<Vec<LowerTerm>>,
    compositions: Vec<Vec<CompositionTerm>>,
}

/// One cache entry per shape; only callers of the same shape wait on its build.
type Slot = Arc<OnceLock<Result<Arc<Compiler>>>>;
type Cache = RwLock<HashMap<(usize, usize), Slot>>;

fn cache() -> &'static Cache {
    static CACHE: OnceLock<Cache> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

fn slot(key: (usize, usize)) -> Slot {
    if let Some(slot) = cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        trace!("compiler cache hit for p={}, n={}", key.0, key.1);
        return Arc::clone(slot);
    }
    let mut slots = cache().write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(slots.entry(key).or_default())
}

/// `C(order + parameters, parameters)`, or `None` on overflow.
pub fn size_for(parameters: usize, order: usize) -> Option<usize> {
    let k = parameters.min(order) as u128;
    let total = parameters as u128 + order as u128;
    let mut result: u128 = 1;
    for i in 1..=k {
        result = result.checked_mul(total - k + i)? / i;
    }
    usize::try_from(result).ok()
}

impl Compiler {
    /// Get the shared compiler for `parameters` free parameters and truncation `order`.
    ///
    /// The first call for a given pair builds the tables inside that pair's
    /// own cache slot, so each pair is compiled at most once even under
    /// concurrent first use, and a slow build never holds up lookups of other
    /// pairs. Rejected shapes are remembered like accepted ones.
    pub fn get(parameters: usize, order: usize) -> Result<Arc<Compiler>> {
        slot((parameters, order))
            .get_or_init(|| Compiler::build(parameters, order).map(Arc::new))
            .clone()
    }

    fn build(parameters: usize, order: usize) -> Result<Self> {
        if parameters < 1 {
            return Err(DsError::NumberOfElementsShouldBePositive { found: parameters });
        }
        if order > MAX_ORDER {
            return Err(DsError::DerivationOrderNotAllowed {
                order,
                max: MAX_ORDER,
            });
        }
        let size = match size_for(parameters, order) {
            Some(size) if size <= MAX_SIZE => size,
            other => {
                return Err(DsError::TooLarge {
                    size: other.unwrap_or(usize::MAX),
                    limit: MAX_SIZE,
                })
            }
        };

        let mut sizes = vec![vec![1usize; order + 1]; parameters + 1];
        for q in 1..=parameters {
            for k in 1..=order {
                sizes[q][k] = sizes[q][k - 1] + sizes[q - 1][k];
            }
        }

        let mut orders = Vec::with_capacity(size * parameters);
        let mut prefix = Vec::with_capacity(parameters);
        for degree in 0..=order {
            enumerate_degree(&mut prefix, degree, parameters, &mut orders);
        }
        debug_assert_eq!(orders.len(), size * parameters);

        let order_sums: Vec<usize> = orders
            .chunks(parameters)
            .map(|m| m.iter().map(|&o| o as usize).sum())
            .collect();
        let factorials = orders
            .chunks(parameters)
            .map(|m| MultiIndex::new(m).factorial())
            .collect();

        let mut compiler = Compiler {
            parameters,
            order,
            size,
            sizes,
            orders,
            order_sums,
            factorials,
            products: Vec::new(),
            lowers: Vec::new(),
            compositions: Vec::new(),
        };
        compiler.products = compiler.compile_products()?;
        compiler.lowers = compiler.compile_lowers();
        compiler.compositions = compiler.compile_compositions()?;

        debug!(
            "compiled derivative structure tables for p={}, n={}: {} coefficients, {} product terms, {} composition terms",
            parameters,
            order,
            size,
            compiler.products.iter().map(Vec::len).sum::<usize>(),
            compiler.compositions.iter().map(Vec::len).sum::<usize>(),
        );
        Ok(compiler)
    }

    fn compile_products(&self) -> Result<Vec<Vec<ProductTerm>>> {
        let p = self.parameters;
        let mut products = Vec::with_capacity(self.size);
        let mut total = 0usize;
        let mut lhs = vec![0usize; p];
        let mut rhs = vec![0usize; p];
        for k in 0..self.size {
            let target = self.orders(k);
            let mut row = Vec::new();
            lhs.iter_mut().for_each(|a| *a = 0);
            loop {
                for v in 0..p {
                    rhs[v] = target[v] as usize - lhs[v];
                }
                row.push(ProductTerm {
                    lhs: self.locate(&lhs),
                    rhs: self.locate(&rhs),
                });

                // odometer over every lhs ≤ target
                let mut v = 0;
                while v < p {
                    if lhs[v] < target[v] as usize {
                        lhs[v] += 1;
                        break;
                    }
                    lhs[v] = 0;
                    v += 1;
                }
                if v == p {
                    break;
                }
            }
            total += row.len();
            if total > MAX_TABLE_TERMS {
                return Err(DsError::TooLarge {
                    size: total,
                    limit: MAX_TABLE_TERMS,
                });
            }
            products.push(row);
        }
        Ok(products)
    }

    fn compile_lowers(&self) -> Vec<Vec<LowerTerm>> {
        (0..self.size)
            .map(|k| {
                let mut work: Vec<usize> = self.orders(k).iter().map(|&o| o as usize).collect();
                let mut row = Vec::new();
                for variable in 0..self.parameters {
                    let exponent = work[variable];
                    if exponent > 0 {
                        work[variable] -= 1;
                        row.push(LowerTerm {
                            variable,
                            lower: self.locate(&work),
                            exponent,
                        });
                        work[variable] += 1;
                    }
                }
                row
            })
            .collect()
    }

    fn compile_compositions(&self) -> Result<Vec<Vec<CompositionTerm>>> {
        let mut compositions = Vec::with_capacity(self.size);
        // the value is g(v) itself, no partition needed
        compositions.push(Vec::new());
        let mut budget = MAX_TABLE_TERMS;
        let mut parts = Vec::with_capacity(self.order);
        for k in 1..self.size {
            let mut remaining: Vec<usize> = self.orders(k).iter().map(|&o| o as usize).collect();
            let mut row = Vec::new();
            self.collect_partitions(&mut remaining, k, &mut parts, &mut row, &mut budget)?;
            compositions.push(row);
        }
        Ok(compositions)
    }

    /// Enumerate multiset partitions of `remaining` into non-zero parts whose
    /// offsets never increase, so each multiset is produced exactly once.
    fn collect_partitions(
        &self,
        remaining: &mut [usize],
        largest: usize,
        parts: &mut Vec<usize>,
        row: &mut Vec<CompositionTerm>,
        budget: &mut usize,
    ) -> Result<()> {
        let degree: usize = remaining.iter().sum();
        if degree == 0 {
            if *budget == 0 {
                return Err(DsError::TooLarge {
                    size: MAX_TABLE_TERMS + 1,
                    limit: MAX_TABLE_TERMS,
                });
            }
            *budget -= 1;
            row.push(CompositionTerm {
                coeff: orderings(parts),
                factors: parts.clone().into_boxed_slice(),
            });
            return Ok(());
        }

        // only offsets of degree ≤ `degree` can fit
        let end = largest.min(self.sizes[self.parameters][degree] - 1);
        for part in 1..=end {
            let exponents = self.orders(part);
            if exponents
                .iter()
                .zip(remaining.iter())
                .all(|(&a, &r)| a as usize <= r)
            {
                for (r, &a) in remaining.iter_mut().zip(exponents) {
                    *r -= a as usize;
                }
                parts.push(part);
                self.collect_partitions(remaining, part, parts, row, budget)?;
                parts.pop();
                for (r, &a) in remaining.iter_mut().zip(exponents) {
                    *r += a as usize;
                }
            }
        }
        Ok(())
    }

    /// Offset of an already validated multi-index.
    fn locate<I: Copy + Into<usize>>(&self, exponents: &[I]) -> usize {
        let p = self.parameters;
        let degree: usize = exponents.iter().map(|&e| e.into()).sum();
        let mut offset = if degree == 0 {
            0
        } else {
            self.sizes[p][degree - 1]
        };
        let mut remaining = degree;
        for (v, &e) in exponents.iter().enumerate().take(p - 1) {
            let rest = remaining - e.into();
            if rest > 0 {
                // multi-indices with a larger exponent at `v` come first
                offset += self.sizes[p - 1 - v][rest - 1];
            }
            remaining = rest;
        }
        offset
    }

    // ── Queries ──

    /// Number of free parameters `p`.
    #[inline]
    pub fn free_parameters(&self) -> usize {
        self.parameters
    }

    /// Truncation order `n`.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of stored coefficients, `C(n + p, p)`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset of the coefficient for the given per-variable orders.
    ///
    /// Fails with [`DsError::DimensionMismatch`] if `orders.len() != p` and
    /// with [`DsError::DerivationOrderNotAllowed`] if the total order exceeds `n`.
    pub fn index_of(&self, orders: &[usize]) -> Result<usize> {
        check_dimension(orders.len(), self.parameters)?;
        let total = orders.iter().fold(0usize, |acc, &o| acc.saturating_add(o));
        if total > self.order {
            return Err(DsError::DerivationOrderNotAllowed {
                order: total,
                max: self.order,
            });
        }
        Ok(self.locate(orders))
    }

    /// Multi-index stored at `offset` (inverse of [`index_of`](Self::index_of)).
    pub fn orders_of(&self, offset: usize) -> Result<MultiIndex> {
        if offset >= self.size {
            return Err(DsError::OutOfRange {
                value: offset,
                lo: 0,
                hi: self.size - 1,
            });
        }
        Ok(MultiIndex::new(self.orders(offset)))
    }

    /// Raw exponents at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= size()`.
    #[inline]
    pub fn orders(&self, offset: usize) -> &[u8] {
        &self.orders[offset * self.parameters..(offset + 1) * self.parameters]
    }

    /// Total degree of the multi-index at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= size()`.
    #[inline]
    pub fn order_sum(&self, offset: usize) -> usize {
        self.order_sums[offset]
    }

    /// `∏ m_v!` for the multi-index at `offset`.
    #[inline]
    pub fn factorial(&self, offset: usize) -> f64 {
        self.factorials[offset]
    }

    /// Number of coefficients of total degree `≤ order` (a prefix of the array).
    ///
    /// # Panics
    ///
    /// Panics if `order > self.order()`.
    #[inline]
    pub fn size_up_to(&self, order: usize) -> usize {
        self.sizes[self.parameters][order]
    }

    /// Offset of the first-order term `∂/∂x_variable`.
    pub fn variable_offset(&self, variable: usize) -> Result<usize> {
        if variable >= self.parameters {
            return Err(DsError::OutOfRange {
                value: variable,
                lo: 0,
                hi: self.parameters - 1,
            });
        }
        if self.order < 1 {
            return Err(DsError::DerivationOrderNotAllowed {
                order: 1,
                max: self.order,
            });
        }
        let mut exponents = vec![0usize; self.parameters];
        exponents[variable] = 1;
        Ok(self.locate(&exponents))
    }

    /// Product table, one row per destination offset.
    #[inline]
    pub fn products(&self) -> &[Vec<ProductTerm>] {
        &self.products
    }

    /// Lowering (differentiation) table, one row per offset.
    #[inline]
    pub fn lowers(&self) -> &[Vec<LowerTerm>] {
        &self.lowers
    }

    /// Composition table, one row per offset (row 0 is empty).
    #[inline]
    pub fn compositions(&self) -> &[Vec<CompositionTerm>] {
        &self.compositions
    }

    /// Fail with [`DsError::DimensionMismatch`] unless `other` has the same shape.
    pub fn check_compatibility(&self, other: &Compiler) -> Result<()> {
        check_dimension(other.parameters, self.parameters)?;
        check_dimension(other.order, self.order)
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("parameters", &self.parameters)
            .field("order", &self.order)
            .field("size", &self.size)
            .finish()
    }
}

/// Append every multi-index of total degree `remaining` over `vars_left`
/// variables, first exponent decreasing.
fn enumerate_degree(prefix: &mut Vec<u8>, remaining: usize, vars_left: usize, out: &mut Vec<u8>) {
    if vars_left == 1 {
        prefix.push(remaining as u8);
        out.extend_from_slice(prefix);
        prefix.pop();
        return;
    }
    for first in (0..=remaining).rev() {
        prefix.push(first as u8);
        enumerate_degree(prefix, remaining - first, vars_left - 1, out);
        prefix.pop();
    }
}

/// Distinct orderings of a non-increasing list of parts: `k! / ∏ multiplicity!`.
fn orderings(parts: &[usize]) -> f64 {
    let mut coeff = 1.0;
    let mut run = 0usize;
    for (i, &part) in parts.iter().enumerate() {
        run = if i > 0 && parts[i - 1] == part {
            run + 1
        } else {
            1
        };
        coeff = coeff * (i + 1) as f64 / run as f64;
    }
    coeff
}
