//! Vector-valued truncated Taylor expansions.
//!
//! A [`TaylorMap`] holds `m` derivative structures sharing one `(p, n)`
//! shape, all expanded around the same `p`-dimensional point. Maps can be
//! evaluated at a displacement, composed, and (when square) inverted order by
//! order with an injected [`LinearDecomposer`].

use std::mem;
use std::sync::Arc;

use log::{debug, trace};

use crate::error::{check_dimension, DsError, Result};
use crate::field::Field;
use crate::linalg::LinearDecomposer;
use crate::structure::{DerivativeStructure, DsFactory};

/// `m` functions of `p` parameters expanded around one point.
#[derive(Clone, Debug, PartialEq)]
pub struct TaylorMap<T> {
    point: Vec<T>,
    functions: Vec<DerivativeStructure<T>>,
}

impl<T: Field> TaylorMap<T> {
    /// Map from an expansion `point` and the `functions` expanded around it.
    ///
    /// Fails with [`DsError::NumberOfElementsShouldBePositive`] when either is
    /// empty and with [`DsError::DimensionMismatch`] when the point length
    /// differs from the parameter count or the functions differ in shape.
    pub fn new(point: Vec<T>, functions: Vec<DerivativeStructure<T>>) -> Result<Self> {
        if point.is_empty() {
            return Err(DsError::NumberOfElementsShouldBePositive { found: 0 });
        }
        let first = functions
            .first()
            .ok_or(DsError::NumberOfElementsShouldBePositive { found: 0 })?;
        check_dimension(point.len(), first.free_parameters())?;
        for f in &functions[1..] {
            first.check_compatible(f)?;
        }
        Ok(TaylorMap { point, functions })
    }

    /// Identity of `parameters` parameters at order `order`, around the origin.
    pub fn identity(parameters: usize, order: usize) -> Result<Self> {
        let factory = DsFactory::new(parameters, order)?;
        let functions = (0..parameters)
            .map(|i| factory.variable(i, T::zero()))
            .collect::<Result<Vec<_>>>()?;
        Ok(TaylorMap {
            point: vec![T::zero(); parameters],
            functions,
        })
    }

    #[inline]
    pub fn nb_parameters(&self) -> usize {
        self.point.len()
    }

    #[inline]
    pub fn nb_functions(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn point(&self) -> &[T] {
        &self.point
    }

    #[inline]
    pub fn functions(&self) -> &[DerivativeStructure<T>] {
        &self.functions
    }

    /// Function `i`; fails with [`DsError::OutOfRange`] if `i >= m`.
    pub fn function(&self, i: usize) -> Result<&DerivativeStructure<T>> {
        self.functions.get(i).ok_or(DsError::OutOfRange {
            value: i,
            lo: 0,
            hi: self.functions.len() - 1,
        })
    }

    /// Common derivation order of the functions.
    #[inline]
    pub fn order(&self) -> usize {
        self.functions[0].order()
    }

    /// Evaluate every function at `point + delta`.
    pub fn value(&self, delta: &[T]) -> Result<Vec<T>> {
        self.functions.iter().map(|f| f.taylor(delta)).collect()
    }

    /// `J[i][j] = ∂f_i/∂x_j` at the point.
    ///
    /// Fails with [`DsError::DerivationOrderNotAllowed`] for order-0 maps.
    pub fn jacobian(&self) -> Result<Vec<Vec<T>>> {
        self.functions
            .iter()
            .map(|f| (0..self.nb_parameters()).map(|j| f.first_partial(j)).collect())
            .collect()
    }

    /// `self ∘ inner`, expressed in the parameters of `inner` around its point.
    ///
    /// `inner` must have one function per parameter of `self`, and its
    /// function values must coincide with the point of `self`; otherwise this
    /// fails with [`DsError::DimensionMismatch`]. For the point check,
    /// `found` is the number of coordinates that agree. The result is
    /// truncated to the lower of the two orders.
    pub fn compose(&self, inner: &Self) -> Result<Self> {
        check_dimension(inner.nb_functions(), self.nb_parameters())?;
        let matching = self
            .point
            .iter()
            .zip(&inner.functions)
            .filter(|(p, f)| **p == f.value())
            .count();
        check_dimension(matching, inner.nb_functions())?;

        trace!(
            "composing {}x{} Taylor map with {}x{} map",
            self.nb_functions(),
            self.nb_parameters(),
            inner.nb_functions(),
            inner.nb_parameters()
        );
        let functions = self
            .functions
            .iter()
            .map(|f| f.rebase(&inner.functions))
            .collect::<Result<Vec<_>>>()?;
        Ok(TaylorMap {
            point: inner.point.clone(),
            functions,
        })
    }

    /// Local inverse of a square map.
    ///
    /// With `L` the Jacobian and `N` the terms of degree `≥ 2`, the inverse
    /// `G` (around the origin) satisfies `G = L⁻¹ ∘ (I − N ∘ G)`. Starting from
    /// `G = L⁻¹`, each pass of that fixed point fixes one more degree, so
    /// `n − 1` passes reach order `n`. The result is expanded around the
    /// values of `self` and maps back to its point.
    ///
    /// Fails with [`DsError::DimensionMismatch`] (`found` = functions,
    /// `expected` = parameters) for non-square maps, with
    /// [`DsError::DerivationOrderNotAllowed`] for order 0, and with whatever
    /// the decomposer reports for a singular Jacobian.
    pub fn invert(&self, decomposer: &impl LinearDecomposer<T>) -> Result<Self> {
        let n = self.nb_functions();
        check_dimension(n, self.nb_parameters())?;
        let compiler = Arc::clone(self.functions[0].compiler());
        let order = compiler.order();
        if order < 1 {
            return Err(DsError::DerivationOrderNotAllowed { order: 1, max: 0 });
        }
        let linear_offsets = (0..n)
            .map(|j| compiler.variable_offset(j))
            .collect::<Result<Vec<_>>>()?;

        // split every function into its Jacobian row and its degree ≥ 2 part
        let mut linear = vec![vec![T::zero(); n]; n];
        let mut non_linear = Vec::with_capacity(n);
        for (row, f) in linear.iter_mut().zip(&self.functions) {
            let mut c = f.coefficients().to_vec();
            c[0] = T::zero();
            for (entry, &k) in row.iter_mut().zip(&linear_offsets) {
                *entry = mem::replace(&mut c[k], T::zero());
            }
            non_linear.push(DerivativeStructure::from_parts(Arc::clone(&compiler), c));
        }

        let inverse = decomposer.inverse(&linear)?;
        let linear_inverse: Vec<DerivativeStructure<T>> = inverse
            .into_iter()
            .map(|row| {
                let mut c = vec![T::zero(); compiler.size()];
                for (x, &k) in row.into_iter().zip(&linear_offsets) {
                    c[k] = x;
                }
                DerivativeStructure::from_parts(Arc::clone(&compiler), c)
            })
            .collect();

        let identity = Self::identity(n, order)?;
        let mut current = linear_inverse.clone();
        for degree in 2..=order {
            let residual = identity
                .functions
                .iter()
                .zip(&non_linear)
                .map(|(id, nl)| id.checked_sub(&nl.rebase(&current)?))
                .collect::<Result<Vec<_>>>()?;
            current = linear_inverse
                .iter()
                .map(|l| l.rebase(&residual))
                .collect::<Result<Vec<_>>>()?;
            debug!("Taylor map inverse fixed up to degree {} of {}", degree, order);
        }

        let functions = current
            .iter()
            .zip(&self.point)
            .map(|(g, p)| g.with_value(p.clone()))
            .collect();
        Ok(TaylorMap {
            point: self.functions.iter().map(DerivativeStructure::value).collect(),
            functions,
        })
    }
}
