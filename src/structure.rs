//! Dense truncated multivariate Taylor series.
//!
//! A [`DerivativeStructure`] stores every coefficient of total degree `≤ n` of
//! a function of `p` free parameters, in the order fixed by its
//! [`Compiler`]. Internally the coefficients are Taylor coefficients
//! (`∂ᵐf / m!`), which keeps products a plain convolution. The public
//! accessors ([`partial_derivative`](DerivativeStructure::partial_derivative),
//! [`all_derivatives`](DerivativeStructure::all_derivatives),
//! [`DsFactory::build`]) speak literal partial derivatives.
//!
//! Structures are immutable values: every operation returns a new instance.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::compiler::Compiler;
use crate::error::{check_dimension, DsError, Result};
use crate::field::Field;

/// Value and partial derivatives up to order `n` of a function of `p` parameters.
#[derive(Clone, Debug)]
pub struct DerivativeStructure<F> {
    compiler: Arc<Compiler>,
    data: Vec<F>,
}

impl<F: Field> DerivativeStructure<F> {
    pub(crate) fn from_parts(compiler: Arc<Compiler>, data: Vec<F>) -> Self {
        debug_assert_eq!(data.len(), compiler.size());
        DerivativeStructure { compiler, data }
    }

    pub(crate) fn constant_in(compiler: &Arc<Compiler>, value: F) -> Self {
        let mut data = vec![F::zero(); compiler.size()];
        data[0] = value;
        Self::from_parts(Arc::clone(compiler), data)
    }

    /// Build from raw Taylor coefficients (`∂ᵐf / m!`) in compiler order.
    pub fn from_coefficients(compiler: Arc<Compiler>, coefficients: Vec<F>) -> Result<Self> {
        check_dimension(coefficients.len(), compiler.size())?;
        Ok(Self::from_parts(compiler, coefficients))
    }

    // ── Shape ──

    #[inline]
    pub fn compiler(&self) -> &Arc<Compiler> {
        &self.compiler
    }

    #[inline]
    pub fn free_parameters(&self) -> usize {
        self.compiler.free_parameters()
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.compiler.order()
    }

    /// Raw Taylor coefficients in compiler order.
    #[inline]
    pub fn coefficients(&self) -> &[F] {
        &self.data
    }

    /// Function value (the coefficient of the all-zero multi-index).
    #[inline]
    pub fn value(&self) -> F {
        self.data[0].clone()
    }

    /// Fail with [`DsError::DimensionMismatch`] unless both share `(p, n)`.
    pub fn check_compatible(&self, other: &Self) -> Result<()> {
        if Arc::ptr_eq(&self.compiler, &other.compiler) {
            Ok(())
        } else {
            self.compiler.check_compatibility(&other.compiler)
        }
    }

    fn check_variable(&self, variable: usize) -> Result<()> {
        let p = self.free_parameters();
        if variable < p {
            Ok(())
        } else {
            Err(DsError::OutOfRange {
                value: variable,
                lo: 0,
                hi: p - 1,
            })
        }
    }

    // ── Derivatives ──

    /// Literal partial derivative `∂^|m| f / ∂x₀^m₀ ⋯ ∂x_{p-1}^m_{p-1}`.
    ///
    /// Fails with [`DsError::DimensionMismatch`] if `orders.len() != p` and
    /// [`DsError::DerivationOrderNotAllowed`] if `Σ orders > n`.
    pub fn partial_derivative(&self, orders: &[usize]) -> Result<F> {
        let k = self.compiler.index_of(orders)?;
        Ok(self.derivative_at(k))
    }

    /// First partial derivative with respect to `variable`.
    pub fn first_partial(&self, variable: usize) -> Result<F> {
        let k = self.compiler.variable_offset(variable)?;
        Ok(self.derivative_at(k))
    }

    /// All literal partial derivatives, in compiler order.
    pub fn all_derivatives(&self) -> Vec<F> {
        (0..self.data.len()).map(|k| self.derivative_at(k)).collect()
    }

    #[inline]
    fn derivative_at(&self, k: usize) -> F {
        let factorial = self.compiler.factorial(k);
        if factorial == 1.0 {
            self.data[k].clone()
        } else {
            self.data[k].clone() * F::from_f64(factorial)
        }
    }

    // ── Arithmetic ──

    fn zip_with(&self, other: &Self, f: impl Fn(&F, &F) -> F) -> Self {
        let data = self.data.iter().zip(&other.data).map(|(a, b)| f(a, b)).collect();
        Self::from_parts(Arc::clone(&self.compiler), data)
    }

    fn map(&self, f: impl Fn(&F) -> F) -> Self {
        Self::from_parts(Arc::clone(&self.compiler), self.data.iter().map(f).collect())
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        Ok(self.zip_with(other, |a, b| a.clone() + b.clone()))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        Ok(self.zip_with(other, |a, b| a.clone() - b.clone()))
    }

    /// Truncated product; terms of degree `> n` are dropped.
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        Ok(self.product(other))
    }

    /// Quotient, solved degree by degree from the constant term up.
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        Ok(self.quotient(other))
    }

    pub(crate) fn product(&self, other: &Self) -> Self {
        let data = self
            .compiler
            .products()
            .iter()
            .map(|row| {
                row.iter().fold(F::zero(), |acc, term| {
                    acc + self.data[term.lhs].clone() * other.data[term.rhs].clone()
                })
            })
            .collect();
        Self::from_parts(Arc::clone(&self.compiler), data)
    }

    pub(crate) fn quotient(&self, other: &Self) -> Self {
        let inv_b0 = other.data[0].reciprocal();
        let mut q: Vec<F> = Vec::with_capacity(self.data.len());
        for (k, row) in self.compiler.products().iter().enumerate() {
            // every rhs with lhs != 0 has lower degree, hence is already known
            let mut sum = self.data[k].clone();
            for term in row.iter().filter(|t| t.lhs != 0) {
                sum = sum - other.data[term.lhs].clone() * q[term.rhs].clone();
            }
            q.push(sum * inv_b0.clone());
        }
        Self::from_parts(Arc::clone(&self.compiler), q)
    }

    /// `1 / self`, starting from the field's own reciprocal of the value.
    pub fn reciprocal(&self) -> Self {
        let r0 = self.data[0].reciprocal();
        let mut r: Vec<F> = Vec::with_capacity(self.data.len());
        r.push(r0.clone());
        for row in self.compiler.products().iter().skip(1) {
            let sum = row
                .iter()
                .filter(|t| t.lhs != 0)
                .fold(F::zero(), |acc, t| acc + self.data[t.lhs].clone() * r[t.rhs].clone());
            r.push(-(r0.clone() * sum));
        }
        Self::from_parts(Arc::clone(&self.compiler), r)
    }

    pub fn negate(&self) -> Self {
        self.map(|a| -a.clone())
    }

    pub fn add_scalar(&self, value: F) -> Self {
        let mut out = self.clone();
        out.data[0] = out.data[0].clone() + value;
        out
    }

    pub fn subtract_scalar(&self, value: F) -> Self {
        self.add_scalar(-value)
    }

    pub fn multiply_scalar(&self, value: F) -> Self {
        self.map(|a| a.clone() * value.clone())
    }

    pub fn divide_scalar(&self, value: F) -> Self {
        self.multiply_scalar(value.reciprocal())
    }

    pub(crate) fn with_value(&self, value: F) -> Self {
        let mut out = self.clone();
        out.data[0] = value;
        out
    }

    pub(crate) fn constant_like(&self, value: F) -> Self {
        Self::constant_in(&self.compiler, value)
    }

    /// `Σ coefficients[i] · terms[i]`.
    pub fn linear_combination(coefficients: &[F], terms: &[Self]) -> Result<Self> {
        check_dimension(terms.len(), coefficients.len())?;
        let first = terms
            .first()
            .ok_or(DsError::NumberOfElementsShouldBePositive { found: 0 })?;
        let mut data = vec![F::zero(); first.data.len()];
        for (a, b) in coefficients.iter().zip(terms) {
            first.check_compatible(b)?;
            for (d, x) in data.iter_mut().zip(&b.data) {
                *d = d.clone() + a.clone() * x.clone();
            }
        }
        Ok(Self::from_parts(Arc::clone(&first.compiler), data))
    }

    /// `Σ a[i] · b[i]` where both factors are structures.
    pub fn linear_combination_of(a: &[Self], b: &[Self]) -> Result<Self> {
        check_dimension(b.len(), a.len())?;
        let first = a
            .first()
            .ok_or(DsError::NumberOfElementsShouldBePositive { found: 0 })?;
        let mut sum = first.constant_like(F::zero());
        for (x, y) in a.iter().zip(b) {
            sum = sum.checked_add(&x.checked_mul(y)?)?;
        }
        Ok(sum)
    }

    // ── Composition ──

    /// `g ∘ self`, given `derivatives = [g(v), g'(v), …, g⁽ⁿ⁾(v)]` at `v = self.value()`.
    ///
    /// Each coefficient of degree `≥ 1` collects one term per multiset
    /// partition of its multi-index (multivariate Faà di Bruno).
    ///
    /// Fails with [`DsError::DimensionMismatch`] if `derivatives.len() != n + 1`.
    pub fn compose(&self, derivatives: &[F]) -> Result<Self> {
        check_dimension(derivatives.len(), self.order() + 1)?;
        Ok(self.apply(derivatives))
    }

    pub(crate) fn apply(&self, derivatives: &[F]) -> Self {
        // g_k = g⁽ᵏ⁾ / k!
        let mut factorial = 1.0;
        let g: Vec<F> = derivatives
            .iter()
            .enumerate()
            .map(|(k, d)| {
                if k > 1 {
                    factorial *= k as f64;
                }
                d.clone() / F::from_f64(factorial)
            })
            .collect();

        let mut data = Vec::with_capacity(self.data.len());
        data.push(derivatives[0].clone());
        for row in self.compiler.compositions().iter().skip(1) {
            let mut sum = F::zero();
            for term in row {
                let product = term
                    .factors
                    .iter()
                    .fold(g[term.degree()].clone(), |acc, &f| acc * self.data[f].clone());
                sum = sum + F::from_f64(term.coeff) * product;
            }
            data.push(sum);
        }
        Self::from_parts(Arc::clone(&self.compiler), data)
    }

    /// Substitute `base[v]` for free parameter `v`.
    ///
    /// `self` is read as a polynomial in the displacements of its own
    /// parameters; those displacements become `base[v] − base[v].value()`.
    /// The result lives on the parameters of `base`, truncated to the lower
    /// of the two orders.
    pub fn rebase(&self, base: &[Self]) -> Result<Self> {
        check_dimension(base.len(), self.free_parameters())?;
        let first = &base[0];
        for b in &base[1..] {
            first.check_compatible(b)?;
        }
        let order = self.order().min(first.order());
        let target = Compiler::get(first.free_parameters(), order)?;

        let displacements: Vec<Self> = base
            .iter()
            .map(|b| {
                let mut h = b.prefix(&target);
                h.data[0] = F::zero();
                h
            })
            .collect();

        let count = self.compiler.size_up_to(order);
        let mut monomials: Vec<Self> = Vec::with_capacity(count);
        monomials.push(Self::constant_in(&target, F::one()));
        let mut result = Self::constant_in(&target, self.data[0].clone());
        for k in 1..count {
            let term = &self.compiler.lowers()[k][0];
            let monomial = monomials[term.lower].product(&displacements[term.variable]);
            for (r, m) in result.data.iter_mut().zip(&monomial.data) {
                *r = r.clone() + self.data[k].clone() * m.clone();
            }
            monomials.push(monomial);
        }
        Ok(result)
    }

    /// Evaluate the truncated series at a displacement `delta` from the expansion point.
    ///
    /// Fails with [`DsError::DimensionMismatch`] if `delta.len() != p`.
    pub fn taylor(&self, delta: &[F]) -> Result<F> {
        check_dimension(delta.len(), self.free_parameters())?;
        let mut monomials: Vec<F> = Vec::with_capacity(self.data.len());
        monomials.push(F::one());
        for row in self.compiler.lowers().iter().skip(1) {
            let term = &row[0];
            let m = monomials[term.lower].clone() * delta[term.variable].clone();
            monomials.push(m);
        }
        // highest degree first
        Ok(self
            .data
            .iter()
            .zip(&monomials)
            .rev()
            .fold(F::zero(), |acc, (c, m)| acc + c.clone() * m.clone()))
    }

    /// Same function truncated to a lower `order`.
    pub fn truncate(&self, order: usize) -> Result<Self> {
        if order > self.order() {
            return Err(DsError::DerivationOrderNotAllowed {
                order,
                max: self.order(),
            });
        }
        let target = Compiler::get(self.free_parameters(), order)?;
        Ok(self.prefix(&target))
    }

    /// Coefficients of a same-`p`, lower-order compiler form a prefix.
    fn prefix(&self, target: &Arc<Compiler>) -> Self {
        Self::from_parts(Arc::clone(target), self.data[..target.size()].to_vec())
    }

    /// `∂^times / ∂x_variable^times`, keeping the shape; the top `times`
    /// degrees of the result are unknown and set to zero.
    pub fn differentiate(&self, variable: usize, times: usize) -> Result<Self> {
        self.check_variable(variable)?;
        let mut data = self.data.clone();
        for _ in 0..times.min(self.order() + 1) {
            let mut next = vec![F::zero(); data.len()];
            for (k, row) in self.compiler.lowers().iter().enumerate() {
                if let Some(term) = row.iter().find(|t| t.variable == variable) {
                    next[term.lower] = F::from_f64(term.exponent as f64) * data[k].clone();
                }
            }
            data = next;
        }
        Ok(Self::from_parts(Arc::clone(&self.compiler), data))
    }

    /// Antiderivative with respect to `variable`, `times` times, with zero
    /// integration constants. Terms pushed past degree `n` are dropped.
    pub fn integrate(&self, variable: usize, times: usize) -> Result<Self> {
        self.check_variable(variable)?;
        let mut data = self.data.clone();
        for _ in 0..times.min(self.order() + 1) {
            let mut next = vec![F::zero(); data.len()];
            for (k, row) in self.compiler.lowers().iter().enumerate() {
                if let Some(term) = row.iter().find(|t| t.variable == variable) {
                    next[k] = data[term.lower].clone() / F::from_f64(term.exponent as f64);
                }
            }
            data = next;
        }
        Ok(Self::from_parts(Arc::clone(&self.compiler), data))
    }
}

impl<F: PartialEq> PartialEq for DerivativeStructure<F> {
    fn eq(&self, other: &Self) -> bool {
        self.compiler.free_parameters() == other.compiler.free_parameters()
            && self.compiler.order() == other.compiler.order()
            && self.data == other.data
    }
}

/// Factory for structures sharing one `(p, n)` shape.
#[derive(Debug)]
pub struct DsFactory<F> {
    compiler: Arc<Compiler>,
    _field: PhantomData<fn() -> F>,
}

impl<F> Clone for DsFactory<F> {
    fn clone(&self) -> Self {
        DsFactory {
            compiler: Arc::clone(&self.compiler),
            _field: PhantomData,
        }
    }
}

impl<F: Field> DsFactory<F> {
    /// Factory for `parameters` free parameters and derivation `order`.
    pub fn new(parameters: usize, order: usize) -> Result<Self> {
        Ok(DsFactory {
            compiler: Compiler::get(parameters, order)?,
            _field: PhantomData,
        })
    }

    #[inline]
    pub fn compiler(&self) -> &Arc<Compiler> {
        &self.compiler
    }

    /// Constant: value `value`, every derivative zero.
    pub fn constant(&self, value: F) -> DerivativeStructure<F> {
        DerivativeStructure::constant_in(&self.compiler, value)
    }

    /// Free parameter `index` at `value` (unit first derivative along itself).
    ///
    /// Fails with [`DsError::OutOfRange`] if `index >= p`.
    pub fn variable(&self, index: usize, value: F) -> Result<DerivativeStructure<F>> {
        let p = self.compiler.free_parameters();
        if index >= p {
            return Err(DsError::OutOfRange {
                value: index,
                lo: 0,
                hi: p - 1,
            });
        }
        let mut ds = self.constant(value);
        if self.compiler.order() > 0 {
            ds.data[self.compiler.variable_offset(index)?] = F::one();
        }
        Ok(ds)
    }

    /// Build from literal partial derivatives listed in compiler order.
    ///
    /// Fails with [`DsError::DimensionMismatch`] if the length is not `C(n + p, p)`.
    pub fn build(&self, derivatives: &[F]) -> Result<DerivativeStructure<F>> {
        check_dimension(derivatives.len(), self.compiler.size())?;
        let data = derivatives
            .iter()
            .enumerate()
            .map(|(k, d)| {
                let factorial = self.compiler.factorial(k);
                if factorial == 1.0 {
                    d.clone()
                } else {
                    d.clone() / F::from_f64(factorial)
                }
            })
            .collect();
        Ok(DerivativeStructure::from_parts(Arc::clone(&self.compiler), data))
    }

    pub fn zero(&self) -> DerivativeStructure<F> {
        self.constant(F::zero())
    }

    pub fn one(&self) -> DerivativeStructure<F> {
        self.constant(F::one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn build_round_trips_literal_derivatives() {
        let factory = DsFactory::<f64>::new(2, 2).unwrap();
        let derivatives = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ds = factory.build(&derivatives).unwrap();
        assert_eq!(ds.all_derivatives(), derivatives.to_vec());
        assert_eq!(ds.partial_derivative(&[2, 0]).unwrap(), 4.0);
    }

    #[test]
    fn product_truncates() {
        let factory = DsFactory::<f64>::new(1, 2).unwrap();
        let x = factory.variable(0, 0.0).unwrap();
        let x3 = x.product(&x).product(&x);
        assert!(x3.coefficients().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn quotient_inverts_product() {
        let factory = DsFactory::<f64>::new(2, 3).unwrap();
        let x = factory.variable(0, 1.5).unwrap();
        let y = factory.variable(1, -0.5).unwrap();
        let a = x.product(&y).add_scalar(2.0);
        let b = x.add_scalar(3.0);
        let back = a.quotient(&b).product(&b);
        for (u, v) in back.coefficients().iter().zip(a.coefficients()) {
            assert_relative_eq!(u, v, epsilon = 1e-14);
        }
    }

    #[test]
    fn differentiate_then_integrate_recovers_non_constant_terms() {
        let factory = DsFactory::<f64>::new(2, 3).unwrap();
        let x = factory.variable(0, 0.0).unwrap();
        let y = factory.variable(1, 0.0).unwrap();
        // x²y, whose degree keeps it inside the truncation after a round trip
        let f = x.product(&x).product(&y);
        let back = f.differentiate(0, 1).unwrap().integrate(0, 1).unwrap();
        assert_eq!(back, f);
    }
}
