//! Error type shared by every fallible operation in the crate.
//!
//! Every precondition violation carries the offending numbers so callers can
//! tell exactly which dimension or order was wrong. Numerical trouble (a zero
//! pivot in the field, NaN, infinities) is not reported here: it flows through
//! the scalar arithmetic unchanged.

use thiserror::Error;

/// Failure of a derivative-structure, compiler or Taylor-map operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DsError {
    /// A count that must be at least one was not (free parameters, points, functions).
    #[error("number of elements should be positive ({found})")]
    NumberOfElementsShouldBePositive { found: usize },

    /// Two shapes that must agree do not.
    #[error("dimension mismatch: {found} != {expected}")]
    DimensionMismatch { found: usize, expected: usize },

    /// An index lies outside its valid closed range.
    #[error("{value} out of [{lo}, {hi}] range")]
    OutOfRange { value: usize, lo: usize, hi: usize },

    /// A requested differentiation order exceeds what is stored.
    #[error("derivation order {order} is larger than {max}")]
    DerivationOrderNotAllowed { order: usize, max: usize },

    /// The combinatorial tables for the requested shape would be unreasonably large.
    #[error("derivative structure too large: {size} exceeds limit {limit}")]
    TooLarge { size: usize, limit: usize },

    /// A linear decomposition met a (numerically) singular matrix.
    #[error("singular {dimension}x{dimension} matrix")]
    SingularMatrix { dimension: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DsError>;

/// Fail with [`DsError::DimensionMismatch`] unless `found == expected`.
#[inline]
pub(crate) fn check_dimension(found: usize, expected: usize) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(DsError::DimensionMismatch { found, expected })
    }
}
