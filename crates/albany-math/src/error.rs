//! Errors raised by the numeric kernels.

use thiserror::Error;

/// Result type for numeric kernels.
pub type Result<T> = std::result::Result<T, MathError>;

/// Errors that can occur in dense linear algebra.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MathError {
    /// Matrix is not square
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Operand dimensions disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Cholesky factorization failed
    #[error("Matrix is not positive definite")]
    NotPositiveDefinite,

    /// LU factorization produced a zero pivot
    #[error("Matrix is singular")]
    Singular,

    /// Input contains NaN or infinity
    #[error("Matrix contains non-finite values")]
    NonFinite,
}
