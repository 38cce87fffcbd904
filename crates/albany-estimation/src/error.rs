//! Errors raised by the estimation routines.

use crate::MuEstimator;
use albany_math::MathError;
use albany_primitives::PrimitivesError;
use thiserror::Error;

/// Result type for estimation routines.
pub type Result<T> = std::result::Result<T, EstimationError>;

/// Errors that can occur while estimating returns, μ and Σ.
#[derive(Debug, Error)]
pub enum EstimationError {
    /// A configuration name that does not map to any known variant
    #[error("Unsupported {kind}: {value:?}")]
    UnsupportedValue {
        /// What was being parsed
        kind: &'static str,
        /// The rejected input
        value: String,
    },

    /// A recognised estimator that has no implementation yet
    #[error("{estimator} estimator for expected returns is not yet implemented")]
    NotImplemented {
        /// The requested estimator
        estimator: MuEstimator,
    },

    /// Insufficient data for estimation
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failure in a numeric kernel
    #[error(transparent)]
    Math(#[from] MathError),

    /// Failure in asset identity handling
    #[error(transparent)]
    Primitives(#[from] PrimitivesError),
}
