//! Errors raised by the optimization entry points.
//!
//! Infeasibility is not an error: it is reported through
//! [`SolverResult::Infeasible`](crate::SolverResult::Infeasible).

use albany_math::MathError;
use albany_primitives::PrimitivesError;
use thiserror::Error;

/// Result type for optimization routines.
pub type Result<T> = std::result::Result<T, OptimizationError>;

/// Configuration and numeric errors.
#[derive(Debug, Error)]
pub enum OptimizationError {
    /// No assets to optimize over
    #[error("Empty universe: at least one asset is required")]
    EmptyUniverse,

    /// An input has the wrong length or shape
    #[error("Dimension mismatch in {input}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which input disagreed
        input: &'static str,
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// An input contains NaN or infinity
    #[error("Non-finite values in {0}")]
    NonFinite(&'static str),

    /// A constraint bundle is internally inconsistent
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),

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
