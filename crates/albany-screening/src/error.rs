//! Errors raised by the screening pipeline.

use albany_math::MathError;
use albany_primitives::AssetId;
use thiserror::Error;

/// Result type for screening.
pub type Result<T> = std::result::Result<T, ScreeningError>;

/// Configuration and input errors.
#[derive(Debug, Error)]
pub enum ScreeningError {
    /// Config parameter out of range
    #[error("Invalid screening config: {0}")]
    InvalidConfig(String),

    /// A candidate has no metadata
    #[error("No asset metadata for candidate {0}")]
    MissingAsset(AssetId),

    /// Covariance and asset index disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Failure in a numeric kernel
    #[error(transparent)]
    Math(#[from] MathError),
}
