//! Error types for primitive value construction.

use crate::AssetId;
use thiserror::Error;

/// Result type for primitive operations.
pub type Result<T> = std::result::Result<T, PrimitivesError>;

/// Errors raised while building identity mappings or parsing enumerations.
#[derive(Debug, Error)]
pub enum PrimitivesError {
    /// The same asset id appears twice in an index
    #[error("Duplicate asset id {0} in asset index")]
    DuplicateAsset(AssetId),

    /// A value could not be parsed into a known enumeration variant
    #[error("Unsupported {kind}: {value:?}")]
    UnsupportedValue {
        /// Name of the enumeration being parsed
        kind: &'static str,
        /// The rejected input
        value: String,
    },

    /// A dense vector does not match the index length
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },
}
