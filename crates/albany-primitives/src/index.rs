//! Mapping between asset identities and matrix columns.
//!
//! Callers hold identity-keyed data (weights per asset id, metadata per asset
//! id) while the numeric routines want dense vectors aligned to the columns of
//! a covariance matrix. `AssetIndex` is the one place that translation happens.

use crate::{AssetId, PrimitivesError, Result};
use ndarray::Array1;
use std::collections::HashMap;

/// Ordered asset ids with constant-time id → column lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetIndex {
    ids: Vec<AssetId>,
    positions: HashMap<AssetId, usize>,
}

impl AssetIndex {
    /// Build an index where column `i` belongs to `ids[i]`.
    ///
    /// # Errors
    /// Returns [`PrimitivesError::DuplicateAsset`] if an id occurs twice.
    pub fn new(ids: Vec<AssetId>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(ids.len());
        for (column, id) in ids.iter().enumerate() {
            if positions.insert(*id, column).is_some() {
                return Err(PrimitivesError::DuplicateAsset(*id));
            }
        }
        Ok(Self { ids, positions })
    }

    /// Number of indexed assets.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Column of an asset, if indexed.
    pub fn position(&self, id: &AssetId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Whether an asset is indexed.
    pub fn contains(&self, id: &AssetId) -> bool {
        self.positions.contains_key(id)
    }

    /// Asset ids in column order.
    pub fn ids(&self) -> &[AssetId] {
        &self.ids
    }

    /// Scatter identity-keyed weights into a dense column-aligned vector.
    ///
    /// Ids missing from the index are skipped; unlisted columns are zero.
    pub fn dense_weights(&self, weights: &HashMap<AssetId, f64>) -> Array1<f64> {
        let mut dense = Array1::zeros(self.len());
        for (id, weight) in weights {
            if let Some(column) = self.position(id) {
                dense[column] = *weight;
            }
        }
        dense
    }

    /// Gather a dense column-aligned vector back into identity-keyed pairs.
    ///
    /// # Errors
    /// Returns [`PrimitivesError::DimensionMismatch`] when the vector length
    /// differs from the index length.
    pub fn keyed(&self, values: &Array1<f64>) -> Result<Vec<(AssetId, f64)>> {
        if values.len() != self.len() {
            return Err(PrimitivesError::DimensionMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        Ok(self.ids.iter().copied().zip(values.iter().copied()).collect())
    }
}
