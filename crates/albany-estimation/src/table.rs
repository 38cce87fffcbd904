//! Dated, asset-labelled 2-D series.

use crate::{EstimationError, Result};
use albany_primitives::{AssetId, AssetIndex};
use chrono::NaiveDate;
use ndarray::Array2;
use serde::Serialize;

/// Rows are time-ordered observations, columns are assets.
///
/// Used for both prices and returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesTable {
    asset_ids: Vec<AssetId>,
    dates: Vec<NaiveDate>,
    values: Array2<f64>,
}

impl TimeSeriesTable {
    /// Build a table, checking that labels match the value shape.
    ///
    /// # Errors
    /// Returns [`EstimationError::DimensionMismatch`] when `dates` or
    /// `asset_ids` disagree with `values`, or a primitives error when an asset
    /// id is repeated.
    pub fn new(
        asset_ids: Vec<AssetId>,
        dates: Vec<NaiveDate>,
        values: Array2<f64>,
    ) -> Result<Self> {
        let (rows, cols) = values.dim();
        if dates.len() != rows {
            return Err(EstimationError::DimensionMismatch {
                expected: rows,
                actual: dates.len(),
            });
        }
        if asset_ids.len() != cols {
            return Err(EstimationError::DimensionMismatch {
                expected: cols,
                actual: asset_ids.len(),
            });
        }
        // Rejects duplicate ids
        AssetIndex::new(asset_ids.clone())?;

        Ok(Self {
            asset_ids,
            dates,
            values,
        })
    }

    /// Column labels.
    pub fn asset_ids(&self) -> &[AssetId] {
        &self.asset_ids
    }

    /// Row labels.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observations, one row per date.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of observations.
    pub fn n_obs(&self) -> usize {
        self.values.nrows()
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.values.ncols()
    }

    /// Index mapping the column labels to positions.
    ///
    /// # Errors
    /// Never fails for a table built through [`TimeSeriesTable::new`].
    pub fn asset_index(&self) -> Result<AssetIndex> {
        Ok(AssetIndex::new(self.asset_ids.clone())?)
    }
}
