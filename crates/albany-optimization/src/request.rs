//! Inputs shared by every optimization entry point.

use crate::{OptimizationConstraints, OptimizationError, Result, SolverSettings};
use albany_primitives::{Asset, AssetId};
use ndarray::{Array1, Array2};

/// Borrowed inputs to an optimization call.
///
/// `mu` and `sigma` define the universe; everything else is optional. Per-asset
/// bounds only apply when `asset_ids` is set, the turnover cap only applies
/// when `prev_weights` is set, and tickers in explanations only appear when
/// `assets` has one entry per column.
#[derive(Debug, Clone)]
pub struct OptimizationRequest<'a> {
    /// Annualized expected returns, one per column of `sigma`
    pub mu: &'a Array1<f64>,
    /// Annualized covariance matrix
    pub sigma: &'a Array2<f64>,
    /// Constraint bundle
    pub constraints: &'a OptimizationConstraints,
    /// Weights the turnover cap is measured against
    pub prev_weights: Option<&'a Array1<f64>>,
    /// Column order of `mu` and `sigma` as asset ids
    pub asset_ids: Option<&'a [AssetId]>,
    /// Asset metadata in column order, for explanations
    pub assets: Option<&'a [Asset]>,
    /// Solver settings
    pub settings: SolverSettings,
}

impl<'a> OptimizationRequest<'a> {
    /// Request with no optional inputs and default settings.
    pub fn new(
        mu: &'a Array1<f64>,
        sigma: &'a Array2<f64>,
        constraints: &'a OptimizationConstraints,
    ) -> Self {
        Self {
            mu,
            sigma,
            constraints,
            prev_weights: None,
            asset_ids: None,
            assets: None,
            settings: SolverSettings::default(),
        }
    }

    /// Measure turnover against these weights.
    pub const fn with_prev_weights(mut self, prev_weights: &'a Array1<f64>) -> Self {
        self.prev_weights = Some(prev_weights);
        self
    }

    /// Resolve per-asset bounds through this column order.
    pub const fn with_asset_ids(mut self, asset_ids: &'a [AssetId]) -> Self {
        self.asset_ids = Some(asset_ids);
        self
    }

    /// Label holdings in explanations with these assets' tickers.
    pub const fn with_assets(mut self, assets: &'a [Asset]) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Override solver settings.
    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.mu.len()
    }

    /// Check shapes, finiteness, constraints and settings.
    ///
    /// # Errors
    /// * [`OptimizationError::EmptyUniverse`] when `mu` is empty
    /// * [`OptimizationError::DimensionMismatch`] when an input disagrees
    ///   with the length of `mu`
    /// * [`OptimizationError::NonFinite`] for NaN or infinite inputs
    /// * constraint and settings validation errors
    pub fn validate(&self) -> Result<()> {
        let n = self.n_assets();
        if n == 0 {
            return Err(OptimizationError::EmptyUniverse);
        }
        let check_len = |input: &'static str, actual: usize| {
            if actual == n {
                Ok(())
            } else {
                Err(OptimizationError::DimensionMismatch {
                    input,
                    expected: n,
                    actual,
                })
            }
        };
        check_len("sigma rows", self.sigma.nrows())?;
        check_len("sigma columns", self.sigma.ncols())?;
        if let Some(prev) = self.prev_weights {
            check_len("prev_weights", prev.len())?;
            if prev.iter().any(|v| !v.is_finite()) {
                return Err(OptimizationError::NonFinite("prev_weights"));
            }
        }
        if let Some(ids) = self.asset_ids {
            check_len("asset_ids", ids.len())?;
        }

        if self.mu.iter().any(|v| !v.is_finite()) {
            return Err(OptimizationError::NonFinite("mu"));
        }
        if self.sigma.iter().any(|v| !v.is_finite()) {
            return Err(OptimizationError::NonFinite("sigma"));
        }

        self.constraints.validate()?;
        self.settings.validate()
    }
}
