//! Solver constraint bundle.

use crate::{OptimizationError, Result};
use albany_primitives::AssetId;
use serde::{Deserialize, Serialize};

/// Per-asset weight bounds `[min_weight, max_weight]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetBound {
    /// Asset the bound applies to
    pub asset_id: AssetId,
    /// Lower weight bound
    pub min_weight: f64,
    /// Upper weight bound
    pub max_weight: f64,
}

impl AssetBound {
    /// Bound an asset's weight to `[min_weight, max_weight]`.
    pub const fn new(asset_id: AssetId, min_weight: f64, max_weight: f64) -> Self {
        Self {
            asset_id,
            min_weight,
            max_weight,
        }
    }
}

/// Constraints for one optimization run.
///
/// Full investment (`Σw = 1`) is always enforced and is not listed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConstraints {
    /// All weights in `[0, 1]`; otherwise `[-1, 1]`
    pub long_only: bool,
    /// Per-asset overrides of the base weight range
    pub asset_bounds: Vec<AssetBound>,
    /// `Σ|wᵢ| ≤ L`
    pub leverage_cap: Option<f64>,
    /// `|wᵢ| ≤ c` for every asset
    pub concentration_cap: Option<f64>,
    /// `Σ|wᵢ - wᵢ_prev| ≤ T`; needs previous weights
    pub turnover_cap: Option<f64>,
}

impl Default for OptimizationConstraints {
    fn default() -> Self {
        Self::long_only_unconstrained()
    }
}

impl OptimizationConstraints {
    /// Long-only with no bounds or caps.
    pub const fn long_only_unconstrained() -> Self {
        Self {
            long_only: true,
            asset_bounds: Vec::new(),
            leverage_cap: None,
            concentration_cap: None,
            turnover_cap: None,
        }
    }

    /// Short positions allowed, no bounds or caps.
    pub const fn long_short() -> Self {
        Self {
            long_only: false,
            asset_bounds: Vec::new(),
            leverage_cap: None,
            concentration_cap: None,
            turnover_cap: None,
        }
    }

    /// Base weight range before per-asset overrides.
    pub const fn base_bounds(&self) -> (f64, f64) {
        if self.long_only { (0.0, 1.0) } else { (-1.0, 1.0) }
    }

    /// Check that bounds and caps are well formed.
    ///
    /// # Errors
    /// Returns [`OptimizationError::InvalidConstraint`] when a bound has
    /// `min > max` or non-finite ends, a cap is not positive, or the
    /// concentration cap exceeds 1.
    pub fn validate(&self) -> Result<()> {
        for bound in &self.asset_bounds {
            if !bound.min_weight.is_finite() || !bound.max_weight.is_finite() {
                return Err(OptimizationError::InvalidConstraint(format!(
                    "bound for asset {} is not finite",
                    bound.asset_id
                )));
            }
            if bound.min_weight > bound.max_weight {
                return Err(OptimizationError::InvalidConstraint(format!(
                    "min_weight ({}) must not exceed max_weight ({}) for asset {}",
                    bound.min_weight, bound.max_weight, bound.asset_id
                )));
            }
        }

        for (name, cap) in [
            ("leverage_cap", self.leverage_cap),
            ("concentration_cap", self.concentration_cap),
            ("turnover_cap", self.turnover_cap),
        ] {
            if let Some(value) = cap {
                if !(value > 0.0 && value.is_finite()) {
                    return Err(OptimizationError::InvalidConstraint(format!(
                        "{name} must be positive, got {value}"
                    )));
                }
            }
        }

        if let Some(cap) = self.concentration_cap {
            if cap > 1.0 {
                return Err(OptimizationError::InvalidConstraint(format!(
                    "concentration_cap must not exceed 1, got {cap}"
                )));
            }
        }

        Ok(())
    }

    /// Comma-separated summary of the active constraints, empty when none.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.long_only {
            parts.push("long-only".to_string());
        }
        if !self.asset_bounds.is_empty() {
            parts.push(format!("{} per-asset bounds", self.asset_bounds.len()));
        }
        if let Some(cap) = self.leverage_cap {
            parts.push(format!("leverage ≤ {:.0}%", cap * 100.0));
        }
        if let Some(cap) = self.concentration_cap {
            parts.push(format!("concentration ≤ {:.0}%", cap * 100.0));
        }
        if let Some(cap) = self.turnover_cap {
            parts.push(format!("turnover ≤ {:.0}%", cap * 100.0));
        }
        parts.join(", ")
    }
}
