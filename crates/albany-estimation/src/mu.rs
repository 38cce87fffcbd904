//! Expected-return estimation.

use crate::{EstimationError, Result};
use derive_more::Display;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default EWMA halflife in periods (about one quarter of trading days).
pub const DEFAULT_EWMA_HALFLIFE: f64 = 63.0;

/// Expected-return (μ) estimation method.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuEstimator {
    /// Arithmetic mean over the full window
    #[default]
    #[display("historical")]
    Historical,
    /// Exponentially weighted mean evaluated at the last period
    #[display("ewma")]
    Ewma,
    /// Shrinkage toward a grand mean; not implemented
    #[display("shrinkage")]
    Shrinkage,
}

impl FromStr for MuEstimator {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "historical" => Ok(Self::Historical),
            "ewma" => Ok(Self::Ewma),
            "shrinkage" => Ok(Self::Shrinkage),
            _ => Err(EstimationError::UnsupportedValue {
                kind: "expected-return estimator",
                value: s.to_string(),
            }),
        }
    }
}

/// Annualized expected-return vector `μ = m · r̄`.
///
/// `halflife` is only read by [`MuEstimator::Ewma`]; pass
/// [`DEFAULT_EWMA_HALFLIFE`] otherwise.
///
/// # Errors
/// * [`EstimationError::NotImplemented`] for [`MuEstimator::Shrinkage`]
/// * [`EstimationError::InsufficientData`] when `returns` has no rows
/// * [`EstimationError::InvalidParameter`] for a non-positive halflife
pub fn compute_mu(
    returns: &Array2<f64>,
    annualization_factor: u32,
    estimator: MuEstimator,
    halflife: f64,
) -> Result<Array1<f64>> {
    let n_obs = returns.nrows();
    if n_obs == 0 {
        return Err(EstimationError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let periodic = match estimator {
        MuEstimator::Shrinkage => return Err(EstimationError::NotImplemented { estimator }),
        MuEstimator::Historical => returns
            .mean_axis(Axis(0))
            .ok_or(EstimationError::InsufficientData {
                required: 1,
                actual: 0,
            })?,
        MuEstimator::Ewma => ewma_mean(returns, halflife)?,
    };

    Ok(periodic * f64::from(annualization_factor))
}

/// Bias-adjusted exponentially weighted mean at the most recent row.
///
/// Weight of the observation `k` periods before the last is `(1 - α)^k`
/// with `α = 1 - exp(ln(0.5) / halflife)`, normalized over all rows.
fn ewma_mean(returns: &Array2<f64>, halflife: f64) -> Result<Array1<f64>> {
    if !(halflife > 0.0 && halflife.is_finite()) {
        return Err(EstimationError::InvalidParameter(format!(
            "EWMA halflife must be positive, got {halflife}"
        )));
    }

    let alpha = 1.0 - (0.5f64.ln() / halflife).exp();
    let decay = 1.0 - alpha;
    let n_obs = returns.nrows();

    let weights: Array1<f64> = (0..n_obs)
        .map(|t| decay.powi((n_obs - 1 - t) as i32))
        .collect();
    let total = weights.sum();

    Ok(returns.t().dot(&weights) / total)
}
