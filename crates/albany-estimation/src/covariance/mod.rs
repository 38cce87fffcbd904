//! Covariance estimation
//!
//! Estimators produce the per-period covariance of a return matrix (rows are
//! periods, columns are assets); [`compute_sigma`] annualizes it.

pub mod ledoit_wolf;
pub mod sample;

pub use ledoit_wolf::{LedoitWolfConfig, LedoitWolfEstimator};
pub use sample::SampleCovarianceEstimator;

use crate::{EstimationError, Result};
use derive_more::Display;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Trait for covariance matrix estimators
pub trait CovarianceEstimator {
    /// Estimate the per-period covariance matrix from returns
    ///
    /// # Arguments
    /// * `returns` - Matrix where each row is a period and each column is an asset
    ///
    /// # Returns
    /// * Estimated covariance matrix (N x N where N is the number of assets)
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>>;
}

/// Covariance matrix (Σ) estimation method.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovMethod {
    /// Unbiased sample covariance
    #[default]
    #[display("sample")]
    Sample,
    /// Ledoit-Wolf shrinkage toward a scaled identity
    #[display("ledoit_wolf")]
    LedoitWolf,
}

impl FromStr for CovMethod {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" => Ok(Self::Sample),
            "ledoit_wolf" => Ok(Self::LedoitWolf),
            _ => Err(EstimationError::UnsupportedValue {
                kind: "covariance method",
                value: s.to_string(),
            }),
        }
    }
}

/// Annualized covariance `Σ = m · Cov(r)`.
///
/// # Errors
/// Returns [`EstimationError::InsufficientData`] when the chosen estimator
/// needs more observations than are available.
pub fn compute_sigma(
    returns: &Array2<f64>,
    annualization_factor: u32,
    method: CovMethod,
) -> Result<Array2<f64>> {
    let periodic = match method {
        CovMethod::Sample => SampleCovarianceEstimator.estimate(returns)?,
        CovMethod::LedoitWolf => LedoitWolfEstimator::default().estimate(returns)?,
    };
    Ok(periodic * f64::from(annualization_factor))
}
