//! Unbiased sample covariance.

use super::CovarianceEstimator;
use crate::{EstimationError, Result};
use ndarray::{Array2, Axis};

/// Sample covariance normalized by `N - 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCovarianceEstimator;

impl CovarianceEstimator for SampleCovarianceEstimator {
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>> {
        let n_periods = returns.nrows();
        if n_periods < 2 {
            return Err(EstimationError::InsufficientData {
                required: 2,
                actual: n_periods,
            });
        }

        let means = returns
            .mean_axis(Axis(0))
            .ok_or(EstimationError::InsufficientData {
                required: 2,
                actual: n_periods,
            })?;
        let centered = returns - &means.insert_axis(Axis(0));

        Ok(centered.t().dot(&centered) / (n_periods - 1) as f64)
    }
}
