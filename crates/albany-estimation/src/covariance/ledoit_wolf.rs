//! Ledoit-Wolf Shrinkage Covariance Estimator
//!
//! Implements the analytical shrinkage estimator from:
//! "A well-conditioned estimator for large-dimensional covariance matrices"
//! (Ledoit & Wolf, 2004)
//!
//! The sample covariance is shrunk toward a scaled identity to improve
//! conditioning when the number of observations is small relative to the
//! number of assets:
//!
//! Σ_LW = (1-s) S + s μ_T I
//!
//! where:
//! - S is the biased (1/n) sample covariance of centred returns
//! - μ_T = trace(S) / p is the average variance
//! - s = min(β, δ) / δ is the shrinkage intensity, with
//!   δ = ‖S - μ_T I‖²_F / p and β the dispersion of the per-observation
//!   outer products around S
//!
//! The result is a convex combination of two PSD matrices and is therefore
//! always PSD.

use super::CovarianceEstimator;
use crate::{EstimationError, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Ledoit-Wolf covariance estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedoitWolfConfig {
    /// Minimum number of observations required (default: 2)
    pub min_observations: usize,

    /// Whether to center returns (subtract mean) before computing covariance
    pub center: bool,
}

impl Default for LedoitWolfConfig {
    fn default() -> Self {
        Self {
            min_observations: 2,
            center: true,
        }
    }
}

/// Ledoit-Wolf shrinkage covariance estimator
#[derive(Debug, Default)]
pub struct LedoitWolfEstimator {
    config: LedoitWolfConfig,
}

impl LedoitWolfEstimator {
    /// Create a new Ledoit-Wolf estimator with the given configuration
    pub const fn new(config: LedoitWolfConfig) -> Self {
        Self { config }
    }

    fn check_observations(&self, returns: &Array2<f64>) -> Result<()> {
        let n_periods = returns.nrows();
        if n_periods < self.config.min_observations.max(1) {
            return Err(EstimationError::InsufficientData {
                required: self.config.min_observations.max(1),
                actual: n_periods,
            });
        }
        Ok(())
    }

    fn prepared_returns(&self, returns: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.config.center {
            return Ok(returns.clone());
        }
        let means = returns
            .mean_axis(Axis(0))
            .ok_or(EstimationError::InsufficientData {
                required: 1,
                actual: 0,
            })?;
        Ok(returns - &means.insert_axis(Axis(0)))
    }

    /// Biased sample covariance `Xᵀ X / n` of prepared returns
    fn sample_covariance(x: &Array2<f64>) -> Array2<f64> {
        x.t().dot(x) / x.nrows() as f64
    }

    /// Average variance `trace(S) / p`, the scale of the identity target
    fn target_scale(sample_cov: &Array2<f64>) -> f64 {
        let p = sample_cov.nrows();
        if p == 0 {
            return 0.0;
        }
        sample_cov.diag().sum() / p as f64
    }

    /// Optimal shrinkage intensity in [0, 1]
    fn compute_shrinkage_intensity(x: &Array2<f64>, sample_cov: &Array2<f64>) -> f64 {
        let (n_periods, n_assets) = x.dim();
        if n_assets <= 1 {
            return 0.0;
        }
        let n = n_periods as f64;
        let p = n_assets as f64;
        let mu = Self::target_scale(sample_cov);

        // δ = ‖S - μ I‖²_F / p
        let mut delta = 0.0;
        for i in 0..n_assets {
            for j in 0..n_assets {
                let target = if i == j { mu } else { 0.0 };
                let diff = sample_cov[[i, j]] - target;
                delta += diff * diff;
            }
        }
        delta /= p;

        // β = (1 / (p n)) · (Σ_t ‖x_t x_tᵀ‖²_F / n - ‖S‖²_F)
        let x2 = x.mapv(|v| v * v);
        let outer_norms = x2.t().dot(&x2).sum() / n;
        let sample_norm = sample_cov.iter().map(|v| v * v).sum::<f64>();
        let beta = ((outer_norms - sample_norm) / (p * n)).max(0.0);

        if delta > 0.0 {
            beta.min(delta) / delta
        } else {
            0.0
        }
    }

    /// Shrinkage intensity the estimator would apply to these returns
    /// (useful for diagnostics)
    ///
    /// # Errors
    /// Returns [`EstimationError::InsufficientData`] when there are fewer
    /// observations than `min_observations`.
    pub fn shrinkage_intensity(&self, returns: &Array2<f64>) -> Result<f64> {
        self.check_observations(returns)?;
        let x = self.prepared_returns(returns)?;
        let sample_cov = Self::sample_covariance(&x);
        Ok(Self::compute_shrinkage_intensity(&x, &sample_cov))
    }
}

impl CovarianceEstimator for LedoitWolfEstimator {
    fn estimate(&self, returns: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_observations(returns)?;

        let x = self.prepared_returns(returns)?;
        let sample_cov = Self::sample_covariance(&x);
        let shrinkage = Self::compute_shrinkage_intensity(&x, &sample_cov);
        let mu = Self::target_scale(&sample_cov);

        let mut shrunk = sample_cov * (1.0 - shrinkage);
        shrunk.diag_mut().mapv_inplace(|v| v + shrinkage * mu);

        Ok(shrunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albany_math::symmetric_eigen;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn correlated_returns() -> Array2<f64> {
        array![
            [0.010, 0.012],
            [-0.020, -0.018],
            [0.015, 0.011],
            [0.003, 0.006],
            [-0.007, -0.010],
            [0.021, 0.017],
            [-0.012, -0.009],
            [0.004, 0.001],
        ]
    }

    #[test]
    fn test_ledoit_wolf_config_default() {
        let config = LedoitWolfConfig::default();
        assert_eq!(config.min_observations, 2);
        assert!(config.center);
    }

    #[test]
    fn test_insufficient_data() {
        let estimator = LedoitWolfEstimator::default();
        let returns = Array2::<f64>::zeros((1, 3));
        assert!(matches!(
            estimator.estimate(&returns),
            Err(EstimationError::InsufficientData { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_sample_covariance_uncentered() {
        let returns = Array2::from_shape_vec((3, 2), vec![1.0, 2.0, 2.0, 4.0, 3.0, 6.0]).unwrap();
        let sample_cov = LedoitWolfEstimator::sample_covariance(&returns);

        // Expected: (1/3) * [[14, 28], [28, 56]]
        assert_relative_eq!(sample_cov[[0, 0]], 14.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(sample_cov[[0, 1]], 28.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(sample_cov[[1, 1]], 56.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_matches_reference_values() {
        let estimator = LedoitWolfEstimator::default();
        let returns = correlated_returns();

        let shrinkage = estimator.shrinkage_intensity(&returns).unwrap();
        assert_relative_eq!(shrinkage, 0.2113788265357696, max_relative = 1e-9);

        let cov = estimator.estimate(&returns).unwrap();
        assert_relative_eq!(cov[[0, 0]], 1.6629121524225802e-4, max_relative = 1e-9);
        assert_relative_eq!(cov[[0, 1]], 1.1676522249604763e-4, max_relative = 1e-9);
        assert_relative_eq!(cov[[1, 0]], 1.1676522249604763e-4, max_relative = 1e-9);
        assert_relative_eq!(cov[[1, 1]], 1.3908378475774205e-4, max_relative = 1e-9);
    }

    #[test]
    fn test_trace_is_preserved() {
        let returns = correlated_returns();
        let x = LedoitWolfEstimator::default().prepared_returns(&returns).unwrap();
        let sample_trace = LedoitWolfEstimator::sample_covariance(&x).diag().sum();
        let shrunk_trace = LedoitWolfEstimator::default()
            .estimate(&returns)
            .unwrap()
            .diag()
            .sum();
        assert_relative_eq!(sample_trace, shrunk_trace, max_relative = 1e-12);
    }

    #[test]
    fn test_result_is_psd_with_more_assets_than_observations() {
        let returns = array![
            [0.01, -0.02, 0.005, 0.012, -0.004],
            [-0.015, 0.01, 0.002, -0.008, 0.006],
            [0.007, 0.004, -0.011, 0.003, 0.001],
        ];
        let cov = LedoitWolfEstimator::default().estimate(&returns).unwrap();
        let eig = symmetric_eigen(&cov).unwrap();
        assert!(eig.min_eigenvalue() > 0.0);
    }

    #[test]
    fn test_single_asset_is_not_shrunk() {
        let returns = array![[0.01], [0.03], [-0.01]];
        let estimator = LedoitWolfEstimator::default();
        assert_eq!(estimator.shrinkage_intensity(&returns).unwrap(), 0.0);
    }
}
