//! End-to-end estimation of capital-market assumptions from prices.

use crate::{
    CovMethod, CovRepair, DEFAULT_EWMA_HALFLIFE, EstimationError, MuEstimator, PsdStatus, Result,
    ReturnType, TimeSeriesTable, compute_correlation, compute_mu, compute_returns, compute_sigma,
    repair_psd, validate_psd, volatilities,
};
use albany_primitives::{AssetId, Frequency};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration for [`estimate_assumptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumptionConfig {
    /// Sampling frequency of the price table
    pub frequency: Frequency,
    /// Periods per year; derived from `frequency` when `None`
    pub annualization_factor: Option<u32>,
    /// Price to return transform
    pub return_type: ReturnType,
    /// Expected-return estimator
    pub estimator: MuEstimator,
    /// EWMA halflife in periods (EWMA only)
    pub ewma_halflife: f64,
    /// Covariance estimator
    pub cov_method: CovMethod,
    /// Repair applied when Σ fails the PSD check; `None` keeps Σ as estimated
    pub cov_repair: Option<CovRepair>,
}

impl Default for AssumptionConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::Daily,
            annualization_factor: None,
            return_type: ReturnType::Simple,
            estimator: MuEstimator::Historical,
            ewma_halflife: DEFAULT_EWMA_HALFLIFE,
            cov_method: CovMethod::Sample,
            cov_repair: Some(CovRepair::NearestPsd),
        }
    }
}

impl AssumptionConfig {
    /// Periods per year used to annualize μ and Σ.
    pub fn periods_per_year(&self) -> u32 {
        self.annualization_factor
            .unwrap_or_else(|| self.frequency.periods_per_year())
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    /// Returns [`EstimationError::InvalidParameter`] for a zero
    /// annualization factor or a non-positive EWMA halflife.
    pub fn validate(&self) -> Result<()> {
        if self.periods_per_year() == 0 {
            return Err(EstimationError::InvalidParameter(
                "annualization factor must be positive".to_string(),
            ));
        }
        if !(self.ewma_halflife > 0.0 && self.ewma_halflife.is_finite()) {
            return Err(EstimationError::InvalidParameter(format!(
                "EWMA halflife must be positive, got {}",
                self.ewma_halflife
            )));
        }
        Ok(())
    }
}

/// Annualized expected return and volatility of one asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetStats {
    /// Asset identity
    pub asset_id: AssetId,
    /// Annualized expected return
    pub mu_annual: f64,
    /// Annualized volatility
    pub sigma_annual: f64,
}

/// Output of [`estimate_assumptions`]; all vectors and matrices are aligned to
/// `asset_ids`.
#[derive(Debug, Clone, Serialize)]
pub struct Assumptions {
    /// Column labels
    pub asset_ids: Vec<AssetId>,
    /// Periods per year applied
    pub annualization_factor: u32,
    /// Periodic returns the estimates were computed from
    pub returns: TimeSeriesTable,
    /// Annualized expected returns
    pub mu: Array1<f64>,
    /// Annualized covariance, repaired when requested and needed
    pub sigma: Array2<f64>,
    /// Annualized volatilities from the diagonal of `sigma`
    pub volatilities: Array1<f64>,
    /// Correlation matrix derived from `sigma`
    pub correlation: Array2<f64>,
    /// Whether `sigma` failed the PSD check and was repaired
    pub psd_repair_applied: bool,
    /// Repair explanation, or the PSD failure reason when no repair was configured
    pub psd_repair_note: Option<String>,
}

impl Assumptions {
    /// Per-asset annualized statistics.
    pub fn asset_stats(&self) -> Vec<AssetStats> {
        self.asset_ids
            .iter()
            .zip(self.mu.iter().zip(self.volatilities.iter()))
            .map(|(&asset_id, (&mu_annual, &sigma_annual))| AssetStats {
                asset_id,
                mu_annual,
                sigma_annual,
            })
            .collect()
    }
}

/// Run returns, μ, Σ, PSD validation and repair, volatilities and correlation.
///
/// # Errors
/// Propagates configuration and estimation errors from each stage.
pub fn estimate_assumptions(
    prices: &TimeSeriesTable,
    config: &AssumptionConfig,
) -> Result<Assumptions> {
    config.validate()?;
    let m = config.periods_per_year();

    let returns = compute_returns(prices, config.return_type)?;
    let mu = compute_mu(returns.values(), m, config.estimator, config.ewma_halflife)?;
    let mut sigma = compute_sigma(returns.values(), m, config.cov_method)?;

    let mut psd_repair_applied = false;
    let mut psd_repair_note = None;
    if let status @ PsdStatus::Indefinite { min_eigenvalue } = validate_psd(&sigma)? {
        match config.cov_repair {
            Some(CovRepair::NearestPsd) => {
                let repair = repair_psd(&sigma)?;
                info!(
                    min_eigenvalue,
                    clipped = repair.clipped,
                    "covariance repaired to nearest PSD matrix"
                );
                sigma = repair.matrix;
                psd_repair_applied = true;
                psd_repair_note = Some(repair.explanation);
            }
            None => {
                warn!(min_eigenvalue, "covariance is not PSD and no repair is configured");
                psd_repair_note = status.reason();
            }
        }
    }

    let vols = volatilities(&sigma);
    let correlation = compute_correlation(&sigma, &vols)?;

    Ok(Assumptions {
        asset_ids: returns.asset_ids().to_vec(),
        annualization_factor: m,
        returns,
        mu,
        sigma,
        volatilities: vols,
        correlation,
        psd_repair_applied,
        psd_repair_note,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use tracing_test::traced_test;
    use uuid::Uuid;

    fn price_table() -> TimeSeriesTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let prices = ndarray::array![
            [100.0, 50.0, 20.0],
            [101.0, 49.5, 20.4],
            [99.5, 50.5, 20.2],
            [102.0, 51.0, 20.9],
            [103.5, 50.2, 21.3],
            [102.8, 51.7, 21.0],
        ];
        let dates = (0..prices.nrows())
            .map(|i| start + chrono::Months::new(i as u32))
            .collect();
        let ids = (0..prices.ncols()).map(|_| Uuid::new_v4()).collect();
        TimeSeriesTable::new(ids, dates, prices).unwrap()
    }

    #[test]
    fn test_pipeline_shapes_and_flags() {
        let prices = price_table();
        let config = AssumptionConfig {
            frequency: Frequency::Monthly,
            ..Default::default()
        };
        let assumptions = estimate_assumptions(&prices, &config).unwrap();

        assert_eq!(assumptions.annualization_factor, 12);
        assert_eq!(assumptions.returns.n_obs(), 5);
        assert_eq!(assumptions.mu.len(), 3);
        assert_eq!(assumptions.sigma.dim(), (3, 3));
        assert!(!assumptions.psd_repair_applied);
        assert!(assumptions.psd_repair_note.is_none());
        for i in 0..3 {
            assert_eq!(assumptions.correlation[[i, i]], 1.0);
            assert_relative_eq!(
                assumptions.volatilities[i],
                assumptions.sigma[[i, i]].sqrt(),
                epsilon = 1e-15
            );
        }
    }

    #[test]
    fn test_explicit_annualization_factor_wins() {
        let config = AssumptionConfig {
            annualization_factor: Some(4),
            ..Default::default()
        };
        assert_eq!(config.periods_per_year(), 4);
        assert_eq!(AssumptionConfig::default().periods_per_year(), 252);
    }

    #[test]
    fn test_asset_stats_align_with_ids() {
        let prices = price_table();
        let assumptions = estimate_assumptions(&prices, &AssumptionConfig::default()).unwrap();
        let stats = assumptions.asset_stats();

        assert_eq!(stats.len(), 3);
        for (i, stat) in stats.iter().enumerate() {
            assert_eq!(stat.asset_id, prices.asset_ids()[i]);
            assert_eq!(stat.mu_annual, assumptions.mu[i]);
            assert_eq!(stat.sigma_annual, assumptions.volatilities[i]);
        }
    }

    #[test]
    fn test_shrinkage_estimator_propagates_not_implemented() {
        let config = AssumptionConfig {
            estimator: MuEstimator::Shrinkage,
            ..Default::default()
        };
        assert!(matches!(
            estimate_assumptions(&price_table(), &config),
            Err(EstimationError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AssumptionConfig {
            annualization_factor: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[traced_test]
    fn test_ledoit_wolf_pipeline_needs_no_repair() {
        let config = AssumptionConfig {
            cov_method: CovMethod::LedoitWolf,
            cov_repair: None,
            ..Default::default()
        };
        let assumptions = estimate_assumptions(&price_table(), &config).unwrap();
        assert!(!assumptions.psd_repair_applied);
        assert!(!logs_contain("not PSD"));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: AssumptionConfig =
            serde_json::from_str(r#"{"frequency": "weekly", "cov_method": "ledoit_wolf"}"#).unwrap();
        assert_eq!(config.periods_per_year(), 52);
        assert_eq!(config.cov_method, CovMethod::LedoitWolf);
        assert_eq!(config.cov_repair, Some(CovRepair::NearestPsd));
    }
}
