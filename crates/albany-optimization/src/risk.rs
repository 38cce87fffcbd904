//! Risk attribution of a weight vector.

use crate::{OptimizationError, PortfolioSolution, Result, WEIGHT_TOLERANCE};
use albany_math::portfolio_volatility;
use albany_primitives::AssetId;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Per-asset contributions to portfolio volatility, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDecomposition {
    /// Marginal contribution `(Σw)ᵢ / σ`
    pub mcr: Array1<f64>,
    /// Component contribution `wᵢ · MCRᵢ`; sums to `σ`
    pub crc: Array1<f64>,
    /// Percent contribution `CRCᵢ / σ`; sums to 1
    pub prc: Array1<f64>,
}

impl RiskDecomposition {
    fn zeros(n: usize) -> Self {
        Self {
            mcr: Array1::zeros(n),
            crc: Array1::zeros(n),
            prc: Array1::zeros(n),
        }
    }
}

/// Decompose portfolio volatility into per-asset contributions.
///
/// A portfolio with volatility below [`WEIGHT_TOLERANCE`] has no risk to
/// attribute and gets all zeros.
///
/// # Errors
/// Returns [`OptimizationError::DimensionMismatch`] if `sigma` is not
/// `n × n` for `n` weights.
pub fn compute_risk_decomposition(
    weights: &Array1<f64>,
    sigma: &Array2<f64>,
) -> Result<RiskDecomposition> {
    let n = weights.len();
    if sigma.nrows() != n || sigma.ncols() != n {
        return Err(OptimizationError::DimensionMismatch {
            input: "sigma",
            expected: n,
            actual: if sigma.nrows() == n {
                sigma.ncols()
            } else {
                sigma.nrows()
            },
        });
    }

    let stdev = portfolio_volatility(weights, sigma);
    if stdev < WEIGHT_TOLERANCE {
        return Ok(RiskDecomposition::zeros(n));
    }

    let mcr = sigma.dot(weights) / stdev;
    let crc = weights * &mcr;
    let prc = &crc / stdev;
    Ok(RiskDecomposition { mcr, crc, prc })
}

/// One holding with its risk contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeight {
    /// Asset identity
    pub asset_id: AssetId,
    /// Portfolio weight
    pub weight: f64,
    /// Marginal contribution to risk
    pub mcr: f64,
    /// Component contribution to risk
    pub crc: f64,
    /// Percent contribution to risk
    pub prc: f64,
}

/// Pair each asset id with its weight and risk contributions.
///
/// # Errors
/// Returns [`OptimizationError::DimensionMismatch`] if `asset_ids` or `sigma`
/// does not match the number of weights.
pub fn portfolio_weights(
    solution: &PortfolioSolution,
    sigma: &Array2<f64>,
    asset_ids: &[AssetId],
) -> Result<Vec<PortfolioWeight>> {
    let n = solution.weights.len();
    if asset_ids.len() != n {
        return Err(OptimizationError::DimensionMismatch {
            input: "asset_ids",
            expected: n,
            actual: asset_ids.len(),
        });
    }
    let risk = compute_risk_decomposition(&solution.weights, sigma)?;

    Ok(asset_ids
        .iter()
        .enumerate()
        .map(|(i, &asset_id)| PortfolioWeight {
            asset_id,
            weight: solution.weights[i],
            mcr: risk.mcr[i],
            crc: risk.crc[i],
            prc: risk.prc[i],
        })
        .collect())
}
