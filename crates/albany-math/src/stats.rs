//! Portfolio statistics on dense weight vectors.

use crate::{MathError, Result};
use ndarray::{Array1, Array2};

/// Portfolio variance `wᵀ Σ w`.
pub fn portfolio_variance(weights: &Array1<f64>, sigma: &Array2<f64>) -> f64 {
    weights.dot(&sigma.dot(weights))
}

/// Portfolio volatility `sqrt(max(0, wᵀ Σ w))`.
///
/// Tiny negative variances from rounding are floored at zero.
pub fn portfolio_volatility(weights: &Array1<f64>, sigma: &Array2<f64>) -> f64 {
    portfolio_variance(weights, sigma).max(0.0).sqrt()
}

/// Herfindahl-Hirschman index `Σ wᵢ²`.
pub fn herfindahl(weights: &Array1<f64>) -> f64 {
    weights.iter().map(|w| w * w).sum()
}

/// Effective number of holdings `1 / HHI`; infinite for a zero HHI.
pub fn effective_n(hhi: f64) -> f64 {
    if hhi > 0.0 { 1.0 / hhi } else { f64::INFINITY }
}

/// Per-asset volatilities `sqrt(max(0, Σᵢᵢ))`.
pub fn volatilities(sigma: &Array2<f64>) -> Array1<f64> {
    sigma.diag().mapv(|v| v.max(0.0).sqrt())
}

/// Convert a covariance matrix to correlations.
///
/// Entries involving a zero-volatility asset are 0. Off-diagonal entries are
/// clamped to `[-1, 1]` and the diagonal is exactly 1.
///
/// # Errors
/// Returns [`MathError::NotSquare`] or [`MathError::DimensionMismatch`] on
/// shape errors.
pub fn correlation_from_covariance(
    sigma: &Array2<f64>,
    vols: &Array1<f64>,
) -> Result<Array2<f64>> {
    let n = sigma.nrows();
    if n != sigma.ncols() {
        return Err(MathError::NotSquare {
            rows: n,
            cols: sigma.ncols(),
        });
    }
    if vols.len() != n {
        return Err(MathError::DimensionMismatch {
            expected: n,
            actual: vols.len(),
        });
    }

    let mut corr = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            corr[[i, j]] = if i == j {
                1.0
            } else {
                let denom = vols[i] * vols[j];
                if denom > 0.0 {
                    (sigma[[i, j]] / denom).clamp(-1.0, 1.0)
                } else {
                    0.0
                }
            };
        }
    }
    Ok(corr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    #[test]
    fn test_variance_and_volatility() {
        let sigma = array![[0.04, 0.006], [0.006, 0.09]];
        let w = array![0.6, 0.4];
        let expected = 0.36 * 0.04 + 2.0 * 0.24 * 0.006 + 0.16 * 0.09;

        assert_relative_eq!(portfolio_variance(&w, &sigma), expected, epsilon = 1e-15);
        assert_relative_eq!(portfolio_volatility(&w, &sigma), expected.sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn test_volatility_floors_negative_variance() {
        let sigma = array![[-1e-18]];
        assert_eq!(portfolio_volatility(&array![1.0], &sigma), 0.0);
    }

    #[rstest]
    #[case(vec![0.25, 0.25, 0.25, 0.25], 0.25, 4.0)]
    #[case(vec![1.0, 0.0, 0.0], 1.0, 1.0)]
    #[case(vec![0.5, -0.5, 1.0], 1.5, 1.0 / 1.5)]
    fn test_concentration(#[case] weights: Vec<f64>, #[case] hhi: f64, #[case] n_eff: f64) {
        let w = Array1::from(weights);
        assert_relative_eq!(herfindahl(&w), hhi, epsilon = 1e-15);
        assert_relative_eq!(effective_n(herfindahl(&w)), n_eff, epsilon = 1e-12);
    }

    #[test]
    fn test_effective_n_of_empty_portfolio_is_infinite() {
        assert!(effective_n(0.0).is_infinite());
    }

    #[test]
    fn test_correlation_from_covariance() {
        let sigma = array![[0.04, 0.03, 0.0], [0.03, 0.09, 0.0], [0.0, 0.0, 0.0]];
        let vols = volatilities(&sigma);
        let corr = correlation_from_covariance(&sigma, &vols).unwrap();

        assert_relative_eq!(corr[[0, 1]], 0.03 / (0.2 * 0.3), epsilon = 1e-12);
        assert_relative_eq!(corr[[1, 0]], corr[[0, 1]]);
        // Zero-volatility asset
        assert_eq!(corr[[0, 2]], 0.0);
        assert_eq!(corr[[2, 2]], 1.0);
    }

    #[test]
    fn test_correlation_is_clamped() {
        let sigma = array![[1.0, 1.0 + 1e-9], [1.0 + 1e-9, 1.0]];
        let corr = correlation_from_covariance(&sigma, &volatilities(&sigma)).unwrap();
        assert_eq!(corr[[0, 1]], 1.0);
    }
}
