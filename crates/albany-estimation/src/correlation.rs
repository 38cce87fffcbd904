//! Covariance to correlation conversion.

use crate::Result;
use ndarray::{Array1, Array2};

/// Per-asset volatilities from the covariance diagonal.
pub fn volatilities(covariance: &Array2<f64>) -> Array1<f64> {
    albany_math::volatilities(covariance)
}

/// Correlation matrix `ρᵢⱼ = Σᵢⱼ / (σᵢ σⱼ)` from caller-supplied volatilities.
///
/// The diagonal is exactly 1, off-diagonal entries are clamped to `[-1, 1]`
/// and pairs involving a zero volatility are 0.
///
/// # Errors
/// Returns a dimension error when `volatilities` does not match `covariance`.
pub fn compute_correlation(covariance: &Array2<f64>, volatilities: &Array1<f64>) -> Result<Array2<f64>> {
    Ok(albany_math::correlation_from_covariance(covariance, volatilities)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_round_trip_through_volatilities() {
        let cov = array![[0.04, 0.012, -0.006], [0.012, 0.09, 0.0], [-0.006, 0.0, 0.01]];
        let vols = volatilities(&cov);
        let corr = compute_correlation(&cov, &vols).unwrap();

        for i in 0..3 {
            assert_eq!(corr[[i, i]], 1.0);
            for j in 0..3 {
                assert_abs_diff_eq!(corr[[i, j]] * vols[i] * vols[j], cov[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let cov = Array2::<f64>::eye(2);
        assert!(compute_correlation(&cov, &array![1.0]).is_err());
    }
}
