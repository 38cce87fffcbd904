//! Positive semi-definiteness checks and repair.

use crate::{EstimationError, Result};
use albany_math::{reconstruct_from_eigen, symmetric_eigen};
use derive_more::Display;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Smallest eigenvalue still accepted as PSD; absorbs rounding near zero.
pub const PSD_TOLERANCE: f64 = 1e-8;

/// Post-estimation covariance repair method.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovRepair {
    /// Clip negative eigenvalues to zero
    #[default]
    #[display("nearest_psd")]
    NearestPsd,
}

impl FromStr for CovRepair {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest_psd" => Ok(Self::NearestPsd),
            _ => Err(EstimationError::UnsupportedValue {
                kind: "covariance repair",
                value: s.to_string(),
            }),
        }
    }
}

/// Outcome of [`validate_psd`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PsdStatus {
    /// All eigenvalues are at least `-PSD_TOLERANCE`
    PositiveSemiDefinite,
    /// Some eigenvalue is below `-PSD_TOLERANCE`
    Indefinite {
        /// Smallest eigenvalue found
        min_eigenvalue: f64,
    },
}

impl PsdStatus {
    /// Whether the matrix passed the check.
    pub const fn is_psd(&self) -> bool {
        matches!(self, Self::PositiveSemiDefinite)
    }

    /// Human-readable reason for a failed check.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::PositiveSemiDefinite => None,
            Self::Indefinite { min_eigenvalue } => Some(format!(
                "Matrix is not positive semi-definite: minimum eigenvalue is {min_eigenvalue:.6e}."
            )),
        }
    }
}

/// A matrix projected onto the PSD cone.
#[derive(Debug, Clone, Serialize)]
pub struct PsdRepair {
    /// Repaired symmetric PSD matrix
    pub matrix: Array2<f64>,
    /// Number of eigenvalues that were negative and clipped to zero
    pub clipped: usize,
    /// Smallest eigenvalue of the input
    pub min_eigenvalue: f64,
    /// Description of what was done
    pub explanation: String,
}

/// Check a symmetric matrix for positive semi-definiteness.
///
/// # Errors
/// Returns an error for non-square or non-finite input.
pub fn validate_psd(matrix: &Array2<f64>) -> Result<PsdStatus> {
    let min_eigenvalue = symmetric_eigen(matrix)?.min_eigenvalue();
    if min_eigenvalue < -PSD_TOLERANCE {
        Ok(PsdStatus::Indefinite { min_eigenvalue })
    } else {
        Ok(PsdStatus::PositiveSemiDefinite)
    }
}

/// Project a symmetric matrix to the nearest PSD matrix in Frobenius norm.
///
/// Negative eigenvalues are clipped to zero, the matrix is rebuilt and
/// re-symmetrized. The projection runs even when the input is already PSD,
/// in which case the output equals the input up to rounding.
///
/// # Errors
/// Returns an error for non-square or non-finite input.
pub fn repair_psd(matrix: &Array2<f64>) -> Result<PsdRepair> {
    let eig = symmetric_eigen(matrix)?;
    let min_eigenvalue = eig.min_eigenvalue();
    let clipped = eig.eigenvalues.iter().filter(|&&v| v < 0.0).count();

    let eigenvalues = eig.eigenvalues.mapv(|v| v.max(0.0));
    let repaired = reconstruct_from_eigen(&eigenvalues, &eig.eigenvectors)?;

    let explanation = format!(
        "Clipped {clipped} negative eigenvalue(s) to zero (minimum was {min_eigenvalue:.6e}). \
         Matrix projected to the nearest positive semi-definite matrix."
    );

    Ok(PsdRepair {
        matrix: repaired,
        clipped,
        min_eigenvalue,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn indefinite() -> Array2<f64> {
        // Eigenvalues 3 and -1
        array![[1.0, 2.0], [2.0, 1.0]]
    }

    #[test]
    fn test_validate_accepts_psd() {
        let matrix = array![[0.04, 0.01], [0.01, 0.09]];
        let status = validate_psd(&matrix).unwrap();
        assert!(status.is_psd());
        assert_eq!(status.reason(), None);
    }

    #[test]
    fn test_validate_tolerates_rounding_below_zero() {
        let matrix = array![[1.0, 1.0], [1.0, 1.0 - 1e-12]];
        assert!(validate_psd(&matrix).unwrap().is_psd());
    }

    #[test]
    fn test_validate_rejects_indefinite_with_reason() {
        let status = validate_psd(&indefinite()).unwrap();
        assert!(!status.is_psd());

        let PsdStatus::Indefinite { min_eigenvalue } = status else {
            panic!("expected indefinite");
        };
        assert_abs_diff_eq!(min_eigenvalue, -1.0, epsilon = 1e-12);
        let reason = status.reason().unwrap();
        assert!(reason.starts_with("Matrix is not positive semi-definite"));
        assert!(reason.contains("-1.000000e0"));
    }

    #[test]
    fn test_repair_clips_and_explains() {
        let repair = repair_psd(&indefinite()).unwrap();

        assert_eq!(repair.clipped, 1);
        assert_abs_diff_eq!(repair.min_eigenvalue, -1.0, epsilon = 1e-12);
        // Only the eigenvalue 3 survives: 1.5 * [[1, 1], [1, 1]]
        for value in repair.matrix.iter() {
            assert_abs_diff_eq!(*value, 1.5, epsilon = 1e-12);
        }
        assert!(validate_psd(&repair.matrix).unwrap().is_psd());
        assert!(repair.explanation.starts_with("Clipped 1 negative eigenvalue(s) to zero"));
        assert!(repair.explanation.contains("nearest positive semi-definite"));
    }

    #[test]
    fn test_repair_is_idempotent() {
        let matrix = array![
            [1.0, 0.9, -0.6],
            [0.9, 1.0, 0.9],
            [-0.6, 0.9, 1.0],
        ];
        let once = repair_psd(&matrix).unwrap().matrix;
        let twice = repair_psd(&once).unwrap().matrix;

        for (a, b) in once.iter().zip(twice.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-10);
        }
        assert_eq!(once, once.t());
    }

    #[test]
    fn test_parse_repair() {
        assert_eq!("nearest_psd".parse::<CovRepair>().unwrap(), CovRepair::NearestPsd);
        assert!("higham".parse::<CovRepair>().is_err());
    }
}
