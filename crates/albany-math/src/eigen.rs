//! Symmetric eigendecomposition.
//!
//! Delegates to `nalgebra`'s symmetric QR iteration and reorders the result
//! so eigenvalues ascend, which the PSD checks and repairs downstream rely on.

use crate::convert::{from_dmatrix, to_dmatrix};
use crate::{MathError, Result};
use ndarray::{Array1, Array2};

/// Eigenvalues and eigenvectors of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues in ascending order
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors as columns, aligned with `eigenvalues`
    pub eigenvectors: Array2<f64>,
}

impl SymmetricEigen {
    /// Smallest eigenvalue, or `+inf` for an empty matrix.
    pub fn min_eigenvalue(&self) -> f64 {
        self.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

/// Average a square matrix with its transpose.
pub fn symmetrize(matrix: &Array2<f64>) -> Array2<f64> {
    (matrix + &matrix.t()) / 2.0
}

/// Decompose a symmetric matrix as `V Λ Vᵀ`.
///
/// The input is symmetrized first, so tiny asymmetries from floating-point
/// accumulation do not leak into the result.
///
/// # Errors
/// Returns [`MathError::NotSquare`] for non-square input and
/// [`MathError::NonFinite`] if it contains NaN or infinity.
pub fn symmetric_eigen(matrix: &Array2<f64>) -> Result<SymmetricEigen> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(MathError::NotSquare {
            rows: n,
            cols: matrix.ncols(),
        });
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NonFinite);
    }

    if n == 0 {
        return Ok(SymmetricEigen {
            eigenvalues: Array1::zeros(0),
            eigenvectors: Array2::zeros((0, 0)),
        });
    }

    let decomposition = to_dmatrix(&symmetrize(matrix)).symmetric_eigen();
    let v = from_dmatrix(&decomposition.eigenvectors);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| decomposition.eigenvalues[i].total_cmp(&decomposition.eigenvalues[j]));

    let eigenvalues = order.iter().map(|&i| decomposition.eigenvalues[i]).collect();
    let mut eigenvectors = Array2::<f64>::zeros((n, n));
    for (column, &source) in order.iter().enumerate() {
        eigenvectors.column_mut(column).assign(&v.column(source));
    }

    Ok(SymmetricEigen {
        eigenvalues,
        eigenvectors,
    })
}

/// Rebuild `V Λ Vᵀ` from (possibly modified) eigenvalues.
///
/// The result is symmetrized to remove rounding asymmetry.
///
/// # Errors
/// Returns [`MathError::DimensionMismatch`] when the shapes disagree.
pub fn reconstruct_from_eigen(
    eigenvalues: &Array1<f64>,
    eigenvectors: &Array2<f64>,
) -> Result<Array2<f64>> {
    let n = eigenvalues.len();
    if eigenvectors.nrows() != n || eigenvectors.ncols() != n {
        return Err(MathError::DimensionMismatch {
            expected: n,
            actual: eigenvectors.nrows(),
        });
    }

    let mut v_lambda = eigenvectors.clone();
    for (mut column, &lambda) in v_lambda.columns_mut().into_iter().zip(eigenvalues.iter()) {
        column.mapv_inplace(|x| x * lambda);
    }

    Ok(symmetrize(&v_lambda.dot(&eigenvectors.t())))
}
