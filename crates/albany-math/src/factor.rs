//! Dense factorizations with reusable solves.
//!
//! The solver factors one matrix and then solves against many right-hand
//! sides, so factor and solve are split. Both types wrap `nalgebra`
//! decompositions behind an `ndarray` interface.

use crate::convert::{from_dvector, to_dmatrix, to_dvector};
use crate::{MathError, Result};
use nalgebra::Dyn;
use ndarray::{Array1, Array2};

fn ensure_square(matrix: &Array2<f64>) -> Result<usize> {
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
    Ok(n)
}

fn ensure_len(expected: usize, rhs: &Array1<f64>) -> Result<()> {
    if rhs.len() != expected {
        return Err(MathError::DimensionMismatch {
            expected,
            actual: rhs.len(),
        });
    }
    Ok(())
}

/// Cholesky factor `L` with `A = L Lᵀ`.
#[derive(Debug, Clone)]
pub struct Cholesky {
    inner: nalgebra::Cholesky<f64, Dyn>,
}

impl Cholesky {
    /// Factor a symmetric positive definite matrix.
    ///
    /// Only the lower triangle of `matrix` is read.
    ///
    /// # Errors
    /// Returns [`MathError::NotPositiveDefinite`] when a pivot is not
    /// strictly positive.
    pub fn factor(matrix: &Array2<f64>) -> Result<Self> {
        ensure_square(matrix)?;
        let inner = to_dmatrix(matrix)
            .cholesky()
            .ok_or(MathError::NotPositiveDefinite)?;
        Ok(Self { inner })
    }

    /// Dimension of the factored matrix.
    pub fn dim(&self) -> usize {
        self.inner.l_dirty().nrows()
    }

    /// Solve `A x = b`.
    ///
    /// # Errors
    /// Returns [`MathError::DimensionMismatch`] if `b` has the wrong length.
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        ensure_len(self.dim(), b)?;
        Ok(from_dvector(&self.inner.solve(&to_dvector(b))))
    }
}

/// LU factorization with partial pivoting, `P A = L U`.
///
/// Used for the indefinite KKT systems where Cholesky does not apply.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    inner: nalgebra::LU<f64, Dyn, Dyn>,
    dim: usize,
}

impl LuDecomposition {
    /// Factor a square matrix.
    ///
    /// # Errors
    /// Returns [`MathError::Singular`] when `U` has a zero on its diagonal.
    pub fn factor(matrix: &Array2<f64>) -> Result<Self> {
        let dim = ensure_square(matrix)?;
        let inner = to_dmatrix(matrix).lu();
        if !inner.is_invertible() {
            return Err(MathError::Singular);
        }
        Ok(Self { inner, dim })
    }

    /// Dimension of the factored matrix.
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Solve `A x = b`.
    ///
    /// # Errors
    /// Returns [`MathError::DimensionMismatch`] if `b` has the wrong length.
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        ensure_len(self.dim, b)?;
        self.inner
            .solve(&to_dvector(b))
            .map(|x| from_dvector(&x))
            .ok_or(MathError::Singular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_cholesky_solve() {
        let a = array![[4.0, 2.0, 0.4], [2.0, 5.0, 1.0], [0.4, 1.0, 3.0]];
        let b = array![1.0, -2.0, 0.5];

        let chol = Cholesky::factor(&a).unwrap();
        let x = chol.solve(&b).unwrap();
        let residual = a.dot(&x) - &b;

        for r in residual.iter() {
            assert_abs_diff_eq!(*r, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cholesky_reads_lower_triangle() {
        // Garbage above the diagonal is ignored
        let a = array![[4.0, 99.0], [2.0, 5.0]];
        let chol = Cholesky::factor(&a).unwrap();
        let x = chol.solve(&array![6.0, 7.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let a = array![[1.0, 2.0], [2.0, 1.0]];
        assert_eq!(
            Cholesky::factor(&a).unwrap_err(),
            MathError::NotPositiveDefinite
        );
        assert_eq!(
            Cholesky::factor(&array![[f64::NAN]]).unwrap_err(),
            MathError::NonFinite
        );
    }

    #[test]
    fn test_lu_solves_indefinite_system() {
        // Saddle-point shape: [[P, Aᵀ], [A, 0]]
        let k = array![
            [2.0, 0.0, 1.0],
            [0.0, 2.0, 1.0],
            [1.0, 1.0, 0.0],
        ];
        let b = array![0.0, 0.0, 1.0];

        let lu = LuDecomposition::factor(&k).unwrap();
        let x = lu.solve(&b).unwrap();

        assert_eq!(lu.dim(), 3);
        assert_abs_diff_eq!(x[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(x[2], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lu_detects_singular() {
        let k = array![[1.0, 2.0], [2.0, 4.0]];
        assert_eq!(
            LuDecomposition::factor(&k).unwrap_err(),
            MathError::Singular
        );
    }

    #[test]
    fn test_solve_length_mismatch() {
        let chol = Cholesky::factor(&Array2::eye(2)).unwrap();
        assert!(chol.solve(&array![1.0, 2.0, 3.0]).is_err());
        assert!(matches!(
            Cholesky::factor(&Array2::zeros((2, 3))),
            Err(MathError::NotSquare { rows: 2, cols: 3 })
        ));
    }
}
