//! Conversions between `ndarray` and `nalgebra` storage.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

pub(crate) fn to_dmatrix(matrix: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_row_iterator(matrix.nrows(), matrix.ncols(), matrix.iter().copied())
}

pub(crate) fn to_dvector(vector: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(vector.len(), vector.iter().copied())
}

pub(crate) fn from_dvector(vector: &DVector<f64>) -> Array1<f64> {
    vector.iter().copied().collect()
}

pub(crate) fn from_dmatrix(matrix: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((matrix.nrows(), matrix.ncols()), |(i, j)| matrix[(i, j)])
}
