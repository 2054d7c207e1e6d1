//! Matrix utility functions.

use faer::Mat;

/// Assemble a matrix from column vectors of equal length `n_rows`.
pub fn matrix_from_columns(n_rows: usize, columns: &[Vec<f64>]) -> Mat<f64> {
    Mat::from_fn(n_rows, columns.len(), |i, j| columns[j][i])
}

/// Copy the listed columns, in the listed order, into a new matrix.
pub fn select_columns(x: &Mat<f64>, indices: &[usize]) -> Mat<f64> {
    Mat::from_fn(x.nrows(), indices.len(), |i, j| x[(i, indices[j])])
}

/// Copy one column out as a vector.
pub fn column_values(x: &Mat<f64>, j: usize) -> Vec<f64> {
    (0..x.nrows()).map(|i| x[(i, j)]).collect()
}

/// Detect columns that are constant (zero variance).
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_rows = x.nrows();
    if n_rows == 0 {
        return vec![true; x.ncols()];
    }

    (0..x.ncols())
        .map(|j| {
            let first = x[(0, j)];
            (1..n_rows).all(|i| (x[(i, j)] - first).abs() < tolerance)
        })
        .collect()
}
