//! Utility functions.

mod matrix;

pub use matrix::{column_values, detect_constant_columns, matrix_from_columns, select_columns};
