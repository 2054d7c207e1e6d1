//! Tabular input: typed columns, the `TabularData` access trait, and CSV loading.

mod column;
mod frame;
mod loader;

pub use column::{ColumnData, ColumnKind, Factor};
pub use frame::{DataFrame, TabularData};
pub use loader::{read_csv, read_csv_path};

use thiserror::Error;

/// Errors raised while constructing or loading a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has {len} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },

    #[error("value '{0}' is not a declared level")]
    UnknownLevel(String),

    #[error("column '{column}' has an empty cell at row {row}; text columns cannot hold missing values")]
    MissingValue { column: String, row: usize },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
