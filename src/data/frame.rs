//! Tabular data access.

use super::column::{ColumnData, ColumnKind};
use super::DataError;

/// Typed columnar access to a dataset.
///
/// Row order is insertion order. Implementations are expected to be
/// rectangular: every column has exactly `n_rows()` values.
pub trait TabularData {
    /// Column names in insertion order.
    fn column_names(&self) -> Vec<&str>;

    /// Look up a column by name.
    fn column(&self, name: &str) -> Option<&ColumnData>;

    /// Number of rows.
    fn n_rows(&self) -> usize;

    /// Whether a column exists.
    fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Classification of a column, if present.
    fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(ColumnData::kind)
    }

    /// Sorted distinct values of a column, if present.
    fn distinct_values(&self, name: &str) -> Option<Vec<String>> {
        self.column(name).map(ColumnData::distinct_values)
    }

    /// First-row value of a column, if present and non-empty.
    fn first_value(&self, name: &str) -> Option<String> {
        self.column(name).and_then(ColumnData::first_value)
    }
}

/// An in-memory dataset of named, typed columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<(String, ColumnData)>,
    n_rows: usize,
}

impl DataFrame {
    /// Create an empty data frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a data frame from `(name, column)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (S, ColumnData)>,
        S: Into<String>,
    {
        columns
            .into_iter()
            .try_fold(Self::new(), |df, (name, data)| df.with_column(name, data))
    }

    /// Append a column.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn with_column(mut self, name: impl Into<String>, data: ColumnData) -> Result<Self, DataError> {
        self.push_column(name, data)?;
        Ok(self)
    }

    /// Append a column in place.
    pub fn push_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<(), DataError> {
        let name = name.into();
        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(DataError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.n_rows = data.len();
        } else if data.len() != self.n_rows {
            return Err(DataError::LengthMismatch {
                column: name,
                len: data.len(),
                expected: self.n_rows,
            });
        }
        self.columns.push((name, data));
        Ok(())
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Iterate over `(name, column)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnData)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }
}

impl TabularData for DataFrame {
    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    fn n_rows(&self) -> usize {
        self.n_rows
    }
}
