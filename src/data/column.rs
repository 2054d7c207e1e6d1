//! Typed column storage and dtype classification.

use std::collections::BTreeSet;
use std::fmt;

use super::DataError;

/// How a column participates in a design matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer or floating point values, used as a single column.
    Numeric,
    /// Text or declared categories, expanded into contrast columns.
    Categorical,
    /// Anything else (boolean, datetime). Skipped by the builder.
    Unsupported,
}

/// A single column of a tabular dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Vec<f64>),
    Integer(Vec<i64>),
    /// Object-like string values. Levels are the sorted distinct values.
    Text(Vec<String>),
    /// Categorical values with an explicit level order.
    ///
    /// `codes[i]` indexes into `levels`.
    Categorical { levels: Vec<String>, codes: Vec<usize> },
    Boolean(Vec<bool>),
    /// Seconds since the Unix epoch.
    Datetime(Vec<i64>),
}

/// Levels of a categorical column plus the level index of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    pub levels: Vec<String>,
    pub codes: Vec<usize>,
}

impl ColumnData {
    /// Build a categorical column whose levels are the sorted distinct values.
    pub fn categorical<S: AsRef<str>>(values: &[S]) -> Self {
        let levels: Vec<String> = values
            .iter()
            .map(|v| v.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let codes = values
            .iter()
            .map(|v| {
                levels
                    .binary_search_by(|l| l.as_str().cmp(v.as_ref()))
                    .unwrap_or_default()
            })
            .collect();
        ColumnData::Categorical { levels, codes }
    }

    /// Build a categorical column with an explicit level order.
    ///
    /// Levels may be declared without being observed. Every value must be a
    /// declared level.
    pub fn categorical_with_levels<S: AsRef<str>, L: AsRef<str>>(
        values: &[S],
        levels: &[L],
    ) -> Result<Self, DataError> {
        let levels: Vec<String> = levels.iter().map(|l| l.as_ref().to_string()).collect();
        let codes = values
            .iter()
            .map(|v| {
                levels
                    .iter()
                    .position(|l| l == v.as_ref())
                    .ok_or_else(|| DataError::UnknownLevel(v.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ColumnData::Categorical { levels, codes })
    }

    /// Build a text column.
    pub fn text<S: AsRef<str>>(values: &[S]) -> Self {
        ColumnData::Text(values.iter().map(|v| v.as_ref().to_string()).collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Integer(v) | ColumnData::Datetime(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Categorical { codes, .. } => codes.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the storage type, in the vocabulary of dataframe dtypes.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            ColumnData::Float(_) => "float64",
            ColumnData::Integer(_) => "int64",
            ColumnData::Text(_) => "object",
            ColumnData::Categorical { .. } => "category",
            ColumnData::Boolean(_) => "bool",
            ColumnData::Datetime(_) => "datetime64",
        }
    }

    /// Classify the column for design matrix construction.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Float(_) | ColumnData::Integer(_) => ColumnKind::Numeric,
            ColumnData::Text(_) | ColumnData::Categorical { .. } => ColumnKind::Categorical,
            ColumnData::Boolean(_) | ColumnData::Datetime(_) => ColumnKind::Unsupported,
        }
    }

    /// Values as `f64` for numeric columns.
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Float(v) => Some(v.clone()),
            ColumnData::Integer(v) => Some(v.iter().map(|&i| i as f64).collect()),
            _ => None,
        }
    }

    /// Level order and per-row codes for categorical columns.
    pub fn factor(&self) -> Option<Factor> {
        match self {
            ColumnData::Categorical { levels, codes } => Some(Factor {
                levels: levels.clone(),
                codes: codes.clone(),
            }),
            ColumnData::Text(values) => {
                let levels: Vec<String> = values
                    .iter()
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                let codes = values
                    .iter()
                    .map(|v| levels.binary_search(v).unwrap_or_default())
                    .collect();
                Some(Factor { levels, codes })
            }
            _ => None,
        }
    }

    /// Distinct values actually present, sorted.
    ///
    /// Declared but unobserved levels are not included.
    pub fn distinct_values(&self) -> Vec<String> {
        let set: BTreeSet<String> = (0..self.len()).filter_map(|i| self.value_label(i)).collect();
        set.into_iter().collect()
    }

    /// Value of the first row rendered as text.
    pub fn first_value(&self) -> Option<String> {
        self.value_label(0)
    }

    /// Render the value at `row` as text.
    pub fn value_label(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Float(v) => v.get(row).map(|x| x.to_string()),
            ColumnData::Integer(v) | ColumnData::Datetime(v) => v.get(row).map(|x| x.to_string()),
            ColumnData::Text(v) => v.get(row).cloned(),
            ColumnData::Categorical { levels, codes } => {
                codes.get(row).and_then(|&c| levels.get(c)).cloned()
            }
            ColumnData::Boolean(v) => v.get(row).map(|x| x.to_string()),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

impl From<Vec<f64>> for ColumnData {
    fn from(v: Vec<f64>) -> Self {
        ColumnData::Float(v)
    }
}

impl From<Vec<i64>> for ColumnData {
    fn from(v: Vec<i64>) -> Self {
        ColumnData::Integer(v)
    }
}

impl From<Vec<bool>> for ColumnData {
    fn from(v: Vec<bool>) -> Self {
        ColumnData::Boolean(v)
    }
}

impl From<Vec<String>> for ColumnData {
    fn from(v: Vec<String>) -> Self {
        ColumnData::Text(v)
    }
}

impl From<Vec<&str>> for ColumnData {
    fn from(v: Vec<&str>) -> Self {
        ColumnData::text(v.as_slice())
    }
}
