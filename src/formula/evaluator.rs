//! The formula evaluation seam.

use faer::Mat;
use thiserror::Error;

use super::term::Formula;
use crate::data::TabularData;

/// Errors that can occur while evaluating a formula against a dataset.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("formula references unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{variable}' has dtype {dtype} and cannot be used as a numeric term")]
    NonNumeric { variable: String, dtype: &'static str },

    #[error("column '{variable}' has dtype {dtype} and cannot be used as a categorical term")]
    NotCategorical { variable: String, dtype: &'static str },

    #[error("reference level '{reference}' is not a level of '{variable}'")]
    UnknownReference { variable: String, reference: String },

    #[error("interaction {left}:{right} requires two numeric columns")]
    UnsupportedInteraction { left: String, right: String },

    #[error("formula evaluation failed: {0}")]
    Failed(String),
}

/// Where an evaluated column came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOrigin {
    Intercept,
    Numeric { variable: String },
    /// One contrast column of a categorical term.
    Categorical { variable: String, level: String },
    /// Product of two columns in the orientation the evaluator produced.
    Interaction { left: String, right: String },
}

/// One evaluated column: the evaluator's own label and its structured origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedColumn {
    pub label: String,
    pub origin: ColumnOrigin,
}

/// Output of a formula evaluator.
///
/// `columns[j]` describes column `j` of `matrix`; rows align with the input
/// dataset.
#[derive(Debug, Clone)]
pub struct EvaluatedMatrix {
    pub matrix: Mat<f64>,
    pub columns: Vec<EvaluatedColumn>,
}

impl EvaluatedMatrix {
    /// Position of the intercept column, if any.
    pub fn intercept_index(&self) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.origin == ColumnOrigin::Intercept)
    }

    /// Evaluator labels in column order.
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Turns a formula plus a dataset into a numeric matrix.
///
/// Implementations must not reorder, drop, or add rows.
pub trait FormulaEvaluator {
    fn evaluate(
        &self,
        formula: &Formula,
        data: &dyn TabularData,
    ) -> Result<EvaluatedMatrix, EvaluatorError>;
}
