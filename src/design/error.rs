use thiserror::Error;

use crate::core::OptionsError;
use crate::formula::EvaluatorError;

/// Errors that can occur while building a design matrix.
///
/// Every variant except `Evaluator` is raised before the formula evaluator
/// runs.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("dataset is not rectangular: column '{column}' has {len} rows, expected {expected}")]
    InvalidInput {
        column: String,
        len: usize,
        expected: usize,
    },

    #[error("no terms requested")]
    EmptyTerms,

    #[error("the following columns are missing from the dataset: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("a data column named 'intercept' clashes with the intercept column")]
    InterceptNameClash,

    #[error("categorical column '{variable}' has no observed values to choose a reference from")]
    NoObservedLevels { variable: String },

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
}
