//! Model formulas and their evaluation into numeric matrices.

mod evaluator;
mod model_matrix;
mod term;

pub use evaluator::{
    ColumnOrigin, EvaluatedColumn, EvaluatedMatrix, EvaluatorError, FormulaEvaluator,
};
pub use model_matrix::ModelMatrixEvaluator;
pub use term::{Coding, Formula, FormulaTerm};
