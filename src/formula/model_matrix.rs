//! Built-in formula evaluator.

use std::collections::BTreeSet;

use super::evaluator::{
    ColumnOrigin, EvaluatedColumn, EvaluatedMatrix, EvaluatorError, FormulaEvaluator,
};
use super::term::{Coding, Formula, FormulaTerm};
use crate::data::{ColumnData, TabularData};
use crate::utils::matrix_from_columns;

/// Evaluates structured formulas into model matrices.
///
/// Labels follow the usual formula-library convention:
/// `Intercept`, `C(v, Treatment('r'))[T.level]`, `C(v, Sum)[S.level]` and
/// `a:b`. Repeated terms are evaluated once. Level order is the declared
/// order for categorical columns and sorted order for text columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelMatrixEvaluator;

struct MatrixParts {
    n_rows: usize,
    values: Vec<Vec<f64>>,
    columns: Vec<EvaluatedColumn>,
}

impl MatrixParts {
    fn push(&mut self, label: String, origin: ColumnOrigin, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.n_rows);
        self.columns.push(EvaluatedColumn { label, origin });
        self.values.push(values);
    }
}

impl FormulaEvaluator for ModelMatrixEvaluator {
    fn evaluate(
        &self,
        formula: &Formula,
        data: &dyn TabularData,
    ) -> Result<EvaluatedMatrix, EvaluatorError> {
        let n_rows = data.n_rows();
        let mut out = MatrixParts {
            n_rows,
            values: Vec::new(),
            columns: Vec::new(),
        };

        if formula.intercept() {
            out.push("Intercept".to_string(), ColumnOrigin::Intercept, vec![1.0; n_rows]);
        }

        let mut seen = BTreeSet::new();
        for term in formula.terms() {
            if !seen.insert(term.key()) {
                continue;
            }
            match term {
                FormulaTerm::Numeric(name) => {
                    let values = numeric_values(data, name)?;
                    out.push(
                        name.clone(),
                        ColumnOrigin::Numeric {
                            variable: name.clone(),
                        },
                        values,
                    );
                }
                FormulaTerm::Categorical { variable, coding } => {
                    encode_categorical(&mut out, data, term, variable, coding)?;
                }
                FormulaTerm::Interaction(left, right) => {
                    let (a, b) = match (numeric_values(data, left), numeric_values(data, right)) {
                        (Ok(a), Ok(b)) => (a, b),
                        (Err(EvaluatorError::UnknownColumn(c)), _)
                        | (_, Err(EvaluatorError::UnknownColumn(c))) => {
                            return Err(EvaluatorError::UnknownColumn(c));
                        }
                        _ => {
                            return Err(EvaluatorError::UnsupportedInteraction {
                                left: left.clone(),
                                right: right.clone(),
                            });
                        }
                    };
                    let product = a.iter().zip(&b).map(|(x, y)| x * y).collect();
                    out.push(
                        format!("{left}:{right}"),
                        ColumnOrigin::Interaction {
                            left: left.clone(),
                            right: right.clone(),
                        },
                        product,
                    );
                }
            }
        }

        Ok(EvaluatedMatrix {
            matrix: matrix_from_columns(n_rows, &out.values),
            columns: out.columns,
        })
    }
}

fn lookup<'a>(data: &'a dyn TabularData, name: &str) -> Result<&'a ColumnData, EvaluatorError> {
    data.column(name)
        .ok_or_else(|| EvaluatorError::UnknownColumn(name.to_string()))
}

fn numeric_values(data: &dyn TabularData, name: &str) -> Result<Vec<f64>, EvaluatorError> {
    let column = lookup(data, name)?;
    column.to_f64().ok_or_else(|| EvaluatorError::NonNumeric {
        variable: name.to_string(),
        dtype: column.dtype_name(),
    })
}

fn encode_categorical(
    out: &mut MatrixParts,
    data: &dyn TabularData,
    term: &FormulaTerm,
    variable: &str,
    coding: &Coding,
) -> Result<(), EvaluatorError> {
    let column = lookup(data, variable)?;
    let factor = column.factor().ok_or_else(|| EvaluatorError::NotCategorical {
        variable: variable.to_string(),
        dtype: column.dtype_name(),
    })?;

    match coding {
        Coding::Treatment { reference } => {
            let reference_idx = factor
                .levels
                .iter()
                .position(|l| l == reference)
                .ok_or_else(|| EvaluatorError::UnknownReference {
                    variable: variable.to_string(),
                    reference: reference.clone(),
                })?;

            for (k, level) in factor.levels.iter().enumerate() {
                if k == reference_idx {
                    continue;
                }
                let values = factor
                    .codes
                    .iter()
                    .map(|&c| if c == k { 1.0 } else { 0.0 })
                    .collect();
                out.push(
                    format!("{term}[T.{level}]"),
                    ColumnOrigin::Categorical {
                        variable: variable.to_string(),
                        level: level.clone(),
                    },
                    values,
                );
            }
        }
        Coding::Sum => {
            // The last level is the omitted one and scores -1 everywhere.
            let Some(base) = factor.levels.len().checked_sub(1) else {
                return Ok(());
            };
            for (k, level) in factor.levels.iter().enumerate().take(base) {
                let values = factor
                    .codes
                    .iter()
                    .map(|&c| {
                        if c == k {
                            1.0
                        } else if c == base {
                            -1.0
                        } else {
                            0.0
                        }
                    })
                    .collect();
                out.push(
                    format!("{term}[S.{level}]"),
                    ColumnOrigin::Categorical {
                        variable: variable.to_string(),
                        level: level.clone(),
                    },
                    values,
                );
            }
        }
    }
    Ok(())
}
