//! Model design matrices from tabular data.
//!
//! Given a dataset and an ordered list of requested terms, this library
//! produces a numeric matrix ready for regression: numeric columns pass
//! through, categorical columns are expanded under treatment ("drop") or
//! sum contrast coding, and pairwise interactions are appended after the
//! main effects. Column names and order are deterministic.
//!
//! # Example
//!
//! ```rust,ignore
//! use design_matrix::prelude::*;
//!
//! let df = DataFrame::from_columns([
//!     ("age", ColumnData::Integer(vec![25, 35, 45])),
//!     ("gender", ColumnData::categorical(&["male", "female", "female"])),
//!     ("income", ColumnData::Integer(vec![50000, 60000, 70000])),
//! ])?;
//!
//! let builder = DesignMatrixBuilder::builder()
//!     .interaction("age", "income")
//!     .build()?;
//! let dm = builder.transform(&df, &["age", "income", "gender"])?;
//!
//! assert_eq!(
//!     dm.column_names,
//!     ["intercept", "age", "income", "gender[male]", "age:income"]
//! );
//! ```

pub mod core;
pub mod data;
pub mod design;
pub mod formula;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Contrast, DesignMatrix, DesignOptions, DesignOptionsBuilder, OptionsError, TermColumns,
        TermKind,
    };
    pub use crate::data::{
        read_csv, read_csv_path, ColumnData, ColumnKind, DataError, DataFrame, TabularData,
    };
    pub use crate::design::{
        design_matrix, DesignError, DesignMatrixBuilder, DesignMatrixBuilderConfig,
    };
    pub use crate::formula::{
        Coding, ColumnOrigin, EvaluatedColumn, EvaluatedMatrix, EvaluatorError, Formula,
        FormulaEvaluator, FormulaTerm, ModelMatrixEvaluator,
    };
}

pub use crate::core::{Contrast, DesignMatrix, DesignOptions, OptionsError};
pub use crate::data::{ColumnData, DataFrame, TabularData};
pub use crate::design::{design_matrix, DesignError, DesignMatrixBuilder};
