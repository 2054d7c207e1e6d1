//! Design matrix result structures.

use std::collections::BTreeMap;
use std::ops::Range;

use faer::{Col, Mat};

use super::options::Contrast;
use crate::utils::{column_values, detect_constant_columns};

/// What produced a block of design matrix columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Intercept,
    Numeric,
    Categorical,
    Interaction,
}

/// A contiguous block of columns belonging to one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermColumns {
    /// Term name: the column name for main effects, `a:b` for interactions,
    /// `intercept` for the intercept.
    pub term: String,
    pub kind: TermKind,
    /// Column positions in the design matrix.
    pub columns: Range<usize>,
}

/// A model-ready numeric matrix with named, ordered columns.
///
/// Column order: intercept (if kept), then main effects in request order
/// (categorical terms as a contiguous block of contrast columns), then
/// interactions in request order. Rows align one-to-one with the input.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    // ========== Data ==========
    /// The numeric matrix (n_rows x n_columns).
    pub matrix: Mat<f64>,

    /// Column names, one per matrix column.
    ///
    /// Categorical columns are named `variable[level]`.
    pub column_names: Vec<String>,

    // ========== Structure ==========
    /// Column blocks per term, in column order.
    pub terms: Vec<TermColumns>,

    /// Omitted reference level per categorical term (treatment coding only).
    pub reference_levels: BTreeMap<String, String>,

    /// Requested terms left out because their dtype is neither numeric nor
    /// categorical.
    pub skipped: Vec<String>,

    // ========== Provenance ==========
    /// The formula handed to the evaluator.
    pub formula: String,

    /// Contrast coding used for categorical terms.
    pub contrast: Contrast,
}

impl DesignMatrix {
    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Whether the first column is the intercept.
    pub fn has_intercept(&self) -> bool {
        self.terms
            .first()
            .is_some_and(|t| t.kind == TermKind::Intercept)
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|n| n == name)
    }

    /// A column as a faer vector.
    pub fn column(&self, name: &str) -> Option<Col<f64>> {
        let j = self.column_index(name)?;
        Some(Col::from_fn(self.nrows(), |i| self.matrix[(i, j)]))
    }

    /// A column as a plain vector.
    pub fn column_values(&self, name: &str) -> Option<Vec<f64>> {
        self.column_index(name).map(|j| column_values(&self.matrix, j))
    }

    /// Column names belonging to a term.
    pub fn term_columns(&self, term: &str) -> Option<&[String]> {
        self.terms
            .iter()
            .find(|t| t.term == term)
            .map(|t| &self.column_names[t.columns.clone()])
    }

    /// Generated column names of a categorical term.
    pub fn category_columns(&self, variable: &str) -> Option<&[String]> {
        self.terms
            .iter()
            .find(|t| t.kind == TermKind::Categorical && t.term == variable)
            .map(|t| &self.column_names[t.columns.clone()])
    }

    /// Number of columns per non-intercept term, in column order.
    ///
    /// Suitable as the grouping for generalized VIF or grouped tests.
    pub fn group_sizes(&self) -> Vec<usize> {
        self.terms
            .iter()
            .filter(|t| t.kind != TermKind::Intercept)
            .map(|t| t.columns.len())
            .collect()
    }

    /// Names of columns that are constant to within `tolerance`.
    pub fn constant_columns(&self, tolerance: f64) -> Vec<&str> {
        detect_constant_columns(&self.matrix, tolerance)
            .into_iter()
            .zip(&self.column_names)
            .filter(|(constant, _)| *constant)
            .map(|(_, name)| name.as_str())
            .collect()
    }
}
