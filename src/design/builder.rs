//! Design matrix construction from requested terms.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::{
    Contrast, DesignMatrix, DesignOptions, DesignOptionsBuilder, OptionsError, TermColumns,
    TermKind,
};
use crate::data::{ColumnKind, TabularData};
use crate::design::DesignError;
use crate::formula::{
    Coding, ColumnOrigin, EvaluatedMatrix, Formula, FormulaEvaluator, FormulaTerm,
    ModelMatrixEvaluator,
};
use crate::utils::select_columns;

/// Name given to the intercept column.
const INTERCEPT: &str = "intercept";

/// Builds design matrices from tabular data.
///
/// Configure once through [`DesignMatrixBuilder::builder`], then call
/// [`transform`](Self::transform) on any number of datasets.
///
/// # Example
///
/// ```rust,ignore
/// use design_matrix::prelude::*;
///
/// let builder = DesignMatrixBuilder::builder()
///     .contrast(Contrast::Sum)
///     .interaction("age", "income")
///     .build()?;
/// let dm = builder.transform(&df, &["age", "income", "gender"])?;
///
/// assert_eq!(dm.column_names[0], "intercept");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DesignMatrixBuilder {
    options: DesignOptions,
}
/// A term that survived classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainEffect<'a> {
    Numeric(&'a str),
    Categorical(&'a str),
}

/// Evaluated columns indexed by their structured origin.
struct ColumnIndex {
    names: Vec<String>,
    intercept: Option<usize>,
    numeric: HashMap<String, usize>,
    categories: HashMap<String, Vec<usize>>,
    interactions: HashMap<(String, String), usize>,
}

impl DesignMatrixBuilder {
    /// Create a design matrix builder with the given options.
    pub fn new(options: DesignOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the design matrix builder.
    pub fn builder() -> DesignMatrixBuilderConfig {
        DesignMatrixBuilderConfig::default()
    }

    /// The options applied by [`transform`](Self::transform).
    pub fn options(&self) -> &DesignOptions {
        &self.options
    }

    /// Build a design matrix with the built-in evaluator.
    pub fn transform<S: AsRef<str>>(
        &self,
        data: &dyn TabularData,
        terms: &[S],
    ) -> Result<DesignMatrix, DesignError> {
        self.transform_with(&ModelMatrixEvaluator, data, terms)
    }

    /// Build a design matrix with a caller-supplied evaluator.
    pub fn transform_with<S: AsRef<str>>(
        &self,
        evaluator: &dyn FormulaEvaluator,
        data: &dyn TabularData,
        terms: &[S],
    ) -> Result<DesignMatrix, DesignError> {
        let terms: Vec<&str> = terms.iter().map(AsRef::as_ref).collect();

        self.options.validate()?;
        validate_rectangular(data)?;
        validate_terms(data, &terms)?;
        if self.options.with_intercept {
            validate_intercept_name(&terms)?;
        }

        let (effects, skipped) = classify(data, &terms);
        let references = match self.options.contrast {
            Contrast::Drop => reference_levels(data, &effects)?,
            Contrast::Sum => BTreeMap::new(),
        };
        let interactions = unique_interactions(&self.options.interactions);

        let formula = assemble_formula(&effects, &references, &interactions, self.options.contrast);
        log::debug!("evaluating formula: {formula}");

        let evaluated = evaluator.evaluate(&formula, data)?;
        let index = index_columns(&evaluated);

        let mut order: Vec<usize> = Vec::with_capacity(evaluated.columns.len());
        let mut spans: Vec<TermColumns> = Vec::new();
        let mut push_block = |term: String, kind: TermKind, columns: &[usize]| {
            if columns.is_empty() {
                return;
            }
            let start = order.len();
            order.extend_from_slice(columns);
            spans.push(TermColumns {
                term,
                kind,
                columns: start..order.len(),
            });
        };

        if self.options.with_intercept {
            if let Some(j) = index.intercept {
                push_block(index.names[j].clone(), TermKind::Intercept, &[j]);
            }
        }

        for effect in &effects {
            match *effect {
                MainEffect::Numeric(name) => match index.numeric.get(name) {
                    Some(&j) => push_block(name.to_string(), TermKind::Numeric, &[j]),
                    None => log::warn!("evaluator produced no column for numeric term '{name}'"),
                },
                MainEffect::Categorical(name) => {
                    let columns = index.categories.get(name).map(Vec::as_slice).unwrap_or(&[]);
                    if columns.is_empty() {
                        log::debug!("categorical term '{name}' contributes no columns");
                    }
                    push_block(name.to_string(), TermKind::Categorical, columns);
                }
            }
        }

        for (left, right) in &interactions {
            let produced = index
                .interactions
                .get(&(left.to_string(), right.to_string()))
                .or_else(|| index.interactions.get(&(right.to_string(), left.to_string())));
            match produced {
                Some(&j) => push_block(index.names[j].clone(), TermKind::Interaction, &[j]),
                None => log::warn!("evaluator produced no column for interaction {left}:{right}"),
            }
        }

        let kept = order.len() + usize::from(!self.options.with_intercept && index.intercept.is_some());
        if kept < evaluated.columns.len() {
            log::debug!(
                "dropping {} evaluated columns not claimed by any term",
                evaluated.columns.len() - kept
            );
        }

        Ok(DesignMatrix {
            matrix: select_columns(&evaluated.matrix, &order),
            column_names: order.iter().map(|&j| index.names[j].clone()).collect(),
            terms: spans,
            reference_levels: references
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            skipped,
            formula: formula.to_string(),
            contrast: self.options.contrast,
        })
    }
}

/// Builder for `DesignMatrixBuilder`.
#[derive(Debug, Clone, Default)]
pub struct DesignMatrixBuilderConfig {
    builder: DesignOptionsBuilder,
}

impl DesignMatrixBuilderConfig {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to keep the intercept column.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set the categorical encoding scheme.
    pub fn contrast(mut self, contrast: Contrast) -> Self {
        self.builder = self.builder.contrast(contrast);
        self
    }

    /// Append one pairwise interaction.
    pub fn interaction(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.builder = self.builder.interaction(left, right);
        self
    }

    /// Replace the interaction list.
    pub fn interactions<I, A, B>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        self.builder = self.builder.interactions(pairs);
        self
    }

    /// Build the design matrix builder, validating its options.
    pub fn build(self) -> Result<DesignMatrixBuilder, OptionsError> {
        Ok(DesignMatrixBuilder::new(self.builder.build()?))
    }
}

/// Build a design matrix in one call.
///
/// `contrast` must be exactly `"drop"` or `"sum"`. `None` requests no
/// interactions.
pub fn design_matrix<S: AsRef<str>>(
    data: &dyn TabularData,
    terms: &[S],
    add_intercept: bool,
    interactions: Option<&[(&str, &str)]>,
    contrast: &str,
) -> Result<DesignMatrix, DesignError> {
    let contrast: Contrast = contrast.parse()?;
    DesignMatrixBuilder::builder()
        .with_intercept(add_intercept)
        .contrast(contrast)
        .interactions(interactions.unwrap_or_default().iter().copied())
        .build()?
        .transform(data, terms)
}

fn validate_rectangular(data: &dyn TabularData) -> Result<(), DesignError> {
    let expected = data.n_rows();
    for name in data.column_names() {
        let len = data.column(name).map_or(0, |c| c.len());
        if len != expected {
            return Err(DesignError::InvalidInput {
                column: name.to_string(),
                len,
                expected,
            });
        }
    }
    Ok(())
}

fn validate_terms(data: &dyn TabularData, terms: &[&str]) -> Result<(), DesignError> {
    if terms.is_empty() {
        return Err(DesignError::EmptyTerms);
    }
    let mut seen = BTreeSet::new();
    let missing: Vec<String> = terms
        .iter()
        .filter(|t| !data.has_column(t) && seen.insert(**t))
        .map(|t| t.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DesignError::MissingColumns(missing))
    }
}

/// A data column named like the intercept would make both columns share
/// one name.
fn validate_intercept_name(terms: &[&str]) -> Result<(), DesignError> {
    if terms.contains(&INTERCEPT) {
        return Err(DesignError::InterceptNameClash);
    }
    Ok(())
}

/// Split terms into main effects, skipping unsupported dtypes.
///
/// Repeated terms keep their first position.
fn classify<'a>(data: &dyn TabularData, terms: &[&'a str]) -> (Vec<MainEffect<'a>>, Vec<String>) {
    let mut seen = BTreeSet::new();
    let mut effects = Vec::with_capacity(terms.len());
    let mut skipped = Vec::new();

    for &term in terms {
        if !seen.insert(term) {
            log::debug!("term '{term}' requested more than once, keeping first occurrence");
            continue;
        }
        match data.kind(term) {
            Some(ColumnKind::Numeric) => effects.push(MainEffect::Numeric(term)),
            Some(ColumnKind::Categorical) => effects.push(MainEffect::Categorical(term)),
            _ => {
                let dtype = data.column(term).map_or("unknown", |c| c.dtype_name());
                log::warn!("skipping term '{term}': dtype {dtype} is neither numeric nor categorical");
                skipped.push(term.to_string());
            }
        }
    }

    (effects, skipped)
}

/// Reference level per categorical term: the smallest observed value.
fn reference_levels<'a>(
    data: &dyn TabularData,
    effects: &[MainEffect<'a>],
) -> Result<BTreeMap<&'a str, String>, DesignError> {
    let mut references = BTreeMap::new();
    for effect in effects {
        if let MainEffect::Categorical(name) = *effect {
            let reference = data
                .distinct_values(name)
                .and_then(|values| values.into_iter().min())
                .ok_or_else(|| DesignError::NoObservedLevels {
                    variable: name.to_string(),
                })?;
            log::debug!("reference level for '{name}' is '{reference}'");
            references.insert(name, reference);
        }
    }
    Ok(references)
}

/// Interactions with repeated unordered pairs removed.
fn unique_interactions(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    let mut seen = BTreeSet::new();
    pairs
        .iter()
        .filter_map(|(a, b)| {
            let key = if a <= b { (a, b) } else { (b, a) };
            if seen.insert(key) {
                Some((a.as_str(), b.as_str()))
            } else {
                log::debug!("interaction {a}:{b} requested more than once");
                None
            }
        })
        .collect()
}

fn assemble_formula(
    effects: &[MainEffect<'_>],
    references: &BTreeMap<&str, String>,
    interactions: &[(&str, &str)],
    contrast: Contrast,
) -> Formula {
    let mut formula = Formula::new();

    for effect in effects {
        match *effect {
            MainEffect::Numeric(name) => formula.push(FormulaTerm::Numeric(name.to_string())),
            MainEffect::Categorical(name) => {
                let coding = match contrast {
                    Contrast::Drop => Coding::Treatment {
                        reference: references.get(name).cloned().unwrap_or_default(),
                    },
                    Contrast::Sum => Coding::Sum,
                };
                formula.push(FormulaTerm::Categorical {
                    variable: name.to_string(),
                    coding,
                });
            }
        }
    }

    for (a, b) in interactions {
        formula.push(FormulaTerm::Interaction(a.to_string(), b.to_string()));
    }

    formula
}

/// Canonical names and lookup tables for evaluated columns.
///
/// The intercept becomes `intercept`, contrast columns `variable[level]`,
/// interactions `left:right` in the orientation the evaluator produced.
fn index_columns(evaluated: &EvaluatedMatrix) -> ColumnIndex {
    let mut index = ColumnIndex {
        names: Vec::with_capacity(evaluated.columns.len()),
        intercept: None,
        numeric: HashMap::new(),
        categories: HashMap::new(),
        interactions: HashMap::new(),
    };

    for (j, column) in evaluated.columns.iter().enumerate() {
        let name = match &column.origin {
            ColumnOrigin::Intercept => {
                index.intercept.get_or_insert(j);
                INTERCEPT.to_string()
            }
            ColumnOrigin::Numeric { variable } => {
                index.numeric.entry(variable.clone()).or_insert(j);
                variable.clone()
            }
            ColumnOrigin::Categorical { variable, level } => {
                index.categories.entry(variable.clone()).or_default().push(j);
                format!("{variable}[{level}]")
            }
            ColumnOrigin::Interaction { left, right } => {
                index
                    .interactions
                    .entry((left.clone(), right.clone()))
                    .or_insert(j);
                format!("{left}:{right}")
            }
        };
        index.names.push(name);
    }

    index
}
