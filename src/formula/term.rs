//! Structured model formulas.

use std::fmt;

/// Contrast coding requested for a categorical term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coding {
    /// Indicator columns for every level except `reference`.
    Treatment { reference: String },
    /// Deviation coding, omitting the last level.
    Sum,
}

/// One right-hand-side term of a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaTerm {
    /// A numeric column used as-is.
    Numeric(String),
    /// A categorical column expanded under `coding`.
    Categorical { variable: String, coding: Coding },
    /// Elementwise product of two numeric columns.
    Interaction(String, String),
}

impl FormulaTerm {
    /// Identity used to collapse repeated terms.
    ///
    /// `a:b` and `b:a` share a key.
    pub fn key(&self) -> String {
        match self {
            FormulaTerm::Numeric(name) => name.clone(),
            FormulaTerm::Categorical { variable, .. } => variable.clone(),
            FormulaTerm::Interaction(a, b) => {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                format!("{lo}:{hi}")
            }
        }
    }
}

impl fmt::Display for Coding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coding::Treatment { reference } => {
                write!(f, "Treatment('{}')", reference.replace('\'', "\\'"))
            }
            Coding::Sum => write!(f, "Sum"),
        }
    }
}

impl fmt::Display for FormulaTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaTerm::Numeric(name) => write!(f, "{name}"),
            FormulaTerm::Categorical { variable, coding } => write!(f, "C({variable}, {coding})"),
            FormulaTerm::Interaction(a, b) => write!(f, "{a}:{b}"),
        }
    }
}

/// An additive model formula: optional intercept followed by terms in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    intercept: bool,
    terms: Vec<FormulaTerm>,
}

impl Formula {
    /// A formula with an intercept and no terms.
    pub fn new() -> Self {
        Self {
            intercept: true,
            terms: Vec::new(),
        }
    }

    /// A formula without an intercept.
    pub fn without_intercept() -> Self {
        Self {
            intercept: false,
            terms: Vec::new(),
        }
    }

    /// Append a term.
    pub fn push(&mut self, term: FormulaTerm) {
        self.terms.push(term);
    }

    /// Append a term, builder style.
    pub fn with_term(mut self, term: FormulaTerm) -> Self {
        self.push(term);
        self
    }

    pub fn intercept(&self) -> bool {
        self.intercept
    }

    pub fn terms(&self) -> &[FormulaTerm] {
        &self.terms
    }
}

impl Default for Formula {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.terms.len() + 1);
        parts.push(if self.intercept { "1" } else { "0" }.to_string());
        parts.extend(self.terms.iter().map(|t| t.to_string()));
        write!(f, "{}", parts.join(" + "))
    }
}
