//! Design matrix options and configuration.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Encoding scheme applied to every categorical term of one design matrix.
///
/// Both schemes spend one degree of freedom per categorical term, so a term
/// with `k` levels always contributes `k - 1` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contrast {
    /// Treatment (dummy) coding against a reference level (default).
    ///
    /// The reference is the lexicographically smallest observed value; every
    /// other level gets a 0/1 indicator column.
    #[default]
    Drop,
    /// Sum (deviation) coding.
    ///
    /// The last level is omitted and encoded as -1 in every remaining column.
    Sum,
}

impl Contrast {
    /// The canonical name accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Contrast::Drop => "drop",
            Contrast::Sum => "sum",
        }
    }
}

impl fmt::Display for Contrast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Contrast {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Contrast::Drop),
            "sum" => Ok(Contrast::Sum),
            other => Err(OptionsError::InvalidContrast(other.to_string())),
        }
    }
}

/// Configuration options for building a design matrix.
#[derive(Debug, Clone)]
pub struct DesignOptions {
    /// Whether to keep the intercept column (default: true).
    pub with_intercept: bool,
    /// Categorical encoding scheme (default: `Contrast::Drop`).
    pub contrast: Contrast,
    /// Pairwise interactions, appended after all main effects in this order.
    pub interactions: Vec<(String, String)>,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            contrast: Contrast::Drop,
            interactions: Vec::new(),
        }
    }
}

/// Errors that can occur when validating design options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("contrast must be 'drop' or 'sum', got '{0}'")]
    InvalidContrast(String),
    #[error("interaction of '{0}' with itself is not a valid term")]
    SelfInteraction(String),
}

impl DesignOptions {
    /// Create a new builder for design options.
    pub fn builder() -> DesignOptionsBuilder {
        DesignOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if let Some((a, _)) = self.interactions.iter().find(|(a, b)| a == b) {
            return Err(OptionsError::SelfInteraction(a.clone()));
        }
        Ok(())
    }
}

/// Builder for `DesignOptions`.
#[derive(Debug, Clone, Default)]
pub struct DesignOptionsBuilder {
    options: DesignOptions,
}

impl DesignOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to keep the intercept column.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set the categorical encoding scheme.
    pub fn contrast(mut self, contrast: Contrast) -> Self {
        self.options.contrast = contrast;
        self
    }

    /// Append one pairwise interaction.
    pub fn interaction(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.options.interactions.push((left.into(), right.into()));
        self
    }

    /// Replace the interaction list.
    pub fn interactions<I, A, B>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        self.options.interactions = pairs
            .into_iter()
            .map(|(a, b)| (a.into(), b.into()))
            .collect();
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<DesignOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> DesignOptions {
        self.options
    }
}
