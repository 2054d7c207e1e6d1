//! Core types for design matrix construction.

mod options;
mod result;

pub use options::{Contrast, DesignOptions, DesignOptionsBuilder, OptionsError};
pub use result::{DesignMatrix, TermColumns, TermKind};
