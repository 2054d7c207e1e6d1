//! Design matrix construction.

mod builder;
mod error;

pub use builder::{design_matrix, DesignMatrixBuilder, DesignMatrixBuilderConfig};
pub use error::DesignError;
