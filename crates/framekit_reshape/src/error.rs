//! Error types for hierarchical reshaping.

use thiserror::Error;

/// Result alias used across `framekit_reshape`.
pub type ReshapeResult<T> = Result<T, ReshapeError>;

/// Failures raised while reshaping a flat table.
#[derive(Debug, Error)]
pub enum ReshapeError {
    /// Relation names a column absent from the source table under the
    /// fail-fast policy.
    #[error("column {name:?} (group {group:?}) not found in source table")]
    MissingColumn {
        /// Group label of the offending relation entry.
        group: String,
        /// Missing column name.
        name: String,
    },

    /// Configured index column is absent from the source table.
    #[error("index column {0:?} not found in source table")]
    IndexColumnNotFound(String),

    /// Failure assembling columns.
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
