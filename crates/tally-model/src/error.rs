//! Error types for model lookups.

use thiserror::Error;

/// Errors raised when a caller names something outside the closed schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The name does not identify any system column.
    #[error("Unknown system column: {0}")]
    UnknownSystemColumn(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
