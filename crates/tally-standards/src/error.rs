//! Error types for synonym table loading.

use std::path::PathBuf;
use thiserror::Error;

use tally_model::SystemColumnId;

/// Errors that can occur when loading a synonym table.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StandardsError {
    /// Synonym file could not be opened.
    #[error("Failed to open synonym file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read or parse CSV content.
    #[error("Failed to read CSV {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Invalid value in CSV field.
    #[error("Invalid {field} value '{value}' in {file}")]
    InvalidValue {
        field: &'static str,
        value: String,
        file: PathBuf,
    },

    /// Two headers normalize to the same key but name different columns.
    #[error("Synonym '{key}' maps to both {first} and {second} in {file}")]
    ConflictingSynonym {
        key: String,
        first: SystemColumnId,
        second: SystemColumnId,
        file: PathBuf,
    },
}

/// Result type for synonym loading operations.
pub type Result<T> = std::result::Result<T, StandardsError>;
