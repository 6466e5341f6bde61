//! Error types for mapping operations.

use std::path::PathBuf;

use tally_model::ModelError;
use tally_standards::StandardsError;
use thiserror::Error;

/// Errors from mapping operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MappingError {
    /// Name does not identify a system column.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Assignment text is not of the form `source=target`.
    #[error("Invalid assignment '{0}': expected SOURCE=TARGET")]
    InvalidAssignment(String),

    /// Synonym table could not be loaded.
    #[error(transparent)]
    Standards(#[from] StandardsError),

    /// Configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for the expected shape.
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by a mapping observer.
///
/// The engine logs and counts these; they never reach the caller that
/// triggered the notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ObserverError(pub String);

impl ObserverError {
    /// Create an observer error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;
