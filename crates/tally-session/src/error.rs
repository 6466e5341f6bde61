//! Session error types.

use std::path::PathBuf;
use thiserror::Error;

/// Session operation error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// Credentials were rejected before reaching the server.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// No session is active.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The server rejected the access token (HTTP 401).
    #[error("Access token rejected")]
    Unauthorized,

    /// The refresh token could not be exchanged; the session was cleared.
    #[error("Session expired: {reason}")]
    RefreshFailed { reason: String },

    /// Transport-level failure reported by the API client.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Token file I/O error.
    #[error("Failed to {operation} token file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Token file contents are not valid.
    #[error("Failed to parse token file: {path}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SessionError {
    /// True if the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::RefreshFailed { .. } | Self::Unauthorized
        )
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
