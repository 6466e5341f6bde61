//! Session data types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// Access and refresh tokens issued by the server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry, when the server reports one.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenPair {
    /// Create a token pair.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// True if the access token expires within `leeway` of `now`.
    pub fn expires_within(&self, now: DateTime<Utc>, leeway: Duration) -> bool {
        self.expires_at.is_some_and(|at| at - now <= leeway)
    }
}

// Tokens never appear in logs or debug output.
impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Server response to login and register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub tokens: TokenPair,
    pub user: UserProfile,
}

/// Email and password for login.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject blank fields before they reach the server.
    pub fn check(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(SessionError::InvalidCredentials("email is empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(SessionError::InvalidCredentials(
                "password is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// New account details.
#[derive(Clone)]
pub struct Registration {
    pub credentials: Credentials,
    pub name: Option<String>,
}
