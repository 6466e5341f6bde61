//! Session context.

use chrono::{DateTime, Utc};

use crate::api::AuthApi;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::store::TokenStore;
use crate::types::{AuthResponse, Credentials, Registration, TokenPair, UserProfile};

/// Authentication state for one user session.
///
/// Holds the tokens and profile of the signed-in user. Pass it explicitly to
/// the code that needs authenticated calls.
pub struct SessionContext<A, S> {
    api: A,
    store: S,
    config: SessionConfig,
    tokens: Option<TokenPair>,
    user: Option<UserProfile>,
    clock: fn() -> DateTime<Utc>,
}

impl<A: AuthApi, S: TokenStore> SessionContext<A, S> {
    /// Create a signed-out session.
    pub fn new(api: A, store: S, config: SessionConfig) -> Self {
        Self {
            api,
            store,
            config,
            tokens: None,
            user: None,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Resume a persisted session.
    ///
    /// Loads saved tokens and fetches the user profile with them. Returns
    /// false when nothing was saved or the saved session could not be
    /// refreshed; in the latter case the saved tokens are cleared.
    pub fn restore(&mut self) -> Result<bool> {
        let Some(tokens) = self.store.load()? else {
            return Ok(false);
        };
        self.tokens = Some(tokens);

        match self.authorized(|api, token| api.current_user(token)) {
            Ok(user) => {
                tracing::info!("Session restored");
                self.user = Some(user);
                Ok(true)
            }
            Err(err) if err.requires_login() => {
                tracing::info!(reason = %err, "Saved session is no longer valid");
                self.clear()?;
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Sign in with email and password.
    pub fn login(&mut self, credentials: &Credentials) -> Result<&UserProfile> {
        credentials.check()?;
        let response = self.api.login(credentials)?;
        self.establish(response)
    }

    /// Create an account and sign in.
    pub fn register(&mut self, registration: &Registration) -> Result<&UserProfile> {
        registration.credentials.check()?;
        let response = self.api.register(registration)?;
        self.establish(response)
    }

    /// Sign out and forget saved tokens.
    pub fn logout(&mut self) -> Result<()> {
        self.clear()?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Change the signed-in user's password.
    pub fn change_password(&mut self, current: &str, new: &str) -> Result<()> {
        if new.is_empty() {
            return Err(SessionError::InvalidCredentials(
                "new password is empty".to_string(),
            ));
        }
        if new == current {
            return Err(SessionError::InvalidCredentials(
                "new password matches the current one".to_string(),
            ));
        }
        self.authorized(|api, token| api.change_password(token, current, new))
    }

    /// True if tokens are held.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    /// Signed-in user, if known.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Current access token.
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }

    /// The API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run an authenticated call.
    ///
    /// Refreshes first if the access token is about to expire. If the call
    /// reports [`SessionError::Unauthorized`], refreshes once and retries once.
    /// A failed refresh clears the session and returns
    /// [`SessionError::RefreshFailed`].
    pub fn authorized<T, F>(&mut self, mut call: F) -> Result<T>
    where
        F: FnMut(&A, &str) -> Result<T>,
    {
        let Some(tokens) = &self.tokens else {
            return Err(SessionError::NotAuthenticated);
        };
        if tokens.expires_within((self.clock)(), self.config.refresh_leeway()) {
            tracing::debug!("Access token near expiry, refreshing");
            self.refresh()?;
        }

        let first = {
            let token = self.current_access_token()?;
            call(&self.api, token)
        };
        match first {
            Err(SessionError::Unauthorized) => {
                tracing::debug!("Access token rejected, refreshing");
                self.refresh()?;
                call(&self.api, self.current_access_token()?)
            }
            other => other,
        }
    }

    fn current_access_token(&self) -> Result<&str> {
        self.access_token().ok_or(SessionError::NotAuthenticated)
    }

    fn refresh(&mut self) -> Result<()> {
        let refresh_token = match &self.tokens {
            Some(tokens) => tokens.refresh_token.clone(),
            None => return Err(SessionError::NotAuthenticated),
        };

        match self.api.refresh(&refresh_token) {
            Ok(tokens) => {
                self.store.save(&tokens)?;
                self.tokens = Some(tokens);
                tracing::debug!("Session tokens refreshed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(reason = %err, "Token refresh failed, clearing session");
                self.clear()?;
                Err(SessionError::RefreshFailed {
                    reason: err.to_string(),
                })
            }
        }
    }

    fn establish(&mut self, response: AuthResponse) -> Result<&UserProfile> {
        self.store.save(&response.tokens)?;
        self.tokens = Some(response.tokens);
        tracing::info!("Signed in");
        Ok(self.user.insert(response.user))
    }

    fn clear(&mut self) -> Result<()> {
        self.tokens = None;
        self.user = None;
        self.store.clear()
    }
}
