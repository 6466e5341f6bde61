//! Authentication API seam.

use crate::error::Result;
use crate::types::{AuthResponse, Credentials, Registration, TokenPair, UserProfile};

/// Server-side authentication endpoints.
///
/// Implementations wrap the HTTP transport. A rejected access token must be
/// reported as [`crate::SessionError::Unauthorized`] so the session can
/// refresh and retry.
pub trait AuthApi {
    /// Exchange credentials for tokens.
    fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    /// Create an account and sign in.
    fn register(&self, registration: &Registration) -> Result<AuthResponse>;

    /// Exchange a refresh token for a new pair.
    fn refresh(&self, refresh_token: &str) -> Result<TokenPair>;

    /// Profile of the token's owner.
    fn current_user(&self, access_token: &str) -> Result<UserProfile>;

    /// Change the signed-in user's password.
    fn change_password(&self, access_token: &str, current: &str, new: &str) -> Result<()>;
}
