//! Authenticated session context.
//!
//! Session state is an explicit [`SessionContext`] value handed to whatever
//! needs it, rather than an ambient global store. The context owns:
//!
//! - the current token pair and user profile,
//! - a [`TokenStore`] that persists tokens between runs,
//! - an [`AuthApi`] implementation (the HTTP transport lives behind it).
//!
//! Authenticated calls go through [`SessionContext::authorized`], which
//! refreshes the access token once on a 401 and retries the call once.
//!
//! # Example
//!
//! ```ignore
//! use tally_session::{Credentials, FileTokenStore, SessionConfig, SessionContext};
//!
//! let store = FileTokenStore::new("~/.tally/session.json");
//! let mut session = SessionContext::new(api, store, SessionConfig::default());
//! session.restore()?;
//! if !session.is_authenticated() {
//!     session.login(&Credentials::new("ana@example.com", "secret"))?;
//! }
//! let report = session.authorized(|api, token| api.fetch_report(token))?;
//! ```

mod api;
mod config;
mod context;
mod error;
mod store;
mod types;

pub use api::AuthApi;
pub use config::SessionConfig;
pub use context::SessionContext;
pub use error::{Result, SessionError};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{AuthResponse, Credentials, Registration, TokenPair, UserProfile};
