//! Session configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Configuration for session handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where tokens are persisted. `None` keeps them in memory only.
    pub token_path: Option<PathBuf>,

    /// Refresh proactively when the access token expires within this many
    /// seconds.
    pub refresh_leeway_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: None,
            refresh_leeway_secs: 30,
        }
    }
}

impl SessionConfig {
    /// Leeway as a chrono duration.
    pub fn refresh_leeway(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_leeway_secs.max(0))
    }

    /// Token store for [`Self::token_path`]: a file store when a path is set,
    /// otherwise an in-memory store.
    pub fn token_store(&self) -> Box<dyn TokenStore> {
        match &self.token_path {
            Some(path) => Box::new(FileTokenStore::new(path.clone())),
            None => Box::new(MemoryTokenStore::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenPair;

    #[test]
    fn token_store_follows_token_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let config = SessionConfig {
            token_path: Some(path.clone()),
            ..SessionConfig::default()
        };

        config
            .token_store()
            .save(&TokenPair::new("access", "refresh", None))
            .unwrap();
        assert!(path.exists());
        assert!(config.token_store().load().unwrap().is_some());
    }

    #[test]
    fn token_store_without_path_stays_in_memory() {
        let store = SessionConfig::default().token_store();
        store.save(&TokenPair::new("access", "refresh", None)).unwrap();
        assert!(store.load().unwrap().is_some());
        assert!(SessionConfig::default().token_store().load().unwrap().is_none());
    }

    #[test]
    fn negative_leeway_is_clamped() {
        let config = SessionConfig {
            refresh_leeway_secs: -5,
            ..SessionConfig::default()
        };
        assert_eq!(config.refresh_leeway(), chrono::Duration::zero());
    }
}
