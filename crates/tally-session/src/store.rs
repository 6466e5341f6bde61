//! Token persistence.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SessionError};
use crate::types::TokenPair;

/// Persists the token pair between runs.
pub trait TokenStore {
    /// Load saved tokens, if any.
    fn load(&self) -> Result<Option<TokenPair>>;

    /// Replace saved tokens.
    fn save(&self, tokens: &TokenPair) -> Result<()>;

    /// Forget saved tokens.
    fn clear(&self) -> Result<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for Box<T> {
    fn load(&self) -> Result<Option<TokenPair>> {
        (**self).load()
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        (**self).save(tokens)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// In-memory store, for tests and sessions that should not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RefCell<Option<TokenPair>>,
}

impl MemoryTokenStore {
    /// Create a store holding `tokens`.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RefCell::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<TokenPair>> {
        Ok(self.tokens.borrow().clone())
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        *self.tokens.borrow_mut() = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.tokens.borrow_mut().take();
        Ok(())
    }
}

/// JSON file store.
///
/// Writes go to a temp file that is then renamed over the target, so a crash
/// never leaves a truncated token file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store tokens at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Token file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(operation: &'static str, path: &Path, source: std::io::Error) -> SessionError {
    SessionError::Io {
        operation,
        path: path.to_path_buf(),
        source,
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<TokenPair>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error("read", &self.path, err)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| SessionError::Serialization {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, tokens: &TokenPair) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(tokens).map_err(|source| {
            SessionError::Serialization {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| io_error("create directory", parent, e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file =
            File::create(&temp_path).map_err(|e| io_error("create", &temp_path, e))?;
        file.write_all(&bytes)
            .map_err(|e| io_error("write", &temp_path, e))?;
        file.sync_all()
            .map_err(|e| io_error("sync", &temp_path, e))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| io_error("rename", &self.path, e))?;

        tracing::debug!(path = %self.path.display(), "Saved session tokens");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error("remove", &self.path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));
        assert!(store.load().unwrap().is_none());

        let tokens = TokenPair::new("access", "refresh", None);
        store.save(&tokens).unwrap();
        assert_eq!(store.load().unwrap(), Some(tokens));
        assert!(!store.path().with_extension("json.tmp").exists());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileTokenStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionError::Serialization { .. }));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::default();
        assert!(store.load().unwrap().is_none());
        store.save(&TokenPair::new("a", "r", None)).unwrap();
        assert!(store.load().unwrap().is_some());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
