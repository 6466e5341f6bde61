//! Engine configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};

/// How the "one source column per system column" rule is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquenessPolicy {
    /// Raw state tolerates duplicate targets; only the selectable targets
    /// offered for each column exclude targets claimed elsewhere.
    #[default]
    SelectionSurface,
    /// Assigning a claimed target releases it from its previous holder, so
    /// the state never holds duplicates.
    Exclusive,
}

impl UniquenessPolicy {
    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SelectionSurface => "selection surface",
            Self::Exclusive => "exclusive",
        }
    }
}

/// Settings for [`crate::ReconciliationEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Uniqueness enforcement for `set_mapping`.
    pub uniqueness: UniquenessPolicy,

    /// Maximum number of observer-queued commands applied after one
    /// caller-initiated transition. Further commands are dropped.
    pub max_cascade: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            uniqueness: UniquenessPolicy::default(),
            max_cascade: 16,
        }
    }
}

impl EngineConfig {
    /// Config with the exclusive uniqueness policy.
    pub fn exclusive() -> Self {
        Self {
            uniqueness: UniquenessPolicy::Exclusive,
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| MappingError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| MappingError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.uniqueness, UniquenessPolicy::SelectionSurface);
        assert_eq!(config.max_cascade, 16);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"uniqueness":"exclusive"}"#).unwrap();
        assert_eq!(config, EngineConfig::exclusive());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"max_cascade": 2}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.max_cascade, 2);
        assert_eq!(config.uniqueness, UniquenessPolicy::SelectionSurface);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"uniqueness":"sometimes"}"#).unwrap();

        let err = EngineConfig::load(&path).unwrap_err();
        assert!(matches!(err, MappingError::ConfigParse { .. }));
    }
}
