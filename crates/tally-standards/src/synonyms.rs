//! Synonym table loading and lookup.
//!
//! Keys are normalized with [`normalize_header`] when the table is built, so
//! a lookup only has to normalize the incoming header once.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tally_model::SystemColumnId;

use crate::embedded;
use crate::error::{Result, StandardsError};

/// Normalize a header for synonym lookup.
///
/// Lower-cases the input and removes whitespace, underscores and hyphens.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// One synonym row after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymEntry {
    /// Header as written in the source file.
    pub header: String,
    /// Target system column.
    pub target: SystemColumnId,
    /// Locale tag (e.g. "en", "es"); empty when not given.
    pub locale: String,
}

/// Row from a synonym CSV file.
#[derive(Debug, Deserialize)]
struct SynonymCsvRow {
    #[serde(rename = "Header")]
    header: String,
    #[serde(rename = "System Column")]
    system_column: String,
    #[serde(rename = "Locale", default)]
    locale: String,
}

/// Lookup table from normalized header to system column.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: BTreeMap<String, SynonymEntry>,
}

impl SynonymTable {
    /// Load the embedded default table.
    pub fn load_default() -> Result<Self> {
        Self::from_csv_str(
            embedded::DEFAULT_SYNONYMS,
            Path::new(embedded::DEFAULT_SYNONYMS_LABEL),
        )
    }

    /// Load a table from a CSV file on disk.
    pub fn load_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| StandardsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path)
    }

    /// Parse a table from CSV text. `label` names the source in errors.
    pub fn from_csv_str(content: &str, label: &Path) -> Result<Self> {
        Self::from_reader(content.as_bytes(), label)
    }

    /// Parse a table from any CSV reader. `label` names the source in errors.
    pub fn from_reader<R: Read>(reader: R, label: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut entries: BTreeMap<String, SynonymEntry> = BTreeMap::new();
        for row in reader.deserialize::<SynonymCsvRow>() {
            let row = row.map_err(|source| StandardsError::CsvRead {
                path: label.to_path_buf(),
                source,
            })?;
            let (key, entry) = parse_row(row, label)?;

            if let Some(existing) = entries.get(&key) {
                if existing.target != entry.target {
                    return Err(StandardsError::ConflictingSynonym {
                        key,
                        first: existing.target,
                        second: entry.target,
                        file: label.to_path_buf(),
                    });
                }
                continue;
            }
            entries.insert(key, entry);
        }

        tracing::debug!(
            source = %label.display(),
            synonyms = entries.len(),
            "Loaded synonym table"
        );
        Ok(Self { entries })
    }

    /// Merge another table over this one. Rows of `overlay` replace rows
    /// with the same normalized key.
    #[must_use]
    pub fn with_overlay(mut self, overlay: SynonymTable) -> Self {
        for (key, entry) in overlay.entries {
            if let Some(previous) = self.entries.get(&key)
                && previous.target != entry.target
            {
                tracing::debug!(
                    key = %key,
                    from = %previous.target,
                    to = %entry.target,
                    "Synonym overridden by overlay"
                );
            }
            self.entries.insert(key, entry);
        }
        self
    }

    /// Load a CSV file and merge it over this table.
    pub fn with_overlay_path(self, path: &Path) -> Result<Self> {
        let overlay = Self::load_path(path)?;
        Ok(self.with_overlay(overlay))
    }

    /// Keep only entries whose locale is in `locales`. Entries without a
    /// locale are always kept.
    #[must_use]
    pub fn restrict_to_locales(&self, locales: &[&str]) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                entry.locale.is_empty()
                    || locales
                        .iter()
                        .any(|locale| locale.eq_ignore_ascii_case(&entry.locale))
            })
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        Self { entries }
    }

    /// Look up a raw header.
    pub fn lookup(&self, raw_header: &str) -> Option<SystemColumnId> {
        self.lookup_normalized(&normalize_header(raw_header))
    }

    /// Look up an already normalized key.
    pub fn lookup_normalized(&self, key: &str) -> Option<SystemColumnId> {
        self.entries.get(key).map(|entry| entry.target)
    }

    /// Locales present in the table.
    pub fn locales(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .filter(|entry| !entry.locale.is_empty())
            .map(|entry| entry.locale.as_str())
            .collect()
    }

    /// System columns reachable through at least one synonym.
    pub fn covered_columns(&self) -> BTreeSet<SystemColumnId> {
        self.entries.values().map(|entry| entry.target).collect()
    }

    /// Headers that resolve to `target`, in key order.
    pub fn synonyms_for(&self, target: SystemColumnId) -> Vec<&str> {
        self.entries
            .values()
            .filter(|entry| entry.target == target)
            .map(|entry| entry.header.as_str())
            .collect()
    }

    /// Iterate `(normalized key, entry)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &SynonymEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_row(row: SynonymCsvRow, label: &Path) -> Result<(String, SynonymEntry)> {
    let key = normalize_header(&row.header);
    if key.is_empty() {
        return Err(invalid("Header", row.header, label));
    }
    let Some(target) = SystemColumnId::parse(&row.system_column) else {
        return Err(invalid("System Column", row.system_column, label));
    };
    let entry = SynonymEntry {
        header: row.header,
        target,
        locale: row.locale.to_lowercase(),
    };
    Ok((key, entry))
}

fn invalid(field: &'static str, value: String, label: &Path) -> StandardsError {
    StandardsError::InvalidValue {
        field,
        value,
        file: PathBuf::from(label),
    }
}
