//! Suggestion resolver.
//!
//! A suggestion is a single exact lookup of the normalized header in the
//! synonym table. There is no fuzzy matching and no scoring: a header either
//! names a system column through a known synonym or it does not.

use tally_model::{Mapping, SystemColumnId};
use tally_standards::SynonymTable;

use crate::error::Result;

pub use tally_standards::normalize_header;

/// Proposes a system column for a source column name.
#[derive(Debug, Clone, Default)]
pub struct SuggestionResolver {
    synonyms: SynonymTable,
}

impl SuggestionResolver {
    /// Create a resolver over a synonym table.
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Create a resolver over the embedded default synonyms.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(SynonymTable::load_default()?))
    }

    /// Suggest a system column for `source_column`, if a synonym matches.
    pub fn suggest(&self, source_column: &str) -> Option<SystemColumnId> {
        let key = normalize_header(source_column);
        let suggestion = self.synonyms.lookup_normalized(&key);
        tracing::trace!(key_len = key.len(), suggestion = ?suggestion, "Resolved header");
        suggestion
    }

    /// One mapping per input name, in input order.
    pub fn suggest_all<S: AsRef<str>>(&self, source_columns: &[S]) -> Vec<Mapping> {
        source_columns
            .iter()
            .map(|column| {
                let column = column.as_ref();
                Mapping::new(column, self.suggest(column))
            })
            .collect()
    }

    /// The synonym table backing this resolver.
    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SuggestionResolver {
        SuggestionResolver::with_defaults().unwrap()
    }

    #[test]
    fn suggests_through_separator_and_case_variants() {
        let resolver = resolver();
        assert_eq!(
            resolver.suggest("Transaction_Date"),
            Some(SystemColumnId::TransactionDate)
        );
        assert_eq!(
            resolver.suggest("unit-price"),
            Some(SystemColumnId::UnitPrice)
        );
        assert_eq!(resolver.suggest("  QTY "), Some(SystemColumnId::Quantity));
    }

    #[test]
    fn no_partial_credit() {
        let resolver = resolver();
        assert_eq!(resolver.suggest("quantities"), None);
        assert_eq!(resolver.suggest("total price usd"), None);
        assert_eq!(resolver.suggest(""), None);
    }

    #[test]
    fn markup_is_treated_as_plain_text() {
        let resolver = resolver();
        assert_eq!(resolver.suggest("<img src=x onerror=alert(1)>"), None);
        assert_eq!(resolver.suggest("fecha<br>"), None);
    }

    #[test]
    fn empty_table_suggests_nothing() {
        let resolver = SuggestionResolver::default();
        assert_eq!(resolver.suggest("date"), None);
    }

    #[test]
    fn suggest_all_preserves_order() {
        let mappings = resolver().suggest_all(&["qty", "notes", "fecha"]);
        let sources: Vec<_> = mappings.iter().map(|m| m.source_column.as_str()).collect();
        assert_eq!(sources, vec!["qty", "notes", "fecha"]);
        assert_eq!(mappings[1].system_column, None);
    }
}
