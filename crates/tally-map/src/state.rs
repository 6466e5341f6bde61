//! Mapping state management.
//!
//! A [`MappingState`] holds one [`Mapping`] per source column in input order.
//! It is created once the source columns are known and changed only through
//! [`MappingState::set_mapping`] and [`MappingState::remove_mapping`].

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tally_model::{Mapping, SystemColumnId, ValidationResult, schema};

use crate::config::UniquenessPolicy;
use crate::resolver::SuggestionResolver;
use crate::validate::validate;

/// Ordered mapping set for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingState {
    mappings: Vec<Mapping>,
    policy: UniquenessPolicy,
}

impl MappingState {
    /// Create the mapping set for `source_columns`.
    ///
    /// A non-empty `seed` is used verbatim and is not checked against
    /// `source_columns`. Otherwise each distinct source column gets the
    /// resolver's suggestion; repeated names keep their first occurrence.
    pub fn initialize<S: AsRef<str>>(
        source_columns: &[S],
        seed: Option<&[Mapping]>,
        resolver: &SuggestionResolver,
    ) -> Self {
        if let Some(seed) = seed.filter(|seed| !seed.is_empty()) {
            tracing::debug!(mappings = seed.len(), "Mapping state seeded by caller");
            return Self::from_mappings(seed.to_vec());
        }

        let mut seen = HashSet::new();
        let mappings: Vec<Mapping> = source_columns
            .iter()
            .map(|column| column.as_ref())
            .filter(|column| seen.insert(*column))
            .map(|column| Mapping::new(column, resolver.suggest(column)))
            .collect();

        tracing::debug!(
            columns = source_columns.len(),
            suggested = mappings.iter().filter(|m| m.is_mapped()).count(),
            "Mapping state initialized from suggestions"
        );
        Self::from_mappings(mappings)
    }

    /// Wrap an existing mapping list.
    pub fn from_mappings(mappings: Vec<Mapping>) -> Self {
        Self {
            mappings,
            policy: UniquenessPolicy::default(),
        }
    }

    /// Set the uniqueness policy used by [`Self::set_mapping`].
    #[must_use]
    pub fn with_policy(mut self, policy: UniquenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Uniqueness policy in effect.
    pub fn policy(&self) -> UniquenessPolicy {
        self.policy
    }

    /// Replace the target of `source_column`.
    ///
    /// Under [`UniquenessPolicy::SelectionSurface`] no uniqueness check is made
    /// here. Under [`UniquenessPolicy::Exclusive`] other holders of `target` are
    /// cleared first. Unknown source columns leave the state unchanged.
    ///
    /// Returns true if the state changed.
    pub fn set_mapping(&mut self, source_column: &str, target: Option<SystemColumnId>) -> bool {
        if !self.mappings.iter().any(|m| m.source_column == source_column) {
            tracing::debug!("set_mapping ignored: unknown source column");
            return false;
        }

        let mut changed = false;
        if let (UniquenessPolicy::Exclusive, Some(id)) = (self.policy, target) {
            for mapping in &mut self.mappings {
                if mapping.source_column != source_column && mapping.system_column == Some(id) {
                    mapping.system_column = None;
                    changed = true;
                }
            }
        }
        for mapping in &mut self.mappings {
            if mapping.source_column == source_column && mapping.system_column != target {
                mapping.system_column = target;
                changed = true;
            }
        }

        if changed {
            tracing::debug!(system_column = ?target, "Mapping updated");
        }
        changed
    }

    /// Clear `system_column` from whichever source column holds it.
    ///
    /// Returns false (and leaves the state untouched) if nothing holds it.
    pub fn remove_mapping(&mut self, system_column: SystemColumnId) -> bool {
        let mut changed = false;
        for mapping in &mut self.mappings {
            if mapping.system_column == Some(system_column) {
                mapping.system_column = None;
                changed = true;
            }
        }
        if changed {
            tracing::debug!(system_column = %system_column, "Mapping removed");
        }
        changed
    }

    /// Targets that may be offered for `source_column`.
    ///
    /// All system columns in registry order, minus those held by other source
    /// columns. The column's own current target stays selectable.
    pub fn selectable_targets(&self, source_column: &str) -> Vec<SystemColumnId> {
        let claimed: HashSet<SystemColumnId> = self
            .mappings
            .iter()
            .filter(|m| m.source_column != source_column)
            .filter_map(|m| m.system_column)
            .collect();
        schema::all()
            .iter()
            .copied()
            .filter(|id| !claimed.contains(id))
            .collect()
    }

    /// Current mappings in input order.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Consume the state, returning its mappings.
    pub fn into_mappings(self) -> Vec<Mapping> {
        self.mappings
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Target currently assigned to `source_column`.
    pub fn target_of(&self, source_column: &str) -> Option<SystemColumnId> {
        self.mappings
            .iter()
            .find(|m| m.source_column == source_column)
            .and_then(|m| m.system_column)
    }

    /// First source column holding `target`.
    pub fn source_for(&self, target: SystemColumnId) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.system_column == Some(target))
            .map(|m| m.source_column.as_str())
    }

    /// Source columns without a target, in input order.
    pub fn unmapped_sources(&self) -> Vec<&str> {
        self.mappings
            .iter()
            .filter(|m| !m.is_mapped())
            .map(|m| m.source_column.as_str())
            .collect()
    }

    /// System columns held by more than one source column, in registry order.
    pub fn duplicate_targets(&self) -> Vec<SystemColumnId> {
        let mut counts: BTreeMap<SystemColumnId, usize> = BTreeMap::new();
        for id in self.mappings.iter().filter_map(|m| m.system_column) {
            *counts.entry(id).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect()
    }

    /// Validate the current mappings.
    pub fn validation(&self) -> ValidationResult {
        validate(&self.mappings)
    }

    /// Summary counts.
    pub fn summary(&self) -> MappingSummary {
        let targets: HashSet<SystemColumnId> =
            self.mappings.iter().filter_map(|m| m.system_column).collect();
        let count_in = |ids: &[SystemColumnId]| ids.iter().filter(|id| targets.contains(id)).count();

        MappingSummary {
            source_columns: self.mappings.len(),
            mapped: self.mappings.iter().filter(|m| m.is_mapped()).count(),
            unmapped: self.mappings.iter().filter(|m| !m.is_mapped()).count(),
            required_total: schema::all_required().len(),
            required_mapped: count_in(schema::all_required()),
            inferable_mapped: count_in(schema::all_inferable()),
        }
    }

    /// Convert to a serializable config for the caller to persist.
    pub fn to_config(&self) -> MappingConfig {
        let validation = self.validation();
        MappingConfig {
            mappings: self.mappings.clone(),
            unmapped_columns: self
                .unmapped_sources()
                .into_iter()
                .map(str::to_string)
                .collect(),
            valid: validation.valid,
            missing_required: validation.missing_required,
        }
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    /// Number of source columns.
    pub source_columns: usize,
    /// Source columns with a target.
    pub mapped: usize,
    /// Source columns without a target.
    pub unmapped: usize,
    /// Number of required system columns.
    pub required_total: usize,
    /// Required system columns with a source column.
    pub required_mapped: usize,
    /// Inferable system columns with a source column.
    pub inferable_mapped: usize,
}

/// Finalized mapping handed to the caller for persistence and ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    /// Mappings in input order.
    pub mappings: Vec<Mapping>,
    /// Source columns without a target.
    #[serde(default)]
    pub unmapped_columns: Vec<String>,
    /// Whether every required column was mapped.
    #[serde(default)]
    pub valid: bool,
    /// Required columns that were not mapped.
    #[serde(default)]
    pub missing_required: Vec<SystemColumnId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pairs: &[(&str, Option<SystemColumnId>)]) -> MappingState {
        MappingState::from_mappings(
            pairs
                .iter()
                .map(|(source, target)| Mapping::new(*source, *target))
                .collect(),
        )
    }

    #[test]
    fn set_mapping_tolerates_duplicates_by_default() {
        let mut state = state(&[
            ("a", Some(SystemColumnId::Quantity)),
            ("b", None),
        ]);
        assert!(state.set_mapping("b", Some(SystemColumnId::Quantity)));
        assert_eq!(state.duplicate_targets(), vec![SystemColumnId::Quantity]);
        assert_eq!(state.source_for(SystemColumnId::Quantity), Some("a"));
    }

    #[test]
    fn exclusive_policy_releases_previous_holder() {
        let mut state = state(&[
            ("a", Some(SystemColumnId::Quantity)),
            ("b", None),
        ])
        .with_policy(UniquenessPolicy::Exclusive);
        assert!(state.set_mapping("b", Some(SystemColumnId::Quantity)));
        assert_eq!(state.target_of("a"), None);
        assert_eq!(state.target_of("b"), Some(SystemColumnId::Quantity));
        assert!(state.duplicate_targets().is_empty());
    }

    #[test]
    fn set_mapping_to_same_target_is_not_a_change() {
        let mut state = state(&[("a", Some(SystemColumnId::Quantity))]);
        assert!(!state.set_mapping("a", Some(SystemColumnId::Quantity)));
    }

    #[test]
    fn set_mapping_ignores_unknown_source() {
        let mut state = state(&[("a", None)]);
        let before = state.clone();
        assert!(!state.set_mapping("z", Some(SystemColumnId::Quantity)));
        assert_eq!(state, before);
    }

    #[test]
    fn remove_mapping_clears_every_holder() {
        let mut state = state(&[
            ("a", Some(SystemColumnId::Quantity)),
            ("b", Some(SystemColumnId::Quantity)),
            ("c", Some(SystemColumnId::Margin)),
        ]);
        assert!(state.remove_mapping(SystemColumnId::Quantity));
        assert_eq!(state.unmapped_sources(), vec!["a", "b"]);
        assert_eq!(state.target_of("c"), Some(SystemColumnId::Margin));
        assert!(!state.remove_mapping(SystemColumnId::Quantity));
    }

    #[test]
    fn selectable_targets_keep_own_target() {
        let state = state(&[
            ("a", Some(SystemColumnId::Quantity)),
            ("b", Some(SystemColumnId::TotalPrice)),
        ]);
        let for_a = state.selectable_targets("a");
        assert!(for_a.contains(&SystemColumnId::Quantity));
        assert!(!for_a.contains(&SystemColumnId::TotalPrice));
        assert_eq!(for_a.len(), 16);
        assert_eq!(for_a[0], SystemColumnId::TransactionDate);
    }

    #[test]
    fn summary_counts() {
        let state = state(&[
            ("a", Some(SystemColumnId::Quantity)),
            ("b", Some(SystemColumnId::Margin)),
            ("c", None),
        ]);
        let summary = state.summary();
        assert_eq!(summary.source_columns, 3);
        assert_eq!(summary.mapped, 2);
        assert_eq!(summary.unmapped, 1);
        assert_eq!(summary.required_total, 5);
        assert_eq!(summary.required_mapped, 1);
        assert_eq!(summary.inferable_mapped, 1);
    }

    #[test]
    fn to_config_reports_validation() {
        let state = state(&[("a", Some(SystemColumnId::Quantity)), ("b", None)]);
        let config = state.to_config();
        assert!(!config.valid);
        assert_eq!(config.unmapped_columns, vec!["b".to_string()]);
        assert_eq!(config.missing_required.len(), 4);
    }
}
