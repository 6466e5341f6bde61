//! Source-to-system column mapping types.

use serde::{Deserialize, Serialize};

use crate::column::SystemColumnId;
use crate::schema;

/// Association between one source column and at most one system column.
///
/// The source column is an opaque label taken from the caller's dataset and
/// is never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// Column name from the input data.
    pub source_column: String,
    /// Assigned system column, if any.
    pub system_column: Option<SystemColumnId>,
}

impl Mapping {
    /// Create a mapping.
    pub fn new(source_column: impl Into<String>, system_column: Option<SystemColumnId>) -> Self {
        Self {
            source_column: source_column.into(),
            system_column,
        }
    }

    /// Create a mapping with no target.
    pub fn unmapped(source_column: impl Into<String>) -> Self {
        Self::new(source_column, None)
    }

    /// True if a system column is assigned.
    pub fn is_mapped(&self) -> bool {
        self.system_column.is_some()
    }
}

/// Outcome of validating a mapping set.
///
/// Derived on demand from the mappings and the schema registry; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when every required column has a source column.
    pub valid: bool,
    /// Required columns without a source column, in registry order.
    pub missing_required: Vec<SystemColumnId>,
}

impl ValidationResult {
    /// Build a result from the missing required columns.
    pub fn from_missing(missing_required: Vec<SystemColumnId>) -> Self {
        Self {
            valid: missing_required.is_empty(),
            missing_required,
        }
    }

    /// Missing required columns paired with their descriptions, for display.
    pub fn missing_descriptions(&self) -> Vec<(SystemColumnId, &'static str)> {
        self.missing_required
            .iter()
            .map(|id| (*id, schema::get(*id).description))
            .collect()
    }
}
