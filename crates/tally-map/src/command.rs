//! Mapping edit commands.

use std::str::FromStr;

use tally_model::SystemColumnId;

use crate::error::MappingError;

/// A single edit to a mapping state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingCommand {
    /// Point a source column at a system column, or at nothing.
    Set {
        source_column: String,
        target: Option<SystemColumnId>,
    },
    /// Clear whichever source column currently holds this system column.
    Remove(SystemColumnId),
}

impl MappingCommand {
    /// Build a `Set` command.
    pub fn set(source_column: impl Into<String>, target: Option<SystemColumnId>) -> Self {
        Self::Set {
            source_column: source_column.into(),
            target,
        }
    }
}

/// Parses `SOURCE=TARGET`.
///
/// The split happens at the last `=`, so source names may themselves contain
/// `=`. An empty target or `none` clears the mapping.
impl FromStr for MappingCommand {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((source, target)) = s.rsplit_once('=') else {
            return Err(MappingError::InvalidAssignment(s.to_string()));
        };
        if source.is_empty() {
            return Err(MappingError::InvalidAssignment(s.to_string()));
        }
        let target = target.trim();
        let target = if target.is_empty() || target.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(target.parse::<SystemColumnId>()?)
        };
        Ok(Self::set(source, target))
    }
}
