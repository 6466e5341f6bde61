//! The `map` workflow: header in, reconciled mapping out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tally_map::{
    EngineConfig, MappingCommand, MappingConfig, MappingObserver, MappingSummary, ObserverError,
    ReconciliationEngine, Requests, SuggestionResolver, UniquenessPolicy,
};
use tally_model::{Mapping, SystemColumnId};
use tally_standards::SynonymTable;
use tracing::{debug, info, warn};

use crate::logging::redact_value;

/// Inputs to [`reconcile`] besides the source columns.
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    /// Previously saved mapping to restore.
    pub seed: Option<PathBuf>,
    /// Synonym CSV merged over the embedded table.
    pub synonyms: Option<PathBuf>,
    /// Engine config JSON.
    pub config: Option<PathBuf>,
    /// Force the exclusive uniqueness policy.
    pub strict: bool,
    /// Edits applied after initialization, in order.
    pub edits: Vec<MappingCommand>,
}

/// Result of a `map` run.
#[derive(Debug, Clone)]
pub struct MapOutcome {
    pub config: MappingConfig,
    pub summary: MappingSummary,
    pub policy: UniquenessPolicy,
    /// Missing required columns with descriptions, in registry order.
    pub missing: Vec<(SystemColumnId, &'static str)>,
    /// Edits that left the mapping unchanged.
    pub skipped_edits: Vec<MappingCommand>,
}

/// Read the header row of a CSV file.
///
/// Bytes that are not valid UTF-8 (Latin-1 exports, for instance) are
/// replaced with U+FFFD rather than failing the read.
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = reader
        .byte_headers()
        .with_context(|| format!("read header row of {}", path.display()))?;
    if headers.is_empty() {
        bail!("{} has no header row", path.display());
    }
    Ok(headers
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect())
}

/// Load a mapping saved with `--output`.
pub fn load_seed(path: &Path) -> Result<Vec<Mapping>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read seed {}", path.display()))?;
    let config: MappingConfig = serde_json::from_str(&content)
        .with_context(|| format!("parse seed {}", path.display()))?;
    Ok(config.mappings)
}

/// Write the finalized mapping as pretty JSON.
pub fn write_config(path: &Path, config: &MappingConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("serialize mapping")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, json + "\n").with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "Mapping written");
    Ok(())
}

/// Build an engine from the synonym overlay and config options.
pub fn build_engine(options: &MapOptions) -> Result<ReconciliationEngine> {
    let resolver = match &options.synonyms {
        Some(path) => {
            let table = SynonymTable::load_default()?
                .with_overlay_path(path)
                .with_context(|| format!("load synonyms {}", path.display()))?;
            SuggestionResolver::new(table)
        }
        None => SuggestionResolver::with_defaults()?,
    };

    let mut config = match &options.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if options.strict {
        config.uniqueness = UniquenessPolicy::Exclusive;
    }
    debug!(
        policy = config.uniqueness.label(),
        max_cascade = config.max_cascade,
        synonyms = resolver.synonyms().len(),
        "Engine configured"
    );

    let mut engine = ReconciliationEngine::new(resolver, config);
    engine.subscribe(Box::new(TransitionLog::default()));
    Ok(engine)
}

/// Initialize a mapping for `source_columns` and apply the requested edits.
pub fn reconcile(source_columns: &[String], options: &MapOptions) -> Result<MapOutcome> {
    let seed = options.seed.as_deref().map(load_seed).transpose()?;
    let mut engine = build_engine(options)?;
    engine.initialize(source_columns, seed.as_deref());

    let mut skipped_edits = Vec::new();
    for edit in &options.edits {
        if !engine.apply(edit.clone()) {
            match edit {
                MappingCommand::Set { source_column, .. } => warn!(
                    source = redact_value(source_column),
                    "Edit left the mapping unchanged"
                ),
                MappingCommand::Remove(system_column) => warn!(
                    system_column = system_column.as_str(),
                    "Column was not mapped"
                ),
            }
            skipped_edits.push(edit.clone());
        }
    }

    Ok(MapOutcome {
        config: engine.to_config(),
        summary: engine.state().summary(),
        policy: engine.config().uniqueness,
        missing: engine.missing_required_details(),
        skipped_edits,
    })
}

/// Logs each transition and validity changes.
#[derive(Debug, Default)]
struct TransitionLog {
    valid: Option<bool>,
}

impl MappingObserver for TransitionLog {
    fn on_mappings(
        &mut self,
        mappings: &[Mapping],
        _requests: &mut Requests,
    ) -> Result<(), ObserverError> {
        for mapping in mappings {
            tracing::trace!(
                source = redact_value(&mapping.source_column),
                system_column = mapping.system_column.map_or("-", |id| id.as_str()),
                "Mapping"
            );
        }
        Ok(())
    }

    fn on_validity(&mut self, valid: bool, _requests: &mut Requests) -> Result<(), ObserverError> {
        if self.valid != Some(valid) {
            if valid {
                info!("All required columns mapped");
            } else {
                info!("Required columns missing");
            }
            self.valid = Some(valid);
        }
        Ok(())
    }
}
