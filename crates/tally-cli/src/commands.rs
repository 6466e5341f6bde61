use anyhow::Result;
use tally_cli::reconcile::{MapOptions, MapOutcome, read_header, reconcile, write_config};
use tally_cli::render::{columns_table, mapping_table, missing_report, summary_line};
use tally_map::MappingCommand;
use tracing::info_span;

use crate::cli::MapArgs;

pub fn run_columns() {
    println!("{}", columns_table());
}

pub fn run_map(args: &MapArgs) -> Result<MapOutcome> {
    let span = info_span!("map", file = %args.csv.display());
    let _guard = span.enter();

    let source_columns = read_header(&args.csv)?;
    let edits = args
        .set
        .iter()
        .cloned()
        .chain(args.unset.iter().copied().map(MappingCommand::Remove))
        .collect();
    let options = MapOptions {
        seed: args.seed.clone(),
        synonyms: args.synonyms.clone(),
        config: args.config.clone(),
        strict: args.strict,
        edits,
    };
    let outcome = reconcile(&source_columns, &options)?;

    if let Some(path) = &args.output {
        write_config(path, &outcome.config)?;
    }
    Ok(outcome)
}

pub fn print_outcome(outcome: &MapOutcome) {
    println!("{}", mapping_table(&outcome.config.mappings));
    println!("{}", summary_line(&outcome.summary));
    print!("{}", missing_report(&outcome.missing));
    if !outcome.skipped_edits.is_empty() {
        eprintln!(
            "{} edit(s) left the mapping unchanged",
            outcome.skipped_edits.len()
        );
    }
}
