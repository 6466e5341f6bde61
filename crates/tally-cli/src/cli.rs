//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tally_map::MappingCommand;
use tally_model::SystemColumnId;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Match sales file columns to the tally schema",
    long_about = "Match the columns of an uploaded sales file to the tally schema.\n\n\
                  Headers are matched against a synonym table (English and Spanish by default).\n\
                  The result can be edited from the command line and saved as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include column headers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the system columns.
    Columns,

    /// Map the header of a CSV file to system columns.
    Map(MapArgs),
}

#[derive(Parser)]
pub struct MapArgs {
    /// CSV file whose header row is mapped.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Restore a mapping saved with --output instead of suggesting one.
    #[arg(long = "seed", value_name = "JSON")]
    pub seed: Option<PathBuf>,

    /// Assign a source column to a system column (repeatable).
    ///
    /// An empty TARGET or `none` clears the column.
    #[arg(long = "set", value_name = "SOURCE=TARGET")]
    pub set: Vec<MappingCommand>,

    /// Clear whichever source column holds a system column (repeatable).
    #[arg(long = "unset", value_name = "TARGET")]
    pub unset: Vec<SystemColumnId>,

    /// Extra synonyms (CSV with Header, System Column, Locale).
    #[arg(long = "synonyms", value_name = "CSV")]
    pub synonyms: Option<PathBuf>,

    /// Engine configuration (JSON).
    #[arg(long = "config", value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Reassigning a claimed system column releases it from its previous
    /// source column.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Save the mapping as JSON.
    #[arg(long = "output", short = 'o', value_name = "JSON")]
    pub output: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
