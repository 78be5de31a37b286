//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sira",
    version,
    about = "Load regulatory distribution data workbooks into the central database",
    long_about = "Reads the regulator's Excel workbooks (transformer centers, switching \n\
                  equipment, service interruptions), reconciles column spellings onto the \n\
                  destination schemas, normalizes values, and appends the result to the \n\
                  database. `check` runs the data-quality validation without loading."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Also write logs to a file (console output is kept).
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load every workbook in the source folder into the database.
    Load(LoadArgs),

    /// Validate every workbook without touching the database.
    Check(CheckArgs),

    /// List record types with their sheets, tables, and canonical columns.
    Schema,
}

#[derive(Parser)]
pub struct LoadArgs {
    /// Folder holding the workbooks (default: $SOURCE_DIR).
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Read, reconcile, and normalize, but skip the database append.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Folder holding the workbooks (default: $SOURCE_DIR).
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,
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
