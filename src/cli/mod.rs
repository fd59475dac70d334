//! Command-line parsing for the sleep/training merge.
//!
//! Source locators and the output path can also come from the environment
//! (and a `.env` file), so a plain `sleep-merge` runs with no flags.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::JoinKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sleep-merge",
    version,
    about = "Clean sleep and training/recovery exports and join them by date"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load, clean and join both datasets and write the combined CSV.
    Run(RunArgs),
    /// Print the header and row count of one source.
    Inspect(InspectArgs),
}

/// Options for a pipeline run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Sleep source (path or URL). Repeat, or comma-separate, to append several.
    #[arg(long = "sleep", env = "SLEEP_SOURCE", value_delimiter = ',', value_name = "LOC")]
    pub sleep: Vec<String>,

    /// Training/recovery source (path or URL). Repeatable like `--sleep`.
    #[arg(long = "training", env = "TRAINING_SOURCE", value_delimiter = ',', value_name = "LOC")]
    pub training: Vec<String>,

    /// Combined CSV destination (overwritten).
    #[arg(short, long, env = "COMBINED_OUTPUT", default_value = "combined.csv")]
    pub output: PathBuf,

    /// How to combine the tables.
    #[arg(long, value_enum, default_value_t = JoinKind::Inner)]
    pub join: JoinKind,

    /// Date column of the sleep source.
    #[arg(long, default_value = "date")]
    pub sleep_date_column: String,

    /// Date column of the training source.
    #[arg(long, default_value = "Date")]
    pub training_date_column: String,

    /// Stress score for rows whose exertion rating matches no rule.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub stress_fallback: f64,

    /// Also write the run summary as JSON.
    #[arg(long, value_name = "JSON")]
    pub summary_json: Option<PathBuf>,

    /// HTTP timeout for URL sources, in seconds.
    #[arg(long, env = "SOURCE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Do not print the run summary.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Options for inspecting a source.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Path or URL of the source.
    #[arg(value_name = "LOC")]
    pub locator: String,

    /// HTTP timeout for URL sources, in seconds.
    #[arg(long, env = "SOURCE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout: u64,
}
