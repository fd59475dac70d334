//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - runs the pipeline (or `inspect`)
//! - prints the run summary

use std::time::Duration;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, InspectArgs, RunArgs};
use crate::domain::{PipelineConfig, SleepConfig, TrainingConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sleep-merge` binary.
pub fn run() -> Result<(), AppError> {
    // Env-backed flags read `.env` values, so load it before parsing.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args)?;
    debug!(?config, "resolved configuration");

    let run = pipeline::run_pipeline(&config)?;

    if !args.quiet {
        println!("{}", crate::report::format_run_summary(&run.summary));
    }
    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let reader = crate::io::SourceReader::new(Duration::from_secs(args.timeout))?;
    let text = reader.read(&args.locator)?;
    let table = crate::io::parse_csv(&text, None)?;
    println!("{}", crate::report::format_inspect(&args.locator, &table));
    Ok(())
}

pub fn pipeline_config_from_args(args: &RunArgs) -> Result<PipelineConfig, AppError> {
    let sleep_sources = non_empty(&args.sleep);
    let training_sources = non_empty(&args.training);
    if sleep_sources.is_empty() {
        return Err(AppError::usage("No sleep source: pass --sleep or set SLEEP_SOURCE."));
    }
    if training_sources.is_empty() {
        return Err(AppError::usage("No training source: pass --training or set TRAINING_SOURCE."));
    }
    if !args.stress_fallback.is_finite() {
        return Err(AppError::usage("--stress-fallback must be a finite number."));
    }

    let sleep = SleepConfig {
        sources: sleep_sources,
        date_column: args.sleep_date_column.clone(),
        ..SleepConfig::default()
    };

    let mut training = TrainingConfig {
        sources: training_sources,
        date_column: args.training_date_column.clone(),
        ..TrainingConfig::default()
    };
    training.stress_lookup.fallback = args.stress_fallback;

    Ok(PipelineConfig {
        sleep,
        training,
        join: args.join,
        output: args.output.clone(),
        summary_json: args.summary_json.clone(),
        source_timeout_secs: args.timeout,
    })
}

fn non_empty(locators: &[String]) -> Vec<String> {
    locators
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rewrite argv so `sleep-merge` defaults to `sleep-merge run`.
///
/// Rules:
/// - `sleep-merge`                     -> `sleep-merge run`
/// - `sleep-merge --sleep a.csv ...`   -> `sleep-merge run --sleep a.csv ...`
/// - `sleep-merge [-v] --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    if is_help_or_version(&arg1) {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "inspect");
    if is_subcommand {
        return argv;
    }

    // Verbosity flags stay global; look past them for a subcommand.
    let first_non_verbose = argv[1..].iter().position(|a| !is_verbose_flag(a)).map(|i| i + 1);
    match first_non_verbose {
        Some(i) if matches!(argv[i].as_str(), "run" | "inspect") || is_help_or_version(&argv[i]) => argv,
        Some(i) if argv[i].starts_with('-') => {
            argv.insert(i, "run".to_string());
            argv
        }
        None => {
            argv.push("run".to_string());
            argv
        }
        Some(_) => argv,
    }
}

fn is_help_or_version(arg: &str) -> bool {
    matches!(arg, "-h" | "--help" | "-V" | "--version" | "help")
}

fn is_verbose_flag(arg: &str) -> bool {
    arg == "--verbose" || (arg.len() > 1 && arg.starts_with('-') && !arg.starts_with("--") && arg[1..].chars().all(|c| c == 'v'))
}
