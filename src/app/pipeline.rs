//! The load → clean → clean → join → persist workflow.
//!
//! `run_pipeline` reads the configured sources; `run_pipeline_with_tables`
//! starts from already-loaded tables so the cleaning and join stages can be
//! driven directly (tests, `inspect`-style tooling).

use std::time::Duration;

use tracing::info;

use crate::clean::{CleanReport, clean_sleep, clean_training};
use crate::domain::{KeyedTable, PipelineConfig, RawTable};
use crate::error::AppError;
use crate::io::{SourceReader, load_table, stage_summary_json, stage_table_csv};
use crate::join::{JoinStats, join_tables};
use crate::report::RunSummary;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub sleep: KeyedTable,
    pub training: KeyedTable,
    pub combined: KeyedTable,
    pub summary: RunSummary,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunOutput, AppError> {
    let reader = SourceReader::new(Duration::from_secs(config.source_timeout_secs))?;

    // 1) Load both datasets before touching the output.
    let sleep_raw = load_table(&reader, &config.sleep.sources, &config.sleep.allow_list())
        .map_err(|e| AppError::new(e.kind(), format!("Sleep source: {}", e.message())))?;
    let training_raw = load_table(&reader, &config.training.sources, &config.training.allow_list())
        .map_err(|e| AppError::new(e.kind(), format!("Training source: {}", e.message())))?;

    run_pipeline_with_tables(config, &sleep_raw, &training_raw)
}

/// Execute the pipeline from pre-loaded raw tables.
pub fn run_pipeline_with_tables(
    config: &PipelineConfig,
    sleep_raw: &RawTable,
    training_raw: &RawTable,
) -> Result<RunOutput, AppError> {
    // 2) Clean each dataset independently.
    let (sleep, sleep_report) = clean_sleep(sleep_raw, &config.sleep)?;
    info!(rows = sleep.len(), filled = sleep_report.total_filled(), "cleaned sleep table");

    let (training, training_report) = clean_training(training_raw, &config.training)?;
    info!(rows = training.len(), filled = training_report.total_filled(), "cleaned training table");

    // 3) Join on the date key.
    let (combined, overlap) = join_tables(&sleep, &training, config.join)?;
    info!(join = ?config.join, rows = combined.len(), shared = overlap.shared, "joined tables");

    // 4) Persist. Both files are staged first; nothing reaches its
    // destination unless every stage, including the summary, succeeded.
    // The CSV is renamed last.
    let staged_csv = stage_table_csv(&config.output, &combined)?;
    let summary = build_summary(config, sleep_report, training_report, overlap, combined.len());
    if let Some(path) = &config.summary_json {
        stage_summary_json(path, &summary)?.persist()?;
        info!(path = %path.display(), "wrote run summary");
    }
    staged_csv.persist()?;
    info!(path = %config.output.display(), "wrote combined table");

    Ok(RunOutput {
        sleep,
        training,
        combined,
        summary,
    })
}

fn build_summary(
    config: &PipelineConfig,
    sleep: CleanReport,
    training: CleanReport,
    overlap: JoinStats,
    combined_rows: usize,
) -> RunSummary {
    RunSummary {
        output: config.output.clone(),
        join: config.join,
        sleep,
        training,
        overlap,
        combined_rows,
    }
}
