//! Shared configuration types.
//!
//! Everything that used to be a fixed constant of the pipeline (source
//! locators, column allow-lists, rename maps, the stress rule table) lives in
//! these structs so the pipeline can be driven with arbitrary inputs.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::clean::impute::StressLookup;

/// A source column and the canonical name it is renamed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: String,
    pub canonical: String,
}

impl ColumnMapping {
    pub fn new(source: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            canonical: canonical.into(),
        }
    }
}

/// How the cleaned tables are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Keep only dates present in both tables.
    #[default]
    Inner,
    /// Keep every sleep date; training cells are empty where absent.
    Left,
    /// Keep every date from either table.
    Outer,
}

/// Sleep dataset: date column plus the 13 metric columns.
#[derive(Debug, Clone)]
pub struct SleepConfig {
    pub sources: Vec<String>,
    pub date_column: String,
    pub metrics: Vec<ColumnMapping>,
}

impl SleepConfig {
    /// Columns requested from the loader (date first).
    pub fn allow_list(&self) -> Vec<String> {
        allow_list(&self.date_column, &self.metrics)
    }
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            date_column: "date".to_string(),
            metrics: vec![
                ColumnMapping::new("Sleep Score", "Score"),
                ColumnMapping::new("Total Sleep Duration", "Total"),
                ColumnMapping::new("REM Sleep Duration", "REM"),
                ColumnMapping::new("Deep Sleep Duration", "Deep"),
                ColumnMapping::new("Light Sleep Duration", "Light"),
                ColumnMapping::new("Awake Time", "Awake"),
                ColumnMapping::new("Sleep Efficiency", "Efficiency"),
                ColumnMapping::new("Sleep Latency", "Latency"),
                ColumnMapping::new("Average Resting Heart Rate", "RHR"),
                ColumnMapping::new("Lowest Resting Heart Rate", "LowestRHR"),
                ColumnMapping::new("Average HRV", "HRV"),
                ColumnMapping::new("Respiratory Rate", "Breath"),
                ColumnMapping::new("Temperature Deviation", "TempDev"),
            ],
        }
    }
}

/// Training/recovery dataset: date column plus four metrics, each with its
/// own cleaning policy.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub sources: Vec<String>,
    pub date_column: String,
    /// Mean-filled.
    pub recovery: ColumnMapping,
    /// Zero-filled ("no workout").
    pub exertion: ColumnMapping,
    /// Filled from `stress_lookup` keyed on the exertion rating.
    pub stress: ColumnMapping,
    /// Passed through verbatim.
    pub alcohol: ColumnMapping,
    pub stress_lookup: StressLookup,
}

impl TrainingConfig {
    pub fn metrics(&self) -> [&ColumnMapping; 4] {
        [&self.recovery, &self.exertion, &self.stress, &self.alcohol]
    }

    pub fn allow_list(&self) -> Vec<String> {
        allow_list(&self.date_column, self.metrics())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            date_column: "Date".to_string(),
            recovery: ColumnMapping::new("Recovery Score", "Recovery"),
            exertion: ColumnMapping::new("Perceived Exertion", "RPE"),
            stress: ColumnMapping::new("Training Stress Score", "TSS"),
            alcohol: ColumnMapping::new("Alcohol", "Alcohol"),
            stress_lookup: StressLookup::default(),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags, environment variables and defaults.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sleep: SleepConfig,
    pub training: TrainingConfig,
    pub join: JoinKind,
    pub output: PathBuf,
    pub summary_json: Option<PathBuf>,
    /// HTTP timeout for URL locators.
    pub source_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sleep: SleepConfig::default(),
            training: TrainingConfig::default(),
            join: JoinKind::Inner,
            output: PathBuf::from("combined.csv"),
            summary_json: None,
            source_timeout_secs: 30,
        }
    }
}

fn allow_list<'a>(date_column: &str, metrics: impl IntoIterator<Item = &'a ColumnMapping>) -> Vec<String> {
    let mut cols = vec![date_column.to_string()];
    cols.extend(metrics.into_iter().map(|m| m.source.clone()));
    cols
}
