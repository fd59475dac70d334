//! Run summaries: what was loaded, imputed and joined.

use std::path::PathBuf;

use serde::Serialize;

use crate::clean::CleanReport;
use crate::domain::JoinKind;
use crate::join::JoinStats;

pub mod format;

pub use format::{format_inspect, format_run_summary};

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    pub join: JoinKind,
    pub sleep: CleanReport,
    pub training: CleanReport,
    pub overlap: JoinStats,
    pub combined_rows: usize,
}
