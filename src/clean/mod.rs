//! Cleaning stages: raw loader output → date-keyed, imputed tables.
//!
//! - silent numeric coercion (`coerce`)
//! - date-key parsing and uniqueness (`dates`)
//! - fill primitives and the stress rule table (`impute`)
//! - the two dataset cleaners (`sleep`, `training`)

use serde::Serialize;

use crate::clean::impute::StressOutcome;
use crate::domain::{ColumnMapping, RawTable};
use crate::error::AppError;

pub mod coerce;
pub mod dates;
pub mod impute;
pub mod sleep;
pub mod training;

pub use sleep::clean_sleep;
pub use training::clean_training;

/// How a column's missing cells were filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    Mean,
    Constant(f64),
    StressLookup,
    Passthrough,
}

/// What cleaning did to one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub column: String,
    pub policy: FillPolicy,
    /// Non-empty cells that failed numeric coercion.
    pub malformed: usize,
    pub filled: usize,
    /// No value was present, so the column is still missing after cleaning.
    pub all_missing: bool,
}

/// What cleaning did to one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    pub dataset: String,
    pub rows: usize,
    pub columns: Vec<ColumnReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress: Option<StressOutcome>,
}

impl CleanReport {
    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }

    pub fn all_missing_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter(|c| c.all_missing).map(|c| c.column.as_str())
    }
}

/// Cells of the mapped source column, failing if the table lacks it.
fn source_cells<'a>(
    raw: &'a RawTable,
    mapping: &ColumnMapping,
    label: &str,
) -> Result<impl Iterator<Item = &'a str> + use<'a>, AppError> {
    raw.column(&mapping.source).ok_or_else(|| {
        AppError::schema_mismatch(format!("{label} table has no column `{}`.", mapping.source))
    })
}
