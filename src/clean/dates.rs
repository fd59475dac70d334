//! Date-key parsing.
//!
//! Every cleaned table is keyed by a calendar date. Exports vary in how they
//! write dates, so we accept a small fixed set of formats; datetimes are
//! accepted too and their time component is dropped.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::RawTable;
use crate::error::AppError;

const DATE_FMTS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%B %d, %Y"];
const DATETIME_FMTS: [&str; 4] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty date value.".to_string());
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    // Offsets are ignored: the local calendar date as written is the key.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local().date());
    }
    Err(format!(
        "Invalid date '{s}'. Expected e.g. YYYY-MM-DD, YYYY/MM/DD, MM/DD/YYYY, DD-MM-YYYY or an ISO datetime."
    ))
}

/// Parse `date_column` of `raw` into unique row keys, in row order.
///
/// `label` names the dataset in error messages.
pub fn parse_keys(raw: &RawTable, date_column: &str, label: &str) -> Result<Vec<NaiveDate>, AppError> {
    let cells = raw.column(date_column).ok_or_else(|| {
        AppError::schema_mismatch(format!("{label} table has no date column `{date_column}`."))
    })?;

    let mut keys = Vec::with_capacity(raw.len());
    let mut seen: HashMap<NaiveDate, usize> = HashMap::with_capacity(raw.len());

    for (idx, cell) in cells.enumerate() {
        // +2: 1-based, plus the header line.
        let line = idx + 2;
        let date = parse_date(cell)
            .map_err(|e| AppError::date_parse(format!("{label} row {line}, column `{date_column}`: {e}")))?;
        if let Some(first) = seen.insert(date, line) {
            return Err(AppError::duplicate_key(format!(
                "{label} has more than one row for {date} (rows {first} and {line})."
            )));
        }
        keys.push(date);
    }

    Ok(keys)
}
