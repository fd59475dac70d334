//! Sleep cleaner: date key, canonical names, mean fill per metric.

use tracing::{debug, warn};

use crate::clean::coerce::coerce_column;
use crate::clean::dates::parse_keys;
use crate::clean::impute::fill_mean;
use crate::clean::{CleanReport, ColumnReport, FillPolicy, source_cells};
use crate::domain::{Column, KeyedTable, RawTable, SleepConfig};
use crate::error::AppError;

const LABEL: &str = "Sleep";

pub fn clean_sleep(raw: &RawTable, config: &SleepConfig) -> Result<(KeyedTable, CleanReport), AppError> {
    let keys = parse_keys(raw, &config.date_column, LABEL)?;

    let mut columns = Vec::with_capacity(config.metrics.len());
    let mut reports = Vec::with_capacity(config.metrics.len());

    for mapping in &config.metrics {
        let (mut values, stats) = coerce_column(source_cells(raw, mapping, LABEL)?);
        let outcome = fill_mean(&mut values);

        if outcome.all_missing() {
            warn!(column = %mapping.canonical, "sleep column has no values; left missing");
        } else {
            debug!(column = %mapping.canonical, filled = outcome.filled, mean = ?outcome.mean, "mean fill");
        }

        reports.push(ColumnReport {
            column: mapping.canonical.clone(),
            policy: FillPolicy::Mean,
            malformed: stats.malformed,
            filled: outcome.filled,
            all_missing: outcome.all_missing(),
        });
        columns.push(Column::numeric(mapping.canonical.clone(), values));
    }

    let report = CleanReport {
        dataset: LABEL.to_lowercase(),
        rows: keys.len(),
        columns: reports,
        stress: None,
    };

    Ok((KeyedTable { keys, columns }, report))
}
