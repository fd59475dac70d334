//! Training/recovery cleaner.
//!
//! Each metric has its own policy:
//! - recovery: coerce, mean fill
//! - exertion: coerce, zero fill (a missing rating means no workout)
//! - stress: coerce, fill from the exertion rule table
//! - alcohol: verbatim text

use tracing::{debug, warn};

use crate::clean::coerce::coerce_column;
use crate::clean::dates::parse_keys;
use crate::clean::impute::{fill_constant, fill_mean, impute_stress};
use crate::clean::{CleanReport, ColumnReport, FillPolicy, source_cells};
use crate::domain::{Column, KeyedTable, RawTable, TrainingConfig};
use crate::error::AppError;

const LABEL: &str = "Training";

pub fn clean_training(raw: &RawTable, config: &TrainingConfig) -> Result<(KeyedTable, CleanReport), AppError> {
    let keys = parse_keys(raw, &config.date_column, LABEL)?;

    let (mut recovery, recovery_stats) = coerce_column(source_cells(raw, &config.recovery, LABEL)?);
    let recovery_fill = fill_mean(&mut recovery);
    if recovery_fill.all_missing() {
        warn!(column = %config.recovery.canonical, "recovery column has no values; left missing");
    }

    let (mut exertion, exertion_stats) = coerce_column(source_cells(raw, &config.exertion, LABEL)?);
    let exertion_filled = fill_constant(&mut exertion, 0.0);

    let (mut stress, stress_stats) = coerce_column(source_cells(raw, &config.stress, LABEL)?);
    let stress_outcome = impute_stress(&mut stress, &exertion, &config.stress_lookup);
    if stress_outcome.by_fallback > 0 {
        warn!(
            rows = stress_outcome.by_fallback,
            fallback = config.stress_lookup.fallback,
            "exertion rating matched no stress rule; fallback used"
        );
    }

    let alcohol: Vec<Option<String>> = source_cells(raw, &config.alcohol, LABEL)?
        .map(|cell| {
            let cell = cell.trim();
            (!cell.is_empty()).then(|| cell.to_string())
        })
        .collect();

    debug!(
        recovery_filled = recovery_fill.filled,
        exertion_filled,
        stress_by_rule = stress_outcome.by_rule,
        stress_by_fallback = stress_outcome.by_fallback,
        "training imputation"
    );

    let reports = vec![
        ColumnReport {
            column: config.recovery.canonical.clone(),
            policy: FillPolicy::Mean,
            malformed: recovery_stats.malformed,
            filled: recovery_fill.filled,
            all_missing: recovery_fill.all_missing(),
        },
        ColumnReport {
            column: config.exertion.canonical.clone(),
            policy: FillPolicy::Constant(0.0),
            malformed: exertion_stats.malformed,
            filled: exertion_filled,
            all_missing: false,
        },
        ColumnReport {
            column: config.stress.canonical.clone(),
            policy: FillPolicy::StressLookup,
            malformed: stress_stats.malformed,
            filled: stress_outcome.by_rule + stress_outcome.by_fallback,
            all_missing: false,
        },
        ColumnReport {
            column: config.alcohol.canonical.clone(),
            policy: FillPolicy::Passthrough,
            malformed: 0,
            filled: 0,
            all_missing: false,
        },
    ];

    let columns = vec![
        Column::numeric(config.recovery.canonical.clone(), recovery),
        Column::numeric(config.exertion.canonical.clone(), exertion),
        Column::numeric(config.stress.canonical.clone(), stress),
        Column::text(config.alcohol.canonical.clone(), alcohol),
    ];

    let report = CleanReport {
        dataset: LABEL.to_lowercase(),
        rows: keys.len(),
        columns: reports,
        stress: Some(stress_outcome),
    };

    Ok((KeyedTable { keys, columns }, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::impute::StressOutcome;
    use crate::domain::ColumnData;

    fn raw(rows: &[[&str; 5]]) -> RawTable {
        let cfg = TrainingConfig::default();
        let mut t = RawTable::new(cfg.allow_list());
        for r in rows {
            t.rows.push(r.iter().map(|s| s.to_string()).collect());
        }
        t
    }

    #[test]
    fn applies_each_policy() {
        let input = raw(&[
            ["2024-01-01", "60", "2", "", "1"],
            ["2024-01-02", "n/a", "", "", ""],
            ["2024-01-03", "80", "6", "90", "0"],
            ["2024-01-04", "oops", "4", "", "2"],
        ]);
        let (table, report) = clean_training(&input, &TrainingConfig::default()).unwrap();

        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Recovery", "RPE", "TSS", "Alcohol"]);
        assert_eq!(
            table.numeric("Recovery").unwrap(),
            &[Some(60.0), Some(70.0), Some(80.0), Some(70.0)]
        );
        assert_eq!(table.numeric("RPE").unwrap(), &[Some(2.0), Some(0.0), Some(6.0), Some(4.0)]);
        // Present score (90) is kept even though RPE 6 maps to 77.
        assert_eq!(table.numeric("TSS").unwrap(), &[Some(41.0), Some(0.0), Some(90.0), Some(53.0)]);
        assert_eq!(
            table.column("Alcohol").unwrap().data,
            ColumnData::Text(vec![Some("1".into()), None, Some("0".into()), Some("2".into())])
        );

        assert_eq!(report.columns[0].malformed, 1);
        assert_eq!(report.columns[0].filled, 2);
        assert_eq!(report.columns[1].filled, 1);
        assert_eq!(report.stress, Some(StressOutcome { by_rule: 3, by_fallback: 0 }));
    }

    #[test]
    fn malformed_exertion_counts_as_no_workout() {
        let input = raw(&[["2024-01-01", "50", "hard", "", ""]]);
        let (table, _) = clean_training(&input, &TrainingConfig::default()).unwrap();
        assert_eq!(table.numeric("RPE").unwrap(), &[Some(0.0)]);
        assert_eq!(table.numeric("TSS").unwrap(), &[Some(0.0)]);
    }

    #[test]
    fn negative_exertion_uses_configured_fallback() {
        let mut cfg = TrainingConfig::default();
        cfg.stress_lookup.fallback = 12.0;
        let input = raw(&[["2024-01-01", "50", "-1", "", ""], ["2024-01-02", "50", "3.05", "", ""]]);
        let (table, report) = clean_training(&input, &cfg).unwrap();
        assert_eq!(table.numeric("TSS").unwrap(), &[Some(12.0), Some(12.0)]);
        assert_eq!(report.stress.unwrap().by_fallback, 2);
    }

    #[test]
    fn numeric_columns_have_no_missing_cells() {
        let input = raw(&[
            ["2024-01-01", "", "", "", ""],
            ["2024-01-02", "55", "9", "", ""],
        ]);
        let (table, _) = clean_training(&input, &TrainingConfig::default()).unwrap();
        for name in ["Recovery", "RPE", "TSS"] {
            assert!(table.numeric(name).unwrap().iter().all(Option::is_some), "{name}");
        }
        assert_eq!(table.numeric("TSS").unwrap(), &[Some(0.0), Some(85.0)]);
    }

    #[test]
    fn entirely_missing_recovery_stays_missing() {
        let input = raw(&[
            ["2024-01-01", "", "2", "", ""],
            ["2024-01-02", "n/a", "", "", ""],
        ]);
        let (table, report) = clean_training(&input, &TrainingConfig::default()).unwrap();

        assert_eq!(table.numeric("Recovery").unwrap(), &[None, None]);
        assert!(report.columns[0].all_missing);
        assert_eq!(report.columns[0].filled, 0);
        assert_eq!(report.columns[0].malformed, 0);
        // The other policies still fill their columns.
        assert_eq!(table.numeric("RPE").unwrap(), &[Some(2.0), Some(0.0)]);
        assert_eq!(table.numeric("TSS").unwrap(), &[Some(41.0), Some(0.0)]);
        assert_eq!(report.all_missing_columns().collect::<Vec<_>>(), vec!["Recovery"]);
    }
}
