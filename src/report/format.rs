//! Terminal formatting for run summaries.
//!
//! Kept apart from the pipeline so output changes stay local.

use crate::clean::{CleanReport, FillPolicy};
use crate::domain::{JoinKind, RawTable};
use crate::report::RunSummary;

pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== sleep-merge ===\n");
    out.push_str(&format!(
        "Sleep rows: {} | Training rows: {}\n",
        summary.sleep.rows, summary.training.rows
    ));
    out.push_str(&format!(
        "Dates: shared={} | sleep-only={} | training-only={}\n",
        summary.overlap.shared, summary.overlap.left_only, summary.overlap.right_only
    ));
    out.push_str(&format!(
        "Join: {} -> {} rows written to {}\n",
        join_label(summary.join),
        summary.combined_rows,
        summary.output.display()
    ));

    push_table_report(&mut out, &summary.sleep);
    push_table_report(&mut out, &summary.training);

    if let Some(stress) = &summary.training.stress {
        out.push_str(&format!(
            "\nStress imputation: by rule={} | by fallback={}\n",
            stress.by_rule, stress.by_fallback
        ));
    }

    out
}

fn push_table_report(out: &mut String, report: &CleanReport) {
    out.push_str(&format!("\n{} ({} filled):\n", report.dataset, report.total_filled()));
    out.push_str(&format!(
        "{:<14} {:<14} {:>8} {:>10}\n",
        "column", "policy", "filled", "malformed"
    ));
    for col in &report.columns {
        let policy = match col.policy {
            FillPolicy::Mean => "mean".to_string(),
            FillPolicy::Constant(v) => format!("constant {v}"),
            FillPolicy::StressLookup => "rule table".to_string(),
            FillPolicy::Passthrough => "passthrough".to_string(),
        };
        let note = if col.all_missing { "  (no values; left missing)" } else { "" };
        out.push_str(&format!(
            "{:<14} {:<14} {:>8} {:>10}{}\n",
            col.column, policy, col.filled, col.malformed, note
        ));
    }
}

fn join_label(kind: JoinKind) -> &'static str {
    match kind {
        JoinKind::Inner => "inner",
        JoinKind::Left => "left",
        JoinKind::Outer => "outer",
    }
}

/// Header listing and row count for `inspect`.
pub fn format_inspect(locator: &str, table: &RawTable) -> String {
    let mut out = format!("{locator}\n{} rows, {} columns\n", table.len(), table.headers.len());
    for (i, name) in table.headers.iter().enumerate() {
        out.push_str(&format!("  {:>3}  {name}\n", i + 1));
    }
    out
}
