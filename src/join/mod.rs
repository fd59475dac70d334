//! Combining date-keyed tables.
//!
//! Rows are matched on the date key. Output rows follow the left table's
//! order; an outer join appends right-only dates in right-table order.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Column, JoinKind, KeyedTable};
use crate::error::AppError;
use crate::io::export::KEY_COLUMN;

/// Key overlap between the two inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub left_rows: usize,
    pub right_rows: usize,
    pub shared: usize,
    pub left_only: usize,
    pub right_only: usize,
}

/// Join `left` and `right` on their date keys.
///
/// Fails with `DuplicateKeyError` if either side repeats a date and with
/// `SchemaMismatch` if the two sides share a column name.
pub fn join_tables(left: &KeyedTable, right: &KeyedTable, kind: JoinKind) -> Result<(KeyedTable, JoinStats), AppError> {
    let left_index = index_keys(left, "left")?;
    let right_index = index_keys(right, "right")?;
    check_column_names(left, right)?;

    let shared = left.keys.iter().filter(|k| right_index.contains_key(k)).count();
    let stats = JoinStats {
        left_rows: left.len(),
        right_rows: right.len(),
        shared,
        left_only: left.len() - shared,
        right_only: right.len() - shared,
    };

    // (key, row in left, row in right)
    let mut plan: Vec<(NaiveDate, Option<usize>, Option<usize>)> = Vec::new();
    for (i, key) in left.keys.iter().enumerate() {
        let r = right_index.get(key).copied();
        if r.is_some() || kind != JoinKind::Inner {
            plan.push((*key, Some(i), r));
        }
    }
    if kind == JoinKind::Outer {
        for (j, key) in right.keys.iter().enumerate() {
            if !left_index.contains_key(key) {
                plan.push((*key, None, Some(j)));
            }
        }
    }

    let mut columns: Vec<Column> = Vec::with_capacity(left.columns.len() + right.columns.len());
    for (side, table) in [(0, left), (1, right)] {
        for col in &table.columns {
            let mut data = col.data.empty_like(0);
            for (_, l, r) in &plan {
                let row = if side == 0 { *l } else { *r };
                data.push_from(&col.data, row);
            }
            columns.push(Column {
                name: col.name.clone(),
                data,
            });
        }
    }

    let keys = plan.into_iter().map(|(k, _, _)| k).collect();
    Ok((KeyedTable { keys, columns }, stats))
}

fn index_keys(table: &KeyedTable, side: &str) -> Result<HashMap<NaiveDate, usize>, AppError> {
    let mut index = HashMap::with_capacity(table.len());
    for (i, key) in table.keys.iter().enumerate() {
        if index.insert(*key, i).is_some() {
            return Err(AppError::duplicate_key(format!(
                "Cannot join: {side} table has more than one row for {key}."
            )));
        }
    }
    Ok(index)
}

fn check_column_names(left: &KeyedTable, right: &KeyedTable) -> Result<(), AppError> {
    let mut seen: HashSet<&str> = HashSet::from([KEY_COLUMN]);
    for name in left.column_names().chain(right.column_names()) {
        if !seen.insert(name) {
            return Err(AppError::schema_mismatch(format!(
                "Cannot join: column `{name}` appears more than once in the combined table."
            )));
        }
    }
    Ok(())
}
