//! In-memory tables passed between pipeline stages.
//!
//! - `RawTable`: loader output, string cells, columns in allow-list order
//! - `KeyedTable`: cleaner/joiner output, one unique `NaiveDate` per row

use chrono::NaiveDate;

use crate::error::AppError;

/// Untyped table as read from a delimited source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of one column, in row order.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).map(String::as_str).unwrap_or("")))
    }

    /// Append the rows of `other` (same headers, same order) after ours.
    ///
    /// Fails with `SchemaMismatch` and leaves `self` untouched if the headers
    /// differ.
    pub fn append(&mut self, other: RawTable) -> Result<(), AppError> {
        if self.headers != other.headers {
            return Err(AppError::schema_mismatch(format!(
                "Cannot append rows: columns [{}] do not match [{}].",
                other.headers.join(", "),
                self.headers.join(", ")
            )));
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}

/// Typed cells of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// An all-missing column of the same type.
    pub(crate) fn empty_like(&self, len: usize) -> ColumnData {
        match self {
            ColumnData::Numeric(_) => ColumnData::Numeric(vec![None; len]),
            ColumnData::Text(_) => ColumnData::Text(vec![None; len]),
        }
    }

    pub(crate) fn push_from(&mut self, other: &ColumnData, row: Option<usize>) {
        match (self, other) {
            (ColumnData::Numeric(dst), ColumnData::Numeric(src)) => {
                dst.push(row.and_then(|i| src[i]));
            }
            (ColumnData::Text(dst), ColumnData::Text(src)) => {
                dst.push(row.and_then(|i| src[i].clone()));
            }
            (ColumnData::Numeric(dst), ColumnData::Text(_)) => dst.push(None),
            (ColumnData::Text(dst), ColumnData::Numeric(_)) => dst.push(None),
        }
    }

    /// Render one cell for CSV output. Missing cells render as "".
    pub fn render(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(v) => v[row].map(format_number).unwrap_or_default(),
            ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }
}

/// A table keyed by a unique calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTable {
    pub keys: Vec<NaiveDate>,
    pub columns: Vec<Column>,
}

impl KeyedTable {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    pub fn row_of(&self, date: NaiveDate) -> Option<usize> {
        self.keys.iter().position(|k| *k == date)
    }

    /// Numeric value at (`date`, `column`), if both exist and the cell is present.
    pub fn value(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let row = self.row_of(date)?;
        self.numeric(column)?.get(row).copied().flatten()
    }
}

/// Shortest round-trippable rendering; integral values print without a
/// fractional part.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
