//! CSV ingest: source text → `RawTable` restricted to an allow-list.
//!
//! Design goals:
//! - **Strict schema**: every requested column must exist in the header
//! - **Order preserving**: rows come out in source order, columns in
//!   allow-list order
//! - **No interpretation**: cells stay text; typing is the cleaners' job

use std::collections::HashMap;

use csv::StringRecord;
use tracing::info;

use crate::domain::RawTable;
use crate::error::AppError;
use crate::io::source::SourceReader;

/// Load one dataset from one or more locators, appending rows in locator
/// order.
pub fn load_table(reader: &SourceReader, locators: &[String], columns: &[String]) -> Result<RawTable, AppError> {
    if locators.is_empty() {
        return Err(AppError::usage("No source locator given."));
    }

    let mut table = RawTable::new(columns.to_vec());
    for locator in locators {
        let text = reader.read(locator)?;
        let part = parse_csv(&text, Some(columns))
            .map_err(|e| AppError::new(e.kind(), format!("{locator}: {}", e.message())))?;
        info!(source = %locator, rows = part.len(), "loaded source");
        table
            .append(part)
            .map_err(|e| AppError::new(e.kind(), format!("{locator}: {}", e.message())))?;
    }
    Ok(table)
}

/// Parse CSV text. With `columns`, keep exactly those columns in that order;
/// without, keep every column.
pub fn parse_csv(text: &str, columns: Option<&[String]>) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::source_unavailable(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let (names, indices): (Vec<String>, Vec<usize>) = match columns {
        Some(wanted) => {
            let missing: Vec<&str> = wanted
                .iter()
                .filter(|c| !header_map.contains_key(c.as_str()))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(AppError::schema_mismatch(format!(
                    "Missing required column(s): {}",
                    missing.iter().map(|c| format!("`{c}`")).collect::<Vec<_>>().join(", ")
                )));
            }
            let indices = wanted.iter().map(|c| header_map[c.as_str()]).collect();
            (wanted.to_vec(), indices)
        }
        None => {
            let names: Vec<String> = headers.iter().map(normalize_header_name).collect();
            let indices = (0..names.len()).collect();
            (names, indices)
        }
    };

    let mut table = RawTable::new(names);
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::source_unavailable(format!("CSV parse error on line {line}: {e}")))?;
        table.rows.push(select(&record, &indices));
    }

    Ok(table)
}

fn select(record: &StringRecord, indices: &[usize]) -> Vec<String> {
    // Short rows (flexible CSV) yield empty cells.
    indices
        .iter()
        .map(|&i| record.get(i).unwrap_or("").to_string())
        .collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on repeated header names.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_allow_listed_columns_in_order() {
        let text = "date,extra,Deep,REM\n2024-01-01,x,60,90\n2024-01-02,y,,100\n";
        let table = parse_csv(text, Some(&cols(&["date", "REM", "Deep"]))).unwrap();
        assert_eq!(table.headers, cols(&["date", "REM", "Deep"]));
        assert_eq!(table.rows[0], cols(&["2024-01-01", "90", "60"]));
        assert_eq!(table.rows[1], cols(&["2024-01-02", "100", ""]));
    }

    #[test]
    fn strips_bom_and_whitespace_from_headers() {
        let text = "\u{feff}date , Deep\n2024-01-01,1\n";
        let table = parse_csv(text, Some(&cols(&["date", "Deep"]))).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let err = parse_csv("date,Deep\n2024-01-01,1\n", Some(&cols(&["date", "REM"]))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
        assert!(err.message().contains("`REM`"));
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let table = parse_csv("date,a,b\n2024-01-01,1\n", Some(&cols(&["date", "b"]))).unwrap();
        assert_eq!(table.rows[0], cols(&["2024-01-01", ""]));
    }

    #[test]
    fn without_allow_list_keeps_everything() {
        let table = parse_csv("a,b,c\n1,2,3\n", None).unwrap();
        assert_eq!(table.headers, cols(&["a", "b", "c"]));
        assert_eq!(table.rows[0], cols(&["1", "2", "3"]));
    }

    #[test]
    fn multiple_locators_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, "date,x\n2024-01-01,1\n").unwrap();
        std::fs::write(&b, "x,date\n2,2024-01-02\n").unwrap();

        let reader = SourceReader::new(std::time::Duration::from_secs(1)).unwrap();
        let locators = vec![a.display().to_string(), b.display().to_string()];
        let table = load_table(&reader, &locators, &cols(&["date", "x"])).unwrap();
        assert_eq!(table.rows, vec![cols(&["2024-01-01", "1"]), cols(&["2024-01-02", "2"])]);
    }
}
