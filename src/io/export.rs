//! Export a date-keyed table to CSV.
//!
//! The file is staged next to the destination and renamed into place, so a
//! failed run leaves either the previous file or nothing, never a partial
//! one.

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::KeyedTable;
use crate::error::AppError;

/// Header name of the key column.
pub const KEY_COLUMN: &str = "date";

/// A fully written temp file waiting to be renamed onto its destination.
///
/// Dropping it without `persist` removes the temp file and leaves the
/// destination untouched.
#[derive(Debug)]
pub struct StagedOutput {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedOutput {
    /// Create the temp file in the destination's directory.
    pub fn create(target: &Path) -> Result<Self, AppError> {
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file = NamedTempFile::new_in(dir)
            .map_err(|e| AppError::io(format!("Failed to create output next to '{}': {e}", target.display())))?;
        Ok(Self {
            file,
            target: target.to_path_buf(),
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }

    /// Rename the temp file onto the destination.
    pub fn persist(self) -> Result<(), AppError> {
        let target = self.target;
        self.file
            .persist(&target)
            .map_err(|e| AppError::io(format!("Failed to write output '{}': {}", target.display(), e.error)))?;
        Ok(())
    }
}

/// Write `table` as CSV: `date` first (ISO `YYYY-MM-DD`), then every column
/// in table order. Missing cells are written as empty fields.
pub fn write_table_csv(path: &Path, table: &KeyedTable) -> Result<(), AppError> {
    stage_table_csv(path, table)?.persist()
}

/// Like `write_table_csv`, but stop before the rename.
pub fn stage_table_csv(path: &Path, table: &KeyedTable) -> Result<StagedOutput, AppError> {
    let mut staged = StagedOutput::create(path)?;

    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b',')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(staged.file_mut());

        let mut header = Vec::with_capacity(table.columns.len() + 1);
        header.push(KEY_COLUMN);
        header.extend(table.column_names());
        writer
            .write_record(&header)
            .map_err(|e| AppError::io(format!("Failed to write output header: {e}")))?;

        for (row, key) in table.keys.iter().enumerate() {
            let mut record = Vec::with_capacity(header.len());
            record.push(key.format("%Y-%m-%d").to_string());
            record.extend(table.columns.iter().map(|c| c.data.render(row)));
            writer
                .write_record(&record)
                .map_err(|e| AppError::io(format!("Failed to write output row for {key}: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| AppError::io(format!("Failed to flush output: {e}")))?;
    }

    Ok(staged)
}
