//! Write the run summary as JSON.

use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::io::export::StagedOutput;
use crate::report::RunSummary;

/// Serialise `summary` into a staged file next to `path`.
pub fn stage_summary_json(path: &Path, summary: &RunSummary) -> Result<StagedOutput, AppError> {
    let mut staged = StagedOutput::create(path)
        .map_err(|e| AppError::io(format!("Summary JSON: {}", e.message())))?;

    serde_json::to_writer_pretty(staged.file_mut(), summary)
        .map_err(|e| AppError::io(format!("Failed to write summary JSON: {e}")))?;
    staged
        .file_mut()
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush summary JSON: {e}")))?;

    Ok(staged)
}
