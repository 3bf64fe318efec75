//! Local save of exported backlogs
//!
//! The exported body is staged in a temporary file inside the destination
//! directory and then persisted under `backlog_<epoch millis>.<ext>`. The
//! staging file is removed on drop if anything fails before the rename.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::ApiError;
use super::types::ExportFormat;

/// File name for an export taken at `epoch_millis`
pub fn export_file_name(format: ExportFormat, epoch_millis: i64) -> String {
    format!("backlog_{}.{}", epoch_millis, format.extension())
}

/// Save `body` into `dir` and return the final path
pub fn save_export(dir: &Path, format: ExportFormat, body: &[u8]) -> Result<PathBuf, ApiError> {
    save_export_at(dir, format, body, chrono::Utc::now().timestamp_millis())
}

/// Same as [`save_export`] with an explicit timestamp
pub fn save_export_at(
    dir: &Path,
    format: ExportFormat,
    body: &[u8],
    epoch_millis: i64,
) -> Result<PathBuf, ApiError> {
    std::fs::create_dir_all(dir)?;

    let mut staging = tempfile::Builder::new()
        .prefix(".backlog-export-")
        .tempfile_in(dir)?;
    staging.write_all(body)?;
    staging.flush()?;

    let target = dir.join(export_file_name(format, epoch_millis));
    staging.persist(&target).map_err(|e| ApiError::Io(e.error))?;

    tracing::debug!(path = %target.display(), bytes = body.len(), "Saved export");
    Ok(target)
}
