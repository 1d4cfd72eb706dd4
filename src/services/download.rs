use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::AppError;

pub const REPORT_PREFIX: &str = "statly_report_";

/// Everything before the first `.` of the original name.
pub fn file_stem(original_name: &str) -> &str {
    original_name.split('.').next().unwrap_or(original_name)
}

pub fn report_file_name(original_name: &str) -> String {
    format!("{}{}.pdf", REPORT_PREFIX, file_stem(original_name))
}

/// Writes through a temp file in `dir` and renames it into place, so a
/// partial write never leaves a file under the final name. The temp file is
/// removed when persisting fails.
pub fn save_download(dir: &Path, file_name: &str, payload: &[u8]) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(payload)?;
    tmp.flush()?;

    let target = dir.join(file_name);
    tmp.persist(&target).map_err(|e| AppError::Io(e.error))?;
    info!("Saved {} ({} bytes)", target.display(), payload.len());
    Ok(target)
}

pub fn save_report(dir: &Path, original_name: &str, payload: &[u8]) -> Result<PathBuf, AppError> {
    save_download(dir, &report_file_name(original_name), payload)
}
