use std::path::Path;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::AppError;

const EXCEL_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// The spreadsheet the user picked. Never mutated once accepted.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    content: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn mime_type(&self) -> &'static str {
        if self.name.to_lowercase().ends_with(".xls") {
            "application/vnd.ms-excel"
        } else {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        }
    }
}

pub fn has_excel_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    EXCEL_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Extension first, then size. The limit itself is accepted.
pub fn validate(name: &str, size: u64, limit: u64) -> Result<(), AppError> {
    if !has_excel_extension(name) {
        warn!("Rejected {}: not an Excel file", name);
        return Err(AppError::InvalidExtension);
    }
    if size > limit {
        warn!("Rejected {}: {} bytes exceeds limit of {}", name, size, limit);
        return Err(AppError::FileTooLarge { size, limit });
    }
    Ok(())
}

/// Validates from filesystem metadata before reading any content.
pub async fn load_from_path(path: &Path, limit: u64) -> Result<SelectedFile, AppError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let metadata = tokio::fs::metadata(path).await?;
    validate(&name, metadata.len(), limit)?;

    let content = tokio::fs::read(path).await?;
    debug!("Read {} ({} bytes)", name, content.len());

    // the file may have grown between stat and read
    validate(&name, content.len() as u64, limit)?;
    Ok(SelectedFile::new(name, content))
}
