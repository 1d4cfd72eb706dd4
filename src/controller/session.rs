use std::path::PathBuf;

use crate::models::{AnalysisResult, FileMetadata};
use crate::services::SelectedFile;

/// Everything the controller knows about the current file. Results are
/// overwritten by each successful call, never merged.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub selected_file: Option<SelectedFile>,
    pub metadata: Option<FileMetadata>,
    pub analysis: Option<AnalysisResult>,
    pub last_report: Option<PathBuf>,
}

impl Session {
    pub fn has_file(&self) -> bool {
        self.selected_file.is_some()
    }
}
