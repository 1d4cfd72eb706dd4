use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Il file deve essere in formato Excel (.xlsx o .xls)")]
    InvalidExtension,

    #[error("Il file è troppo grande. Dimensione massima: {}", size_label(.limit))]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Nessun file selezionato")]
    NoFileSelected,

    #[error("Service returned {status}: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Service { status: u16, detail: Option<String> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whole MB above one megabyte, KB below; both rounded up.
fn size_label(bytes: &u64) -> String {
    let bytes = *bytes;
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes >= MB {
        format!("{}MB", bytes.div_ceil(MB))
    } else {
        format!("{}KB", bytes.div_ceil(KB))
    }
}

impl AppError {
    /// True for rejections raised before any request is sent.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            AppError::InvalidExtension | AppError::FileTooLarge { .. } | AppError::NoFileSelected
        )
    }

    /// Server supplied `detail`, if the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AppError::Service { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}
