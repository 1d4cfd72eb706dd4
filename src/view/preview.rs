use serde_json::Value;

use crate::models::{FileMetadata, PreviewRow};
use crate::view::format;

pub const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PreviewTable {
    /// One column per reported name, in that order, whatever the row maps
    /// contain. Absent and null cells become `-`.
    pub fn build(rows: &[PreviewRow], column_names: &[String]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                column_names
                    .iter()
                    .map(|col| cell_text(row.get(col)))
                    .collect()
            })
            .collect();

        Self {
            headers: column_names.to_vec(),
            rows,
        }
    }
}

pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => EMPTY_CELL.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(other) => other.to_string(),
    }
}

// pandas sends whole floats as `3.0`; show them as `3`
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetailsView {
    pub filename: String,
    pub rows: String,
    pub columns: String,
    pub column_names: String,
    pub missing_values: String,
    pub data_types: Vec<(String, String)>,
    pub preview: Option<PreviewTable>,
}

impl FileDetailsView {
    pub fn from_metadata(meta: &FileMetadata) -> Self {
        let data_types = meta
            .column_names
            .iter()
            .filter_map(|col| meta.data_types.get(col).map(|t| (col.clone(), t.clone())))
            .collect();

        let preview = (!meta.preview.is_empty())
            .then(|| PreviewTable::build(&meta.preview, &meta.column_names));

        Self {
            filename: meta.filename.clone(),
            rows: format::thousands(meta.rows),
            columns: meta.columns.to_string(),
            column_names: meta.column_names.join(", "),
            missing_values: if meta.has_missing_values {
                "⚠️ Presenti".to_string()
            } else {
                "✅ Nessuno".to_string()
            },
            data_types,
            preview,
        }
    }
}
