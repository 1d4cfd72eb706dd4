//! Wire models for the Analysis Service responses.
//!
//! Only the fields the client renders are required; everything the service
//! adds on top is optional so a leaner backend still decodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub type PreviewRow = Map<String, Value>;

/// `POST /upload-excel`
#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub success: Option<bool>,
    pub filename: String,
    pub rows: u64,
    pub columns: u64,
    #[serde(deserialize_with = "labels_as_strings")]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub data_types: BTreeMap<String, String>,
    #[serde(default)]
    pub preview: Vec<PreviewRow>,
    #[serde(default)]
    pub has_missing_values: bool,
}

/// `POST /analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub filename: Option<String>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub column_types: Option<ColumnTypes>,
    pub basic_statistics: BasicStatistics,
    #[serde(default)]
    pub plots: Plots,
    #[serde(default)]
    pub analysis_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnTypes {
    #[serde(default)]
    pub numeric: Vec<String>,
    #[serde(default)]
    pub categorical: Vec<String>,
    #[serde(default)]
    pub datetime: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasicStatistics {
    pub dataset_info: DatasetInfo,
    #[serde(default)]
    pub numeric_summary: BTreeMap<String, NumericSummary>,
    #[serde(default)]
    pub categorical_summary: BTreeMap<String, CategoricalSummary>,
    #[serde(default)]
    pub correlations: BTreeMap<String, BTreeMap<String, Option<f64>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetInfo {
    pub total_rows: u64,
    pub total_columns: u64,
    #[serde(default)]
    pub missing_values: BTreeMap<String, u64>,
    pub memory_usage: String,
}

impl DatasetInfo {
    pub fn total_missing(&self) -> u64 {
        self.missing_values.values().sum()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NumericSummary {
    pub count: u64,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoricalSummary {
    pub unique_values: u64,
    #[serde(default)]
    pub most_frequent: Option<Value>,
    #[serde(default)]
    pub value_counts: BTreeMap<String, u64>,
}

/// Base64 PNG payloads. List entries may be `null` and must be skipped
/// without shifting the index of the entries after them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Plots {
    #[serde(default)]
    pub distributions: Vec<Option<String>>,
    #[serde(default)]
    pub correlation_heatmap: Option<String>,
    #[serde(default)]
    pub time_series: Vec<Option<String>>,
    #[serde(default)]
    pub categorical: Vec<Option<String>>,
}

/// Body of any non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Non-empty string `detail`; structured details are not shown.
    pub fn into_detail(self) -> Option<String> {
        match self.detail {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

// pandas happily emits numeric column labels
fn labels_as_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_response_tolerates_missing_optional_fields() {
        let meta: FileMetadata = serde_json::from_value(json!({
            "filename": "sales.xlsx",
            "rows": 3,
            "columns": 2,
            "column_names": ["A", 2020],
        }))
        .unwrap();

        assert_eq!(meta.column_names, vec!["A", "2020"]);
        assert!(meta.preview.is_empty());
        assert!(!meta.has_missing_values);
    }

    #[test]
    fn analysis_keeps_null_plot_positions() {
        let response: AnalyzeResponse = serde_json::from_value(json!({
            "success": true,
            "analysis": {
                "basic_statistics": {
                    "dataset_info": {
                        "total_rows": 10,
                        "total_columns": 2,
                        "missing_values": {"A": 1, "B": 4},
                        "memory_usage": "1.20 KB"
                    },
                    "numeric_summary": {
                        "A": {"count": 9, "mean": 1.5, "std": null, "min": 1.0,
                              "25%": 1.0, "50%": 1.5, "75%": 2.0, "max": 2.0}
                    }
                },
                "plots": {"distributions": ["aGk=", null, "aGk="], "correlation_heatmap": null}
            }
        }))
        .unwrap();

        let analysis = response.analysis;
        assert_eq!(analysis.basic_statistics.dataset_info.total_missing(), 5);
        assert_eq!(analysis.plots.distributions.len(), 3);
        assert!(analysis.plots.distributions[1].is_none());
        assert!(analysis.plots.time_series.is_empty());
        assert_eq!(analysis.basic_statistics.numeric_summary["A"].p50, Some(1.5));
    }

    #[test]
    fn error_body_only_yields_string_details() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "bad sheet"})).unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("bad sheet"));

        let body: ErrorBody = serde_json::from_value(json!({"detail": [{"loc": ["file"]}]})).unwrap();
        assert_eq!(body.into_detail(), None);

        let body: ErrorBody = serde_json::from_value(json!({"detail": ""})).unwrap();
        assert_eq!(body.into_detail(), None);
    }
}
