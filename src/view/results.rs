use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::AppError;
use crate::models::{AnalysisResult, Plots};
use crate::view::format;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSummaryView {
    pub total_rows: String,
    pub total_columns: String,
    pub memory_usage: String,
    pub missing_values: String,
    pub analyzed_at: Option<String>,
    pub numeric: Vec<NumericSummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericSummaryRow {
    pub column: String,
    pub count: String,
    pub mean: String,
    pub std: String,
    pub min: String,
    pub median: String,
    pub max: String,
}

impl StatsSummaryView {
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        let stats = &analysis.basic_statistics;
        let info = &stats.dataset_info;

        let numeric = stats
            .numeric_summary
            .iter()
            .map(|(column, s)| NumericSummaryRow {
                column: column.clone(),
                count: format::thousands(s.count),
                mean: format::decimal(s.mean),
                std: format::decimal(s.std),
                min: format::decimal(s.min),
                median: format::decimal(s.p50),
                max: format::decimal(s.max),
            })
            .collect();

        Self {
            total_rows: format::thousands(info.total_rows),
            total_columns: info.total_columns.to_string(),
            memory_usage: info.memory_usage.clone(),
            missing_values: info.total_missing().to_string(),
            analyzed_at: analysis
                .analysis_timestamp
                .as_deref()
                .and_then(format::timestamp),
            numeric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Distribution,
    Correlation,
    TimeSeries,
    Categorical,
}

impl ChartKind {
    fn slug(&self) -> &'static str {
        match self {
            ChartKind::Distribution => "distribution",
            ChartKind::Correlation => "correlation",
            ChartKind::TimeSeries => "time_series",
            ChartKind::Categorical => "categorical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    pub kind: ChartKind,
    /// 1-based position in the service's list; `None` for the heatmap.
    pub index: Option<usize>,
    pub title: String,
    pub alt: String,
    pub png_base64: String,
}

impl ChartView {
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.png_base64)
    }

    pub fn decode_png(&self) -> Result<Vec<u8>, AppError> {
        STANDARD
            .decode(self.png_base64.trim())
            .map_err(|e| AppError::Decode(format!("Chart '{}' is not valid base64: {}", self.title, e)))
    }

    pub fn file_name(&self, stem: &str) -> String {
        match self.index {
            Some(n) => format!("{}_{}_{}.png", stem, self.kind.slug(), n),
            None => format!("{}_{}.png", stem, self.kind.slug()),
        }
    }
}

fn indexed_charts<'a>(
    kind: ChartKind,
    images: &'a [Option<String>],
    title: &str,
    alt: &str,
) -> impl Iterator<Item = ChartView> + 'a {
    let title = title.to_string();
    let alt = alt.to_string();
    images.iter().enumerate().filter_map(move |(i, image)| {
        let image = image.as_deref().filter(|s| !s.is_empty())?;
        let n = i + 1;
        Some(ChartView {
            kind,
            index: Some(n),
            title: format!("{} {}", title, n),
            alt: format!("{} {}", alt, n),
            png_base64: image.to_string(),
        })
    })
}

/// Distributions, heatmap, time series, categorical; in that order.
pub fn build_charts(plots: &Plots) -> Vec<ChartView> {
    let mut charts: Vec<ChartView> = indexed_charts(
        ChartKind::Distribution,
        &plots.distributions,
        "Distribuzione Variabile",
        "Grafico distribuzione",
    )
    .collect();

    if let Some(heatmap) = plots.correlation_heatmap.as_deref().filter(|s| !s.is_empty()) {
        charts.push(ChartView {
            kind: ChartKind::Correlation,
            index: None,
            title: "Matrice di Correlazione".to_string(),
            alt: "Matrice di correlazione".to_string(),
            png_base64: heatmap.to_string(),
        });
    }

    charts.extend(indexed_charts(
        ChartKind::TimeSeries,
        &plots.time_series,
        "Andamento Temporale",
        "Grafico temporale",
    ));
    charts.extend(indexed_charts(
        ChartKind::Categorical,
        &plots.categorical,
        "Distribuzione Categorica",
        "Grafico categorico",
    ));
    charts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_distributions_are_skipped_without_renumbering() {
        let plots: Plots = serde_json::from_value(json!({
            "distributions": ["aW1nMQ==", null, "aW1nMg=="]
        }))
        .unwrap();

        let charts = build_charts(&plots);
        let titles: Vec<_> = charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Distribuzione Variabile 1", "Distribuzione Variabile 3"]);
        assert_eq!(charts[1].alt, "Grafico distribuzione 3");
    }

    #[test]
    fn charts_come_in_category_order() {
        let plots = Plots {
            distributions: vec![Some("QQ==".into())],
            correlation_heatmap: Some("Qg==".into()),
            time_series: vec![Some(String::new()), Some("Qw==".into())],
            categorical: vec![Some("RA==".into())],
        };

        let charts = build_charts(&plots);
        let kinds: Vec<_> = charts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Distribution,
                ChartKind::Correlation,
                ChartKind::TimeSeries,
                ChartKind::Categorical
            ]
        );
        assert_eq!(charts[1].title, "Matrice di Correlazione");
        assert_eq!(charts[2].title, "Andamento Temporale 2");
        assert_eq!(charts[3].title, "Distribuzione Categorica 1");
    }

    #[test]
    fn chart_payload_decodes_and_names_itself() {
        let chart = ChartView {
            kind: ChartKind::TimeSeries,
            index: Some(2),
            title: "Andamento Temporale 2".into(),
            alt: "Grafico temporale 2".into(),
            png_base64: "iVBORw==".into(),
        };
        assert_eq!(chart.decode_png().unwrap(), vec![0x89, b'P', b'N', b'G']);
        assert_eq!(chart.data_url(), "data:image/png;base64,iVBORw==");
        assert_eq!(chart.file_name("sales"), "sales_time_series_2.png");

        let broken = ChartView { png_base64: "***".into(), ..chart };
        assert!(matches!(broken.decode_png(), Err(AppError::Decode(_))));
    }

    #[test]
    fn summary_sums_missing_values() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "basic_statistics": {
                "dataset_info": {
                    "total_rows": 4200, "total_columns": 3,
                    "missing_values": {"A": 2, "B": 0, "C": 5},
                    "memory_usage": "12.50 KB"
                }
            },
            "analysis_timestamp": "2024-05-01T10:20:30.5"
        }))
        .unwrap();

        let view = StatsSummaryView::from_analysis(&analysis);
        assert_eq!(view.total_rows, "4.200");
        assert_eq!(view.missing_values, "7");
        assert_eq!(view.memory_usage, "12.50 KB");
        assert_eq!(view.analyzed_at.as_deref(), Some("01/05/2024 10:20"));
    }
}
