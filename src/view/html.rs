//! HTML rendering of the view-models. Every interpolated value goes through
//! [`escape`]; chart payloads are additionally restricted to the base64
//! alphabet before landing in a `src` attribute.

use crate::view::preview::{FileDetailsView, PreviewTable};
use crate::view::results::{ChartView, StatsSummaryView};
use crate::view::ViewState;

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_base64(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'\n' | b'\r'))
}

fn detail_item(label: &str, value: &str) -> String {
    format!(
        r#"<div class="detail-item"><span class="detail-label">{}</span><span class="detail-value">{}</span></div>"#,
        escape(label),
        escape(value)
    )
}

pub fn preview_table(table: &PreviewTable) -> String {
    let mut html = String::from(r#"<table class="preview-table"><thead><tr>"#);
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", escape(header)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

pub fn file_details(view: &FileDetailsView) -> String {
    let mut html = String::new();
    html.push_str(&detail_item("📁 Nome File:", &view.filename));
    html.push_str(&detail_item("📊 Righe:", &view.rows));
    html.push_str(&detail_item("📋 Colonne:", &view.columns));
    html.push_str(&detail_item("🏷️ Nomi Colonne:", &view.column_names));
    html.push_str(&detail_item("❓ Valori Mancanti:", &view.missing_values));

    if !view.data_types.is_empty() {
        let types = view
            .data_types
            .iter()
            .map(|(col, ty)| format!("{col}: {ty}"))
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&detail_item("🔤 Tipi di Dato:", &types));
    }

    if let Some(table) = &view.preview {
        html.push_str(&format!(
            r#"<div class="detail-item preview"><span class="detail-label">👀 Anteprima Dati (prime {} righe):</span>{}</div>"#,
            table.rows.len(),
            preview_table(table)
        ));
    }
    html
}

pub fn stats_summary(view: &StatsSummaryView) -> String {
    let card = |title: &str, value: &str| {
        format!(
            r#"<div class="stat-card"><h4>{}</h4><div class="stat-value">{}</div></div>"#,
            escape(title),
            escape(value)
        )
    };

    let mut html = String::new();
    html.push_str(&card("Totale Righe", &view.total_rows));
    html.push_str(&card("Totale Colonne", &view.total_columns));
    html.push_str(&card("Memoria", &view.memory_usage));
    html.push_str(&card("Valori Mancanti", &view.missing_values));

    if !view.numeric.is_empty() {
        html.push_str(
            r#"<table class="numeric-summary"><thead><tr><th>Variabile</th><th>N</th><th>Media</th><th>Dev. Std</th><th>Min</th><th>Mediana</th><th>Max</th></tr></thead><tbody>"#,
        );
        for row in &view.numeric {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&row.column),
                escape(&row.count),
                escape(&row.mean),
                escape(&row.std),
                escape(&row.min),
                escape(&row.median),
                escape(&row.max)
            ));
        }
        html.push_str("</tbody></table>");
    }
    if let Some(at) = &view.analyzed_at {
        html.push_str(&format!(r#"<p class="analyzed-at">Analisi del {}</p>"#, escape(at)));
    }
    html
}

pub fn chart(chart: &ChartView) -> String {
    let src = if is_base64(&chart.png_base64) {
        chart.data_url()
    } else {
        tracing::warn!("Chart '{}' payload is not base64, dropping image", chart.title);
        String::new()
    };
    format!(
        r#"<div class="chart-item"><div class="chart-title">{}</div><img src="{}" alt="{}"></div>"#,
        escape(&chart.title),
        escape(&src),
        escape(&chart.alt)
    )
}

pub fn charts(charts: &[ChartView]) -> String {
    charts.iter().map(chart).collect()
}

/// Standalone document for the current view.
pub fn page(view: &ViewState) -> String {
    let mut body = String::new();
    if let Some(details) = &view.file_details {
        body.push_str(&format!(
            r#"<section id="fileInfoSection"><h2>Informazioni File</h2><div id="fileDetails">{}</div></section>"#,
            file_details(details)
        ));
    }
    if let Some(stats) = &view.stats {
        body.push_str(&format!(
            r#"<section id="resultsSection"><h2>Risultati Analisi</h2><div id="statsSummary">{}</div><div id="chartsContainer">{}</div></section>"#,
            stats_summary(stats),
            charts(&view.charts)
        ));
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="it">
<head>
<meta charset="utf-8">
<title>Statly</title>
<style>{}</style>
</head>
<body>
{}
</body>
</html>
"#,
        STYLE, body
    )
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; color: #222; }
.detail-item { display: flex; gap: .5rem; margin: .25rem 0; }
.detail-item.preview { flex-direction: column; }
.detail-label { font-weight: bold; }
table { border-collapse: collapse; font-size: .9rem; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background: #f8f9fa; }
.stat-card { display: inline-block; padding: 1rem; margin: .5rem; border: 1px solid #ddd; }
.chart-item { margin: 1rem 0; }
.chart-item img { max-width: 100%; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::results::ChartKind;

    #[test]
    fn table_has_one_header_row_and_escaped_cells() {
        let table = PreviewTable {
            headers: vec!["A".into(), "<B>".into()],
            rows: vec![vec!["1".into(), "-".into()]],
        };

        let html = preview_table(&table);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(html.contains("<th>A</th><th>&lt;B&gt;</th>"));
        assert!(html.contains("<td>1</td><td>-</td>"));
    }

    #[test]
    fn non_base64_chart_payload_is_not_emitted() {
        let chart_view = ChartView {
            kind: ChartKind::Correlation,
            index: None,
            title: "Matrice di Correlazione".into(),
            alt: "Matrice di correlazione".into(),
            png_base64: "\" onerror=\"alert(1)".into(),
        };

        let html = chart(&chart_view);
        assert!(html.contains(r#"<img src="""#));
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn empty_view_renders_a_bare_page() {
        let html = page(&ViewState::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("fileInfoSection"));
    }
}
