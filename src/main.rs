use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use statly_client::config::PROBE_GRACE;
use statly_client::controller::{BannerKind, Workflow, WorkflowState};
use statly_client::view::{html, ViewState};
use statly_client::{logging, Config, UiController};

#[derive(Debug, Parser)]
#[command(name = "statly_client", about = "Upload an Excel file to the Statly service and fetch its analysis")]
struct Args {
    /// Excel file (.xlsx or .xls) to upload
    file: PathBuf,

    /// Run the statistical analysis after the preview
    #[arg(long)]
    analyze: bool,

    /// Generate and download the PDF report
    #[arg(long)]
    report: bool,

    /// Write the rendered preview/analysis as a standalone HTML page
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,

    /// Save chart images as PNG files in the download directory
    #[arg(long)]
    charts: bool,

    /// Override STATLY_API_BASE_URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Override STATLY_DOWNLOAD_DIR
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    logging::init_logging()?;

    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(url) = args.api_url.clone() {
        config = config.with_base_url(url);
    }
    if let Some(dir) = args.out_dir.clone() {
        config = config.with_download_dir(dir);
    }
    tracing::info!("Using Analysis Service at {}", config.api_base_url);

    let controller = Arc::new(UiController::new(config)?);
    let probe = controller.spawn_connection_check();

    let mut printed_until = tokio::time::Instant::now();
    let mut failed = controller.open_path(&args.file).await.is_err();
    print_banners(&controller.view(), &mut printed_until);

    // analysis and report only make sense once a file is held
    if controller.session().has_file() {
        if let Some(details) = &controller.view().file_details {
            println!("File:      {}", details.filename);
            println!("Righe:     {}", details.rows);
            println!("Colonne:   {} ({})", details.columns, details.column_names);
            println!("Mancanti:  {}", details.missing_values);
        }

        if args.analyze {
            failed |= controller.analyze().await.is_err();
            let view = controller.view();
            print_banners(&view, &mut printed_until);
            print_analysis(&view);
        }

        if args.charts && !failed {
            match controller.export_charts() {
                Ok(paths) => paths.iter().for_each(|p| println!("Grafico salvato: {}", p.display())),
                Err(e) => {
                    tracing::error!("Failed to export charts: {}", e);
                    failed = true;
                }
            }
        }

        if args.report {
            match controller.generate_report().await {
                Ok(path) => println!("Report salvato: {}", path.display()),
                Err(_) => failed = true,
            }
            print_banners(&controller.view(), &mut printed_until);
        }
    }

    if let Some(path) = &args.html {
        std::fs::write(path, html::page(&controller.view()))?;
        println!("Pagina HTML: {}", path.display());
    }

    // the workflows are done; give the check its chance to report
    let limit = controller.config().probe_delay + PROBE_GRACE;
    if let Some(false) = UiController::await_connection_check(probe, limit).await {
        print_banners(&controller.view(), &mut printed_until);
    }

    let view = controller.view();
    for workflow in [Workflow::Preview, Workflow::Analyze, Workflow::Report] {
        tracing::debug!("{} state: {:?}", workflow.name(), view.workflows.state(workflow));
        if matches!(view.workflows.state(workflow), WorkflowState::Error(_)) {
            failed = true;
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Prints banners raised since the previous call.
fn print_banners(view: &ViewState, since: &mut tokio::time::Instant) {
    let now = tokio::time::Instant::now();
    for banner in view.notifications.visible(now) {
        if banner.shown_at < *since {
            continue;
        }
        let tag = match banner.kind {
            BannerKind::Error => "ERRORE",
            BannerKind::Success => "OK",
            BannerKind::Warning => "ATTENZIONE",
        };
        println!("[{}] {}", tag, banner.message);
    }
    *since = now;
}

fn print_analysis(view: &ViewState) {
    let Some(stats) = &view.stats else {
        return;
    };
    println!("Totale Righe:    {}", stats.total_rows);
    println!("Totale Colonne:  {}", stats.total_columns);
    println!("Memoria:         {}", stats.memory_usage);
    println!("Valori Mancanti: {}", stats.missing_values);
    for chart in &view.charts {
        println!("  - {}", chart.title);
    }
}
