//! The UI controller: file intake, the three service workflows, and the
//! startup connectivity check, all reported through [`ViewState`].

pub mod loading;
pub mod notifications;
pub mod session;
pub mod workflow;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant as StdInstant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::services::{download, file_intake, AnalysisClient, SelectedFile};
use crate::view::{build_charts, FileDetailsView, StatsSummaryView, ViewState};

pub use loading::{LoadingOverlay, OverlaySnapshot};
pub use notifications::{Banner, BannerKind, NotificationCenter};
pub use session::Session;
pub use workflow::{Workflow, WorkflowBoard, WorkflowState};

pub struct UiController {
    config: Config,
    client: AnalysisClient,
    session: Mutex<Session>,
    view: Mutex<ViewState>,
    overlay: LoadingOverlay,
}

impl UiController {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = AnalysisClient::new(config.clone())?;
        Ok(Self {
            config,
            client,
            session: Mutex::new(Session::default()),
            view: Mutex::new(ViewState::default()),
            overlay: LoadingOverlay::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> ViewState {
        self.view.lock().clone()
    }

    pub fn session(&self) -> Session {
        self.session.lock().clone()
    }

    pub fn overlay(&self) -> &LoadingOverlay {
        &self.overlay
    }

    pub fn current_file(&self) -> Option<SelectedFile> {
        self.session.lock().selected_file.clone()
    }

    /// Expires banners and settles finished workflows.
    pub fn tick(&self) {
        let now = tokio::time::Instant::now();
        let mut view = self.view.lock();
        view.notifications.prune(now);
        view.workflows.settle(now);
    }

    // === file intake ===

    pub fn drag_over(&self) {
        self.view.lock().drag_over = true;
    }

    pub fn drag_leave(&self) {
        self.view.lock().drag_over = false;
    }

    /// Only the first dropped file is used. An empty drop does nothing.
    pub async fn drop_files(&self, paths: &[PathBuf]) -> Result<(), AppError> {
        self.drag_leave();
        match paths.first() {
            Some(path) => self.open_path(path).await,
            None => Ok(()),
        }
    }

    /// File picker result; the first entry wins, an empty pick is ignored.
    pub async fn select_files(&self, paths: &[PathBuf]) -> Result<(), AppError> {
        match paths.first() {
            Some(path) => self.open_path(path).await,
            None => Ok(()),
        }
    }

    pub async fn open_path(&self, path: &Path) -> Result<(), AppError> {
        match file_intake::load_from_path(path, self.config.max_file_size).await {
            Ok(file) => self.accept_file(file).await,
            Err(err) => {
                self.reject(Workflow::Preview, &err);
                Err(err)
            }
        }
    }

    /// Validates, makes `file` the current file and uploads it for preview.
    pub async fn accept_file(&self, file: SelectedFile) -> Result<(), AppError> {
        if let Err(err) = file_intake::validate(file.name(), file.size(), self.config.max_file_size) {
            self.reject(Workflow::Preview, &err);
            return Err(err);
        }

        self.session.lock().selected_file = Some(file.clone());
        self.upload_preview(&file).await
    }

    // === workflows ===

    pub async fn upload_preview(&self, file: &SelectedFile) -> Result<(), AppError> {
        let metadata = self
            .run(Workflow::Preview, self.client.upload_excel(file))
            .await?;

        let details = FileDetailsView::from_metadata(&metadata);
        self.session.lock().metadata = Some(metadata);
        {
            let mut view = self.view.lock();
            view.file_details = Some(details);
        }
        self.succeed(Workflow::Preview);
        Ok(())
    }

    pub async fn analyze(&self) -> Result<(), AppError> {
        let file = self.require_file(Workflow::Analyze)?;

        let response = self.run(Workflow::Analyze, self.client.analyze(&file)).await?;
        let analysis = response.analysis;

        let stats = StatsSummaryView::from_analysis(&analysis);
        let charts = build_charts(&analysis.plots);
        info!("Analysis rendered with {} charts", charts.len());

        self.session.lock().analysis = Some(analysis);
        {
            let mut view = self.view.lock();
            view.stats = Some(stats);
            view.charts = charts;
        }
        self.succeed(Workflow::Analyze);
        Ok(())
    }

    /// Requests the PDF and saves it as `statly_report_<stem>.pdf` in the
    /// download directory.
    pub async fn generate_report(&self) -> Result<PathBuf, AppError> {
        let file = self.require_file(Workflow::Report)?;
        let dir = self.config.download_dir.clone();

        let call = async {
            let payload = self.client.generate_report(&file).await?;
            download::save_report(&dir, file.name(), &payload)
        };
        let path = self.run(Workflow::Report, call).await?;

        self.session.lock().last_report = Some(path.clone());
        self.succeed(Workflow::Report);
        Ok(path)
    }

    /// Writes every rendered chart as a PNG next to the report.
    pub fn export_charts(&self) -> Result<Vec<PathBuf>, AppError> {
        let stem = self
            .current_file()
            .map(|f| download::file_stem(f.name()).to_string())
            .unwrap_or_else(|| "statly".to_string());
        let charts = self.view.lock().charts.clone();

        charts
            .iter()
            .map(|chart| {
                let png = chart.decode_png()?;
                download::save_download(&self.config.download_dir, &chart.file_name(&stem), &png)
            })
            .collect()
    }

    // === connectivity ===

    /// One probe of the service root; an unreachable or failing service
    /// leaves a persistent warning. Never retries.
    pub async fn check_connection(&self) -> bool {
        match self.client.probe().await {
            Ok(()) => {
                info!("API connection active at {}", self.client.base_url());
                true
            }
            Err(err) => {
                warn!("API not reachable at {}: {}", self.client.base_url(), err);
                self.view.lock().notifications.show_warning(format!(
                    "Backend non raggiungibile. Avvia il server backend su {}.",
                    self.client.base_url()
                ));
                false
            }
        }
    }

    /// Runs [`check_connection`](Self::check_connection) after the configured
    /// delay without holding up anything else.
    pub fn spawn_connection_check(self: &Arc<Self>) -> JoinHandle<bool> {
        let controller = Arc::clone(self);
        let delay = self.config.probe_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.check_connection().await
        })
    }

    /// Waits up to `limit` for a check started by
    /// [`spawn_connection_check`](Self::spawn_connection_check). `None` when
    /// it did not finish in time or the task died.
    pub async fn await_connection_check(handle: JoinHandle<bool>, limit: Duration) -> Option<bool> {
        match tokio::time::timeout(limit, handle).await {
            Ok(Ok(reachable)) => Some(reachable),
            Ok(Err(e)) => {
                warn!("Connection check task failed: {}", e);
                None
            }
            Err(_) => {
                warn!("Connection check still pending after {:?}", limit);
                None
            }
        }
    }

    // === helpers ===

    fn require_file(&self, workflow: Workflow) -> Result<SelectedFile, AppError> {
        self.current_file().ok_or_else(|| {
            let err = AppError::NoFileSelected;
            self.reject(workflow, &err);
            err
        })
    }

    /// Loading state and overlay around one service call. The overlay is
    /// released before this returns, on both paths.
    async fn run<T, F>(&self, workflow: Workflow, call: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        self.view.lock().workflows.start(workflow);
        let start = StdInstant::now();

        let outcome = {
            let _loading = self.overlay.begin(workflow.loading_message());
            call.await
        };

        match &outcome {
            Ok(_) => info!("{} finished in {:?}", workflow.name(), start.elapsed()),
            Err(err) => {
                error!("{} failed after {:?}: {}", workflow.name(), start.elapsed(), err);
                self.reject(workflow, err);
            }
        }
        outcome
    }

    fn reject(&self, workflow: Workflow, err: &AppError) {
        let message = workflow.error_message(err);
        let mut view = self.view.lock();
        view.notifications.show_error(message.clone());
        view.workflows.fail(workflow, message);
    }

    fn succeed(&self, workflow: Workflow) {
        let mut view = self.view.lock();
        view.notifications.show_success(workflow.success_message());
        view.workflows.succeed(workflow);
    }
}
