//! Structured presentation state. The controller mutates it; renderers
//! (terminal, [`html`]) only read it.

pub mod format;
pub mod html;
pub mod preview;
pub mod results;

use crate::controller::notifications::NotificationCenter;
use crate::controller::workflow::WorkflowBoard;

pub use preview::{FileDetailsView, PreviewTable};
pub use results::{build_charts, ChartKind, ChartView, StatsSummaryView};

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Drop-zone highlight while a drag hovers. Purely visual.
    pub drag_over: bool,
    pub file_details: Option<FileDetailsView>,
    pub stats: Option<StatsSummaryView>,
    pub charts: Vec<ChartView>,
    pub notifications: NotificationCenter,
    pub workflows: WorkflowBoard,
}

impl ViewState {
    pub fn file_info_visible(&self) -> bool {
        self.file_details.is_some()
    }

    pub fn results_visible(&self) -> bool {
        self.stats.is_some()
    }
}
