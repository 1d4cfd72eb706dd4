use std::time::Duration;

use tokio::time::Instant;

use crate::config::{ERROR_BANNER_TTL, SUCCESS_BANNER_TTL};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    Preview,
    Analyze,
    Report,
}

impl Workflow {
    pub fn name(&self) -> &'static str {
        match self {
            Workflow::Preview => "preview",
            Workflow::Analyze => "analyze",
            Workflow::Report => "report",
        }
    }

    pub fn loading_message(&self) -> &'static str {
        match self {
            Workflow::Preview => "Caricamento file in corso...",
            Workflow::Analyze => "Analisi in corso...",
            Workflow::Report => "Generazione report PDF in corso...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Workflow::Preview => "File caricato con successo!",
            Workflow::Analyze => "Analisi completata con successo!",
            Workflow::Report => "Report PDF generato e scaricato con successo!",
        }
    }

    fn error_prefix(&self) -> &'static str {
        match self {
            Workflow::Preview => "Errore nel caricamento",
            Workflow::Analyze => "Errore nell'analisi",
            Workflow::Report => "Errore nella generazione del report",
        }
    }

    fn fallback_detail(&self) -> &'static str {
        match self {
            Workflow::Preview => "Errore nel caricamento del file",
            Workflow::Analyze => "Errore nell'analisi",
            Workflow::Report => "Errore nella generazione del report",
        }
    }

    /// Banner text for a failure of this workflow. Client-side rejections
    /// keep their own wording; everything else is prefixed and falls back to
    /// the generic text when the service gave no detail.
    pub fn error_message(&self, err: &AppError) -> String {
        if err.is_client_side() {
            return err.to_string();
        }
        let detail = err.detail().unwrap_or(self.fallback_detail());
        format!("{}: {}", self.error_prefix(), detail)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl WorkflowState {
    pub fn is_settled(&self) -> bool {
        matches!(self, WorkflowState::Success | WorkflowState::Error(_))
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    state: WorkflowState,
    // settled states fall back to Idle once their banner would be gone
    idle_at: Option<Instant>,
}

/// Independent state per workflow; they share nothing but the board.
#[derive(Debug, Clone, Default)]
pub struct WorkflowBoard {
    preview: Slot,
    analyze: Slot,
    report: Slot,
}

impl WorkflowBoard {
    pub fn state(&self, workflow: Workflow) -> &WorkflowState {
        &self.slot(workflow).state
    }

    pub fn start(&mut self, workflow: Workflow) {
        self.set(workflow, WorkflowState::Loading, None);
    }

    pub fn succeed(&mut self, workflow: Workflow) {
        self.set(workflow, WorkflowState::Success, Some(SUCCESS_BANNER_TTL));
    }

    pub fn fail(&mut self, workflow: Workflow, message: impl Into<String>) {
        self.set(workflow, WorkflowState::Error(message.into()), Some(ERROR_BANNER_TTL));
    }

    /// Returns settled workflows to `Idle` once their hold time passed.
    pub fn settle(&mut self, now: Instant) {
        for workflow in [Workflow::Preview, Workflow::Analyze, Workflow::Report] {
            let slot = self.slot_mut(workflow);
            if slot.state.is_settled() && slot.idle_at.is_some_and(|at| now >= at) {
                *slot = Slot::default();
            }
        }
    }

    fn set(&mut self, workflow: Workflow, state: WorkflowState, hold: Option<Duration>) {
        let slot = self.slot_mut(workflow);
        slot.state = state;
        slot.idle_at = hold.map(|hold| Instant::now() + hold);
    }

    fn slot(&self, workflow: Workflow) -> &Slot {
        match workflow {
            Workflow::Preview => &self.preview,
            Workflow::Analyze => &self.analyze,
            Workflow::Report => &self.report,
        }
    }

    fn slot_mut(&mut self, workflow: Workflow) -> &mut Slot {
        match workflow {
            Workflow::Preview => &mut self.preview,
            Workflow::Analyze => &mut self.analyze,
            Workflow::Report => &mut self.report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_detail_is_prefixed() {
        let err = AppError::Service { status: 500, detail: Some("foglio vuoto".into()) };
        assert_eq!(
            Workflow::Analyze.error_message(&err),
            "Errore nell'analisi: foglio vuoto"
        );
    }

    #[test]
    fn missing_detail_falls_back_per_workflow() {
        let err = AppError::Service { status: 502, detail: None };
        assert_eq!(
            Workflow::Preview.error_message(&err),
            "Errore nel caricamento: Errore nel caricamento del file"
        );
        let err = AppError::Transport("connection refused".into());
        assert_eq!(
            Workflow::Report.error_message(&err),
            "Errore nella generazione del report: Errore nella generazione del report"
        );
    }

    #[test]
    fn client_side_rejections_are_not_prefixed() {
        assert_eq!(
            Workflow::Analyze.error_message(&AppError::NoFileSelected),
            "Nessun file selezionato"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn settled_states_return_to_idle() {
        let mut board = WorkflowBoard::default();
        board.start(Workflow::Report);
        board.succeed(Workflow::Preview);
        board.fail(Workflow::Analyze, "x");

        tokio::time::advance(SUCCESS_BANNER_TTL).await;
        board.settle(Instant::now());
        assert_eq!(board.state(Workflow::Preview), &WorkflowState::Idle);
        assert!(matches!(board.state(Workflow::Analyze), WorkflowState::Error(_)));
        assert_eq!(board.state(Workflow::Report), &WorkflowState::Loading);

        tokio::time::advance(ERROR_BANNER_TTL).await;
        board.settle(Instant::now());
        assert_eq!(board.state(Workflow::Analyze), &WorkflowState::Idle);
        assert_eq!(board.state(Workflow::Report), &WorkflowState::Loading);
    }
}
