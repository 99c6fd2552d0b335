//! Presentation adapter: projects a [`WorkflowRun`] onto a view model.
//!
//! [`render`] is pure; feeding it the same snapshot twice yields the same
//! [`ViewModel`]. Front ends re-render from every notification instead of
//! tracking state of their own.

use serde::Serialize;

use crate::ledger::{StepName, StepStatus};
use crate::types::{FailureKind, RunState, WorkflowRun};

/// Visual indicator of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Not started.
    Dimmed,
    /// Running.
    Spinner,
    /// Finished.
    Checkmark,
    /// Failed.
    ErrorMark,
}

impl From<StepStatus> for Indicator {
    fn from(status: StepStatus) -> Self {
        match status {
            StepStatus::Pending => Self::Dimmed,
            StepStatus::Active => Self::Spinner,
            StepStatus::Done => Self::Checkmark,
            StepStatus::Failed => Self::ErrorMark,
        }
    }
}

/// One row of the step list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// Step identifier.
    pub name: StepName,
    /// Human-readable label.
    pub label: &'static str,
    /// How the step is drawn.
    pub indicator: Indicator,
}

/// Preview of a generated store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewBlock {
    /// Hero image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Store name, or product title when none was generated.
    pub title: String,
    /// Product price.
    pub price: String,
}

/// Failure details with the retry affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBlock {
    /// What went wrong.
    pub kind: FailureKind,
    /// User-facing message.
    pub message: String,
    /// Step that failed.
    pub failed_step: StepName,
    /// Whether a retry control should be offered.
    pub retry_available: bool,
}

/// Everything a front end needs to draw a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    /// Run being shown.
    pub run_id: u64,
    /// Input URL.
    pub input_url: String,
    /// Coarse state.
    pub state: RunState,
    /// Step list in pipeline order.
    pub steps: Vec<StepView>,
    /// Present once the run succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewBlock>,
    /// Present once the run failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBlock>,
}

/// Project `run` onto a [`ViewModel`].
#[must_use]
pub fn render(run: &WorkflowRun) -> ViewModel {
    let steps = run
        .ledger
        .steps()
        .iter()
        .map(|step| StepView {
            name: step.name,
            label: step.name.label(),
            indicator: step.status.into(),
        })
        .collect();

    let preview = run.result.as_ref().map(|bundle| PreviewBlock {
        image: bundle.hero_image().map(str::to_string),
        title: bundle.display_title().to_string(),
        price: bundle.product().price.clone(),
    });

    let error = run.error.as_ref().map(|err| ErrorBlock {
        kind: err.kind,
        message: err.message.clone(),
        failed_step: err.failed_step,
        retry_available: err.retryable,
    });

    ViewModel {
        run_id: run.id,
        input_url: run.input_url.clone(),
        state: run.state(),
        steps,
        preview,
        error,
    }
}
