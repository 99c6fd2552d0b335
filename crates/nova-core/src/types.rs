//! Core data types for the generation pipeline.
//!
//! - [`ProductInfo`] / [`GeneratedContent`]: payloads returned by the remote
//!   analyze and enrich stages
//! - [`GenerateOptions`]: style and tone knobs forwarded to content generation
//! - [`ProductBundle`]: the merged, immutable result of a successful run
//! - [`WorkflowRun`]: one end-to-end attempt, as observed through snapshots
//! - [`WorkflowError`]: terminal failure of a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;
use crate::ledger::{StepLedger, StepName};

/// Default content style.
pub const DEFAULT_STYLE: &str = "modern";

/// Default content tone.
pub const DEFAULT_TONE: &str = "professional";

/// Product data scraped by the analyze stage.
///
/// Fields beyond `title`, `price` and `images` are kept in `extra` and sent
/// back verbatim to the enrich stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    /// Product title as listed by the marketplace.
    #[serde(default)]
    pub title: String,
    /// Display price, currency included (e.g. `"$9.99"`).
    #[serde(default)]
    pub price: String,
    /// Product image URLs, in listing order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Any other fields returned by the scraper.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Store content produced by the enrich stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    /// Generated store name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    /// Generated marketing copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_copy: Option<String>,
    /// Any other generated fields (taglines, sections, SEO data, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options forwarded to the enrich stage.
///
/// Missing keys fall back to [`DEFAULT_STYLE`] and [`DEFAULT_TONE`];
/// unrecognized keys are ignored when deserializing.
///
/// ```rust
/// use nova_core::GenerateOptions;
///
/// let opts: GenerateOptions = serde_json::from_str(r#"{"tone":"playful","color":"red"}"#)?;
/// assert_eq!(opts.style, "modern");
/// assert_eq!(opts.tone, "playful");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Visual/copy style (e.g. `"modern"`, `"minimal"`).
    pub style: String,
    /// Copy tone (e.g. `"professional"`, `"playful"`).
    pub tone: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            tone: DEFAULT_TONE.to_string(),
        }
    }
}

impl GenerateOptions {
    /// Override the style using builder pattern.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Override the tone using builder pattern.
    #[must_use]
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }
}

/// Combined scraped-product and generated-content result.
///
/// Immutable once constructed; read it through the accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBundle {
    product: ProductInfo,
    content: GeneratedContent,
}

impl ProductBundle {
    /// Merge the analyze and enrich responses.
    #[must_use]
    pub const fn merge(product: ProductInfo, content: GeneratedContent) -> Self {
        Self { product, content }
    }

    /// Scraped product data.
    #[must_use]
    pub const fn product(&self) -> &ProductInfo {
        &self.product
    }

    /// Generated store content.
    #[must_use]
    pub const fn content(&self) -> &GeneratedContent {
        &self.content
    }

    /// Title shown in previews: the generated store name, or the product
    /// title when no store name was generated.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.content
            .store_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.product.title)
    }

    /// First product image, used as the preview image.
    #[must_use]
    pub fn hero_image(&self) -> Option<&str> {
        self.product.images.first().map(String::as_str)
    }
}

/// Kind of terminal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Input rejected before any network call.
    Validation,
    /// Remote call failed (HTTP status, transport, malformed body).
    Remote,
    /// Remote call exceeded its timeout.
    Timeout,
}

/// Terminal failure of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowError {
    /// What went wrong.
    pub kind: FailureKind,
    /// User-facing message.
    pub message: String,
    /// Step that failed.
    pub failed_step: StepName,
    /// Whether restarting the run may succeed.
    pub retryable: bool,
}

impl WorkflowError {
    /// Describe `err` as the failure of `step`, the step that was running
    /// when it surfaced.
    #[must_use]
    pub fn from_error(step: StepName, err: &Error) -> Self {
        let kind = match err {
            Error::Validation(_) => FailureKind::Validation,
            Error::Timeout { .. } => FailureKind::Timeout,
            _ => FailureKind::Remote,
        };
        Self {
            kind,
            message: err.to_string(),
            failed_step: step,
            retryable: err.is_recoverable(),
        }
    }
}

/// Coarse state of a run, derived from its ledger and terminal fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Created, nothing started.
    Idle,
    /// Analyze stage in progress.
    Analyzing,
    /// Enrich stage in progress (or about to start).
    Enriching,
    /// Build stage in progress (or about to start).
    Building,
    /// Finalize stage in progress (or about to start).
    Finalizing,
    /// Terminal: bundle available.
    Succeeded,
    /// Terminal: error available.
    Failed,
}

impl RunState {
    const fn for_step(step: StepName) -> Self {
        match step {
            StepName::Analyze => Self::Analyzing,
            StepName::Enrich => Self::Enriching,
            StepName::Build => Self::Building,
            StepName::Finalize => Self::Finalizing,
        }
    }

    /// Whether the run has settled.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// One end-to-end attempt to turn a URL into a [`ProductBundle`].
///
/// Values of this type are snapshots: the orchestrator owns the live run and
/// hands out clones through notifications and [`current`](crate::Orchestrator::current).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    /// Monotonic run id; a newer run always has a larger id.
    pub id: u64,
    /// Trimmed input URL.
    pub input_url: String,
    /// When the run was triggered.
    pub started_at: DateTime<Utc>,
    /// Per-step statuses.
    #[serde(flatten)]
    pub ledger: StepLedger,
    /// Bundle, once the run succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ProductBundle>,
    /// Error, once the run failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WorkflowError>,
}

impl WorkflowRun {
    /// A fresh run with every step pending.
    #[must_use]
    pub fn new(id: u64, input_url: impl Into<String>) -> Self {
        Self {
            id,
            input_url: input_url.into(),
            started_at: Utc::now(),
            ledger: StepLedger::new(),
            result: None,
            error: None,
        }
    }

    /// Derived coarse state.
    ///
    /// Between completing one step and activating the next, the run reports
    /// the state of the upcoming step.
    #[must_use]
    pub fn state(&self) -> RunState {
        if self.error.is_some() {
            return RunState::Failed;
        }
        if self.result.is_some() {
            return RunState::Succeeded;
        }
        if let Some(active) = self.ledger.active() {
            return RunState::for_step(active);
        }
        if self.ledger.is_untouched() {
            return RunState::Idle;
        }
        self.ledger
            .steps()
            .iter()
            .find(|s| s.status == crate::StepStatus::Pending)
            .map_or(RunState::Finalizing, |s| RunState::for_step(s.name))
    }

    /// Whether the run has settled (result XOR error set).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }
}
