//! # nova-core
//!
//! Core functionality for nova - turn a marketplace product URL into a
//! generated store.
//!
//! This crate drives the multi-step generation workflow: it sequences the
//! remote calls, records each stage's progress on a step ledger, handles
//! partial failure with an explicit retry, and hands the finished bundle to
//! an export sink.
//!
//! ## Architecture
//!
//! - **Step Ledger**: fixed, ordered stage statuses with pure transition rules
//! - **Remote Client**: the analyze/enrich/build calls behind a trait
//! - **Orchestrator**: owns the live run, emits a snapshot per change
//! - **View**: projects a run snapshot onto a renderable view model
//! - **Export**: publishes succeeded bundles
//! - **Configuration**: API, generation and timing settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nova_core::{Config, HttpClient, Orchestrator, render};
//!
//! # async fn example() -> nova_core::Result<()> {
//! let config = Config::load()?;
//! let orchestrator = Orchestrator::new(HttpClient::from_config(&config)?)
//!     .with_options(config.generate.clone())
//!     .with_request_timeout(config.api.timeout())
//!     .with_finalize_delay(config.timing.finalize_delay());
//!
//! let outcome = orchestrator.start("https://aliexpress.com/item/123").await?;
//! if let Some(run) = outcome.run() {
//!     let view = render(run);
//!     if let Some(preview) = view.preview {
//!         println!("{} - {}", preview.title, preview.price);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Stage failures do not surface
//! as errors from [`Orchestrator::start`]; they end the run in `Failed` with
//! a [`WorkflowError`] attached:
//!
//! ```rust
//! use nova_core::{Error, StepName, WorkflowError, FailureKind};
//!
//! let err = Error::Timeout { stage: StepName::Enrich };
//! let failure = WorkflowError::from_error(StepName::Enrich, &err);
//! assert_eq!(failure.kind, FailureKind::Timeout);
//! ```

/// Remote client trait and HTTP implementation
pub mod client;
/// Configuration loading and environment overrides
pub mod config;
/// Error types and result aliases
pub mod error;
/// Export sinks for succeeded runs
pub mod export;
/// Step ledger and transition rules
pub mod ledger;
/// Workflow orchestration
pub mod orchestrator;
/// Core data types and structures
pub mod types;
/// Presentation adapter
pub mod view;

// Re-export commonly used types
pub use client::{HttpClient, RemoteClient};
pub use config::{ApiConfig, Config, Environment, TimingConfig};
pub use error::{Error, Result};
pub use export::{BundleSink, ExportReceipt, FileExporter};
pub use ledger::{STEP_COUNT, Step, StepLedger, StepName, StepStatus};
pub use orchestrator::{Orchestrator, RunEvent, RunObserver, RunOutcome, RunReport};
pub use types::*;
pub use view::{ErrorBlock, Indicator, PreviewBlock, StepView, ViewModel, render};
