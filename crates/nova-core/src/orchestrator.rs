//! Workflow orchestrator for the generation pipeline.
//!
//! Sequences the four pipeline stages against a [`RemoteClient`], records
//! every transition on the live [`WorkflowRun`], and notifies observers with
//! a full snapshot after each change.
//!
//! ## Runs
//!
//! Exactly one run is live at a time. [`Orchestrator::start`] always creates a
//! fresh run with a larger id; a run that is overtaken keeps executing its
//! in-flight call, but every settlement it makes afterwards is discarded and
//! it ends with [`RunOutcome::Superseded`].
//!
//! ## Notifications
//!
//! Snapshots are delivered while the state lock is held, so they arrive in
//! mutation order. Observers registered with [`Orchestrator::with_observer`]
//! run synchronously and must not call back into the orchestrator.
//!
//! ```rust,ignore
//! use nova_core::{Config, HttpClient, Orchestrator};
//!
//! # async fn example() -> nova_core::Result<()> {
//! let config = Config::load()?;
//! let orchestrator = Orchestrator::new(HttpClient::from_config(&config)?)
//!     .with_observer(|event| println!("run {} is {:?}", event.run_id, event.run.state()));
//!
//! let outcome = orchestrator.start("https://aliexpress.com/item/123").await?;
//! if let Some(run) = outcome.run() {
//!     println!("finished in state {:?}", run.state());
//! }
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::RemoteClient;
use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::export::{BundleSink, ExportReceipt};
use crate::ledger::StepName;
use crate::types::{GenerateOptions, ProductBundle, RunState, WorkflowError, WorkflowRun};
use crate::{Error, Result};

const DEFAULT_FINALIZE_DELAY: Duration = Duration::from_millis(500);

/// State-change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RunEvent {
    /// Id of the run that changed.
    pub run_id: u64,
    /// Snapshot of the run after the change.
    pub run: WorkflowRun,
}

/// Observer callback type.
///
/// Called with every [`RunEvent`], in order, while the state lock is held.
pub type RunObserver = Arc<dyn Fn(&RunEvent) + Send + Sync>;

/// Final snapshot of a run that reached a terminal state.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// The run, either succeeded or failed.
    pub run: WorkflowRun,
    /// Where the bundle was exported, when a sink accepted it.
    pub export: Option<ExportReceipt>,
}

/// How a call to [`Orchestrator::start`] or [`Orchestrator::retry`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The run reached `Succeeded` or `Failed`.
    Finished(Box<RunReport>),
    /// A newer run replaced this one before it settled.
    Superseded {
        /// Id of the discarded run.
        run_id: u64,
    },
    /// A run for the same URL is still in flight; nothing was started.
    AlreadyRunning {
        /// Id of the run in flight.
        run_id: u64,
    },
    /// `retry` was called without a failed run to restart.
    NothingToRetry,
}

impl RunOutcome {
    /// Terminal snapshot, when the run finished.
    #[must_use]
    pub fn run(&self) -> Option<&WorkflowRun> {
        match self {
            Self::Finished(report) => Some(&report.run),
            _ => None,
        }
    }

    /// Export receipt, when the run succeeded and was exported.
    #[must_use]
    pub fn export(&self) -> Option<&ExportReceipt> {
        match self {
            Self::Finished(report) => report.export.as_ref(),
            _ => None,
        }
    }
}

/// Result of a single stage.
enum Stage<T> {
    Done(T),
    Halted(RunOutcome),
}

#[derive(Default)]
struct State {
    current: Option<WorkflowRun>,
    last_id: u64,
    subscribers: Vec<mpsc::UnboundedSender<RunEvent>>,
}

/// Drives the analyze → enrich → build → finalize pipeline.
///
/// Share it behind an `Arc` (or borrow it) to trigger runs from several
/// tasks; all methods take `&self`.
pub struct Orchestrator<C: RemoteClient> {
    client: C,
    state: Mutex<State>,
    observers: Vec<RunObserver>,
    sink: Option<Arc<dyn BundleSink>>,
    options: GenerateOptions,
    request_timeout: Duration,
    finalize_delay: Duration,
}

// ============================================================
// Orchestrator Implementation
// ============================================================

impl<C: RemoteClient> Orchestrator<C> {
    /// Create an orchestrator with default options and timings.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: Mutex::new(State::default()),
            observers: Vec::new(),
            sink: None,
            options: GenerateOptions::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            finalize_delay: DEFAULT_FINALIZE_DELAY,
        }
    }

    /// Set the options forwarded to the enrich stage.
    #[must_use]
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Register an observer.
    ///
    /// The callback receives every [`RunEvent`] in mutation order.
    #[must_use]
    pub fn with_observer<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RunEvent) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(callback));
        self
    }

    /// Set the sink receiving the bundle of each succeeded run.
    #[must_use]
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: BundleSink + 'static,
    {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Bound each remote stage (analyze, enrich, build) by `timeout`.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set how long the finalize stage takes.
    #[must_use]
    pub const fn with_finalize_delay(mut self, delay: Duration) -> Self {
        self.finalize_delay = delay;
        self
    }

    /// The remote client in use.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Options forwarded to the enrich stage.
    #[must_use]
    pub const fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Snapshot of the live run, if any run was started.
    #[must_use]
    pub fn current(&self) -> Option<WorkflowRun> {
        self.lock().current.clone()
    }

    /// Receive every subsequent [`RunEvent`] on an unbounded channel.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<RunEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Start a new run for `url` and drive it to a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank URL; no run is created and
    /// no notification is sent. Stage failures are not errors: they end the
    /// run in `Failed` and are reported through [`RunOutcome::Finished`].
    pub async fn start(&self, url: &str) -> Result<RunOutcome> {
        let url = url.trim();
        if url.is_empty() {
            debug!("Rejected blank URL");
            return Err(Error::Validation("URL must not be empty".to_string()));
        }

        let run_id = {
            let mut state = self.lock();
            if let Some(run) = &state.current {
                if !run.is_terminal() && run.input_url == url {
                    debug!("Run {} for {} already in flight", run.id, url);
                    return Ok(RunOutcome::AlreadyRunning { run_id: run.id });
                }
            }

            state.last_id += 1;
            let run_id = state.last_id;
            if let Some(previous) = &state.current {
                if !previous.is_terminal() {
                    info!("Run {} superseded by run {}", previous.id, run_id);
                }
            }
            state.current = Some(WorkflowRun::new(run_id, url));
            self.notify(&mut state);
            run_id
        };

        info!("Run {} started for {}", run_id, url);
        self.drive(run_id, url).await
    }

    /// Restart the current run from the beginning, with the same URL.
    ///
    /// Only a run that ended in `Failed` can be retried; otherwise this is a
    /// no-op returning [`RunOutcome::NothingToRetry`].
    pub async fn retry(&self) -> Result<RunOutcome> {
        let url = {
            let state = self.lock();
            match &state.current {
                Some(run) if run.state() == RunState::Failed => run.input_url.clone(),
                _ => {
                    debug!("Nothing to retry");
                    return Ok(RunOutcome::NothingToRetry);
                },
            }
        };

        info!("Retrying {}", url);
        self.start(&url).await
    }

    async fn drive(&self, run_id: u64, url: &str) -> Result<RunOutcome> {
        let product = match self
            .stage(run_id, StepName::Analyze, self.client.analyze(url))
            .await?
        {
            Stage::Done(product) => product,
            Stage::Halted(outcome) => return Ok(outcome),
        };

        let content = match self
            .stage(
                run_id,
                StepName::Enrich,
                self.client.enrich(&product, &self.options),
            )
            .await?
        {
            Stage::Done(content) => content,
            Stage::Halted(outcome) => return Ok(outcome),
        };

        if let Stage::Halted(outcome) = self
            .stage(run_id, StepName::Build, self.client.build_theme())
            .await?
        {
            return Ok(outcome);
        }

        self.finalize(run_id, ProductBundle::merge(product, content))
            .await
    }

    /// Activate `step`, await `call` under the request timeout and settle.
    async fn stage<T, F>(&self, run_id: u64, step: StepName, call: F) -> Result<Stage<T>>
    where
        F: Future<Output = Result<T>>,
    {
        if !self.apply(run_id, |run| {
            run.ledger = run.ledger.advance(step)?;
            Ok(())
        })? {
            return Ok(Stage::Halted(RunOutcome::Superseded { run_id }));
        }
        info!("Run {}: {} started", run_id, step);

        let result = tokio::time::timeout(self.request_timeout, call)
            .await
            .unwrap_or(Err(Error::Timeout { stage: step }));

        match result {
            Ok(value) => {
                if self.apply(run_id, |run| {
                    run.ledger = run.ledger.complete(step)?;
                    Ok(())
                })? {
                    info!("Run {}: {} done", run_id, step);
                    Ok(Stage::Done(value))
                } else {
                    Ok(Stage::Halted(RunOutcome::Superseded { run_id }))
                }
            },
            Err(err) => {
                let failure = WorkflowError::from_error(step, &err);
                warn!("Run {}: {} failed: {}", run_id, step, err);

                let mut snapshot = None;
                let current = self.apply(run_id, |run| {
                    run.ledger = run.ledger.fail(step)?;
                    run.error = Some(failure);
                    snapshot = Some(run.clone());
                    Ok(())
                })?;

                Ok(Stage::Halted(match snapshot {
                    Some(run) if current => RunOutcome::Finished(Box::new(RunReport {
                        run,
                        export: None,
                    })),
                    _ => RunOutcome::Superseded { run_id },
                }))
            },
        }
    }

    async fn finalize(&self, run_id: u64, bundle: ProductBundle) -> Result<RunOutcome> {
        if !self.apply(run_id, |run| {
            run.ledger = run.ledger.advance(StepName::Finalize)?;
            Ok(())
        })? {
            return Ok(RunOutcome::Superseded { run_id });
        }

        tokio::time::sleep(self.finalize_delay).await;

        let mut snapshot = None;
        if !self.apply(run_id, |run| {
            run.ledger = run.ledger.complete(StepName::Finalize)?;
            run.result = Some(bundle.clone());
            snapshot = Some(run.clone());
            Ok(())
        })? {
            return Ok(RunOutcome::Superseded { run_id });
        }
        info!("Run {} succeeded: {}", run_id, bundle.display_title());

        let export = match &self.sink {
            Some(sink) => Self::publish(run_id, Arc::clone(sink), bundle).await,
            None => None,
        };

        Ok(match snapshot {
            Some(run) => RunOutcome::Finished(Box::new(RunReport { run, export })),
            None => RunOutcome::Superseded { run_id },
        })
    }

    /// Hand `bundle` to `sink` on the blocking pool.
    ///
    /// Failures are logged; the run stays succeeded.
    async fn publish(
        run_id: u64,
        sink: Arc<dyn BundleSink>,
        bundle: ProductBundle,
    ) -> Option<ExportReceipt> {
        match tokio::task::spawn_blocking(move || sink.publish(&bundle)).await {
            Ok(Ok(receipt)) => Some(receipt),
            Ok(Err(e)) => {
                warn!("Failed to export run {}: {}", run_id, e);
                None
            },
            Err(e) => {
                warn!("Export task for run {} did not complete: {}", run_id, e);
                None
            },
        }
    }

    /// Mutate the live run if it is still `run_id`, then notify.
    ///
    /// Returns `false` (and changes nothing) when the run was superseded.
    fn apply<F>(&self, run_id: u64, mutate: F) -> Result<bool>
    where
        F: FnOnce(&mut WorkflowRun) -> Result<()>,
    {
        let mut state = self.lock();
        let Some(run) = state.current.as_mut().filter(|run| run.id == run_id) else {
            warn!("Discarding settlement of superseded run {}", run_id);
            return Ok(false);
        };
        mutate(run)?;
        self.notify(&mut state);
        Ok(true)
    }

    fn notify(&self, state: &mut State) {
        let Some(run) = &state.current else {
            return;
        };
        let event = RunEvent {
            run_id: run.id,
            run: run.clone(),
        };

        for observer in &self.observers {
            observer(&event);
        }
        state
            .subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================
// Tests
// ============================================================
