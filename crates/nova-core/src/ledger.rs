//! Step ledger for the generation pipeline.
//!
//! The ledger is a fixed, ordered list of the four pipeline stages, each with
//! a [`StepStatus`]. Every operation is a pure function that returns a new
//! ledger; nothing here performs I/O or holds hidden state.
//!
//! ## Transition Rules
//!
//! - `Pending` -> `Active` via [`StepLedger::advance`], only when every
//!   earlier step is `Done` and no step has `Failed`
//! - `Active` -> `Done` via [`StepLedger::complete`]
//! - `Active` -> `Failed` via [`StepLedger::fail`]
//! - anything -> `Pending` via [`StepLedger::reset`]
//!
//! Statuses never regress outside of `reset`. Together these rules keep the
//! ledger in the shape `done* active? pending*` (or `done* failed pending*`).
//!
//! ```rust
//! use nova_core::{StepLedger, StepName, StepStatus};
//!
//! let ledger = StepLedger::new()
//!     .advance(StepName::Analyze)?
//!     .complete(StepName::Analyze)?
//!     .advance(StepName::Enrich)?;
//!
//! assert_eq!(ledger.status(StepName::Analyze), StepStatus::Done);
//! assert_eq!(ledger.active(), Some(StepName::Enrich));
//! assert!(ledger.complete(StepName::Build).is_err());
//! # Ok::<(), nova_core::Error>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of pipeline steps.
pub const STEP_COUNT: usize = 4;

/// Name of a pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    /// Scrape the product page.
    Analyze,
    /// Generate store content from the scraped product.
    Enrich,
    /// Package theme assets.
    Build,
    /// Local wrap-up before the result is published.
    Finalize,
}

impl StepName {
    /// All steps in execution order.
    pub const ALL: [Self; STEP_COUNT] = [Self::Analyze, Self::Enrich, Self::Build, Self::Finalize];

    /// Position of the step in the pipeline.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Enrich => "enrich",
            Self::Build => "build",
            Self::Finalize => "finalize",
        }
    }

    /// Short human-readable label for progress displays.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Analyze => "Analyzing product",
            Self::Enrich => "Generating content",
            Self::Build => "Building theme",
            Self::Finalize => "Finalizing store",
        }
    }

    /// The step that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Analyze => Some(Self::Enrich),
            Self::Enrich => Some(Self::Build),
            Self::Build => Some(Self::Finalize),
            Self::Finalize => None,
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not started yet.
    Pending,
    /// Currently running.
    Active,
    /// Finished successfully.
    Done,
    /// Finished with an error; the pipeline halted here.
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

/// A named step together with its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Which stage this is.
    pub name: StepName,
    /// Where the stage currently stands.
    pub status: StepStatus,
}

impl Step {
    const fn pending(name: StepName) -> Self {
        Self {
            name,
            status: StepStatus::Pending,
        }
    }
}

/// Fixed-size, ordered ledger of step statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLedger {
    steps: [Step; STEP_COUNT],
}

impl Default for StepLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl StepLedger {
    /// A ledger with every step `Pending`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            steps: [
                Step::pending(StepName::Analyze),
                Step::pending(StepName::Enrich),
                Step::pending(StepName::Build),
                Step::pending(StepName::Finalize),
            ],
        }
    }

    /// Steps in pipeline order.
    #[must_use]
    pub const fn steps(&self) -> &[Step; STEP_COUNT] {
        &self.steps
    }

    /// Current status of `name`.
    #[must_use]
    pub const fn status(&self, name: StepName) -> StepStatus {
        self.steps[name.index()].status
    }

    /// The step currently running, if any.
    #[must_use]
    pub fn active(&self) -> Option<StepName> {
        self.find(StepStatus::Active)
    }

    /// The step that failed, if any.
    #[must_use]
    pub fn failed(&self) -> Option<StepName> {
        self.find(StepStatus::Failed)
    }

    /// Whether every step is `Done`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Done)
    }

    /// Whether every step is still `Pending`.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Pending)
    }

    /// Mark `name` as `Active`.
    ///
    /// Requires `name` to be `Pending`, every earlier step to be `Done` and no
    /// step to have failed. No other step can be `Active` afterwards.
    pub fn advance(&self, name: StepName) -> Result<Self> {
        let from = self.status(name);
        let earlier_done = self.steps[..name.index()]
            .iter()
            .all(|s| s.status == StepStatus::Done);

        if from != StepStatus::Pending || !earlier_done || self.failed().is_some() {
            return Err(Error::InvalidTransition {
                step: name,
                from,
                to: StepStatus::Active,
            });
        }

        Ok(self.with_status(name, StepStatus::Active))
    }

    /// Mark the active step `name` as `Done`.
    pub fn complete(&self, name: StepName) -> Result<Self> {
        self.settle(name, StepStatus::Done)
    }

    /// Mark the active step `name` as `Failed`.
    ///
    /// Later steps are left `Pending`; they are not failed automatically.
    pub fn fail(&self, name: StepName) -> Result<Self> {
        self.settle(name, StepStatus::Failed)
    }

    /// Every step back to `Pending`.
    #[must_use]
    pub const fn reset(&self) -> Self {
        Self::new()
    }

    fn settle(&self, name: StepName, to: StepStatus) -> Result<Self> {
        let from = self.status(name);
        if from != StepStatus::Active {
            return Err(Error::InvalidTransition {
                step: name,
                from,
                to,
            });
        }
        Ok(self.with_status(name, to))
    }

    fn with_status(&self, name: StepName, status: StepStatus) -> Self {
        let mut next = *self;
        next.steps[name.index()].status = status;
        next
    }

    fn find(&self, status: StepStatus) -> Option<StepName> {
        self.steps
            .iter()
            .find(|s| s.status == status)
            .map(|s| s.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn statuses(ledger: &StepLedger) -> Vec<StepStatus> {
        ledger.steps().iter().map(|s| s.status).collect()
    }

    #[test]
    fn test_new_ledger_is_pending_in_order() {
        let ledger = StepLedger::new();
        let names: Vec<_> = ledger.steps().iter().map(|s| s.name).collect();
        assert_eq!(names, StepName::ALL.to_vec());
        assert!(ledger.is_untouched());
        assert_eq!(ledger.active(), None);
    }

    #[test]
    fn test_full_happy_path() {
        let mut ledger = StepLedger::new();
        for name in StepName::ALL {
            ledger = ledger.advance(name).unwrap();
            assert_eq!(ledger.active(), Some(name));
            ledger = ledger.complete(name).unwrap();
        }
        assert!(ledger.is_complete());
    }

    #[test]
    fn test_advance_requires_earlier_steps_done() {
        let ledger = StepLedger::new();
        let err = ledger.advance(StepName::Build).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                step: StepName::Build,
                from: StepStatus::Pending,
                to: StepStatus::Active
            }
        ));

        let ledger = ledger.advance(StepName::Analyze).unwrap();
        assert!(ledger.advance(StepName::Enrich).is_err());
    }

    #[test]
    fn test_fail_leaves_later_steps_pending() {
        let ledger = StepLedger::new()
            .advance(StepName::Analyze)
            .unwrap()
            .fail(StepName::Analyze)
            .unwrap();

        assert_eq!(
            statuses(&ledger),
            vec![
                StepStatus::Failed,
                StepStatus::Pending,
                StepStatus::Pending,
                StepStatus::Pending
            ]
        );
        assert_eq!(ledger.failed(), Some(StepName::Analyze));
    }

    #[test]
    fn test_failed_ledger_stops_advancing() {
        let ledger = StepLedger::new()
            .advance(StepName::Analyze)
            .unwrap()
            .complete(StepName::Analyze)
            .unwrap()
            .advance(StepName::Enrich)
            .unwrap()
            .fail(StepName::Enrich)
            .unwrap();

        assert!(ledger.advance(StepName::Build).is_err());
        assert!(ledger.advance(StepName::Enrich).is_err());
        assert!(ledger.complete(StepName::Enrich).is_err());
    }

    #[test]
    fn test_done_never_regresses() {
        let ledger = StepLedger::new()
            .advance(StepName::Analyze)
            .unwrap()
            .complete(StepName::Analyze)
            .unwrap();

        assert!(ledger.advance(StepName::Analyze).is_err());
        assert!(ledger.fail(StepName::Analyze).is_err());
        assert!(ledger.complete(StepName::Analyze).is_err());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let ledger = StepLedger::new()
            .advance(StepName::Analyze)
            .unwrap()
            .fail(StepName::Analyze)
            .unwrap();
        assert_eq!(ledger.reset(), StepLedger::new());
    }

    #[test]
    fn test_step_name_navigation() {
        assert_eq!(StepName::Analyze.next(), Some(StepName::Enrich));
        assert_eq!(StepName::Finalize.next(), None);
        assert_eq!(StepName::Build.index(), 2);
        assert_eq!(StepName::Enrich.to_string(), "enrich");
    }

    #[test]
    fn test_ledger_serializes_as_named_steps() {
        let json = serde_json::to_value(StepLedger::new()).unwrap();
        assert_eq!(json["steps"][0]["name"], "analyze");
        assert_eq!(json["steps"][3]["status"], "pending");
    }

    fn assert_well_formed(ledger: &StepLedger) {
        let actives = ledger
            .steps()
            .iter()
            .filter(|s| s.status == StepStatus::Active)
            .count();
        assert!(actives <= 1, "more than one active step: {ledger:?}");

        let pivot = ledger
            .steps()
            .iter()
            .position(|s| matches!(s.status, StepStatus::Active | StepStatus::Failed));
        if let Some(pivot) = pivot {
            assert!(
                ledger.steps()[..pivot]
                    .iter()
                    .all(|s| s.status == StepStatus::Done)
            );
            assert!(
                ledger.steps()[pivot + 1..]
                    .iter()
                    .all(|s| s.status == StepStatus::Pending)
            );
        }
    }

    proptest! {
        #[test]
        fn test_arbitrary_operations_keep_ledger_well_formed(
            ops in prop::collection::vec((0u8..3, 0usize..STEP_COUNT), 0..48)
        ) {
            let mut ledger = StepLedger::new();
            for (op, idx) in ops {
                let name = StepName::ALL[idx];
                let before = ledger;
                let result = match op {
                    0 => ledger.advance(name),
                    1 => ledger.complete(name),
                    _ => ledger.fail(name),
                };
                if let Ok(next) = result {
                    for (old, new) in before.steps().iter().zip(next.steps()) {
                        if old.status == StepStatus::Done {
                            prop_assert_eq!(new.status, StepStatus::Done);
                        }
                    }
                    ledger = next;
                } else {
                    prop_assert_eq!(ledger, before);
                }
                assert_well_formed(&ledger);
            }
        }
    }
}
