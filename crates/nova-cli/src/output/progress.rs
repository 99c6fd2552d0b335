//! Progress display utilities

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use nova_core::{Indicator, STEP_COUNT, ViewModel};

/// Live spinner on stderr, updated from run snapshots.
///
/// Cheap to clone; clones drive the same spinner.
#[derive(Clone)]
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new spinner.
    ///
    /// Draws nothing when stderr is not a terminal.
    pub fn spinner() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Show the active step of `view`.
    pub fn update(&self, view: &ViewModel) {
        if let Some(message) = progress_message(view) {
            self.bar.set_message(message);
        }
    }

    /// Hide the spinner while `f` writes to the terminal.
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.bar.suspend(f)
    }

    /// Remove the spinner.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// `"<label>... (n/4)"` for the active step, if any.
fn progress_message(view: &ViewModel) -> Option<String> {
    view.steps
        .iter()
        .position(|step| step.indicator == Indicator::Spinner)
        .map(|index| {
            format!(
                "{}... ({}/{STEP_COUNT})",
                view.steps[index].label,
                index + 1
            )
        })
}
