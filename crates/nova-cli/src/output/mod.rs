//! # Output Formatting
//!
//! Renders [`nova_core::ViewModel`] snapshots for humans or scripts.
//!
//! - [`text`]: step list, preview and error blocks with color indicators
//! - [`json`]: the view model (plus export receipt) as a single JSON object
//! - [`progress`]: live spinner driven by orchestrator notifications
//!
//! ```bash
//! # Human-readable output (default on a terminal)
//! nova generate https://aliexpress.com/item/123
//!
//! # JSON for scripts
//! nova generate https://aliexpress.com/item/123 -f json | jq .preview.title
//! ```

use clap::ValueEnum;

pub mod json;
pub mod progress;
pub mod text;

/// Output format options supported by the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Text,
    /// Single JSON object
    Json,
}
