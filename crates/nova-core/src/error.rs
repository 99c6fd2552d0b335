//! Error types and handling for nova-core operations.
//!
//! This module provides the error type shared by every component of the
//! generation pipeline. Errors are categorized for easier handling and carry
//! enough context to tell which pipeline stage produced them.
//!
//! ## Error Categories
//!
//! - **Validation**: Bad trigger input, rejected before any network call
//! - **Remote**: Non-success HTTP status or transport failure at a named stage
//! - **Timeout**: A stage exceeded its time budget
//! - **Ledger**: Illegal step status transitions
//! - **Config, Serialization, Export**: Ambient failures outside the pipeline
//!
//! ## Recovery Hints
//!
//! Pipeline failures are never retried automatically. [`Error::is_recoverable`]
//! tells a front end whether offering the user a retry makes sense:
//!
//! ```rust
//! use nova_core::{Error, StepName};
//!
//! let err = Error::Remote {
//!     stage: StepName::Analyze,
//!     reason: "HTTP 500 Internal Server Error".to_string(),
//! };
//! assert!(err.is_recoverable());
//!
//! let err = Error::Validation("URL must not be empty".to_string());
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

use crate::ledger::{StepName, StepStatus};

/// The main error type for nova-core operations.
///
/// All fallible public functions in nova-core return `Result<T, Error>`.
/// Pipeline errors (`Validation`, `Remote`, `Timeout`) are terminal for the
/// run that produced them and end up on the run as a
/// [`WorkflowError`](crate::WorkflowError).
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP client could not be constructed.
    ///
    /// Request failures during a run never use this variant; they are mapped
    /// to [`Error::Remote`] or [`Error::Timeout`] with the stage attached.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Trigger input was rejected before reaching the network.
    ///
    /// ## Common Causes
    ///
    /// - Empty URL
    /// - Whitespace-only URL
    #[error("Validation error: {0}")]
    Validation(String),

    /// A remote stage failed.
    ///
    /// Produced for non-2xx responses, transport failures (DNS, refused
    /// connections, resets) and 2xx responses whose body does not decode.
    ///
    /// ## Recoverability
    ///
    /// Recoverable: the user may retry the whole run.
    #[error("Remote error during {stage} stage: {reason}")]
    Remote {
        /// Stage that issued the failing call.
        stage: StepName,
        /// Human-readable failure reason.
        reason: String,
    },

    /// A stage exceeded the configured request timeout.
    ///
    /// Takes the same failure path as [`Error::Remote`].
    #[error("Timeout during {stage} stage")]
    Timeout {
        /// Stage that timed out.
        stage: StepName,
    },

    /// A step ledger transition violated the ordering rules.
    ///
    /// Indicates a programming error in the caller; the orchestrator never
    /// issues illegal transitions.
    #[error("Invalid transition for {step} step: {from} -> {to}")]
    InvalidTransition {
        /// Step whose status was being changed.
        step: StepName,
        /// Status before the attempted change.
        from: StepStatus,
        /// Requested status.
        to: StepStatus,
    },

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An export sink could not publish a bundle.
    #[error("Export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if offering the user a retry might help.
    ///
    /// Returns `true` for remote and timeout failures and connection-level
    /// client errors. Validation, ledger and configuration errors are
    /// permanent.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Remote { .. } | Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// - `"network"`, `"validation"`, `"remote"`, `"timeout"`, `"ledger"`,
    ///   `"config"`, `"invalid_url"`, `"serialization"`, `"export"`
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Validation(_) => "validation",
            Self::Remote { .. } => "remote",
            Self::Timeout { .. } => "timeout",
            Self::InvalidTransition { .. } => "ledger",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Serialization(_) => "serialization",
            Self::Export(_) => "export",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
