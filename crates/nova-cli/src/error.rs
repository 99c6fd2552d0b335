//! CLI error handling with semantic exit codes.
//!
//! Errors are categorized so that shell scripts and CI pipelines can tell a
//! rejected input from a backend failure without parsing messages.
//!
//! # Exit Code Categories
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Store generated |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid input or configuration |
//! | 5 | `Network` | A remote stage failed |
//! | 6 | `Timeout` | A remote stage timed out |
//!
//! # Usage
//!
//! ```bash
//! nova generate "$URL" --format json --no-prompt > store.json
//! case $? in
//!     0) echo "Generated" ;;
//!     5) echo "Backend failed, try again later" ;;
//!     *) echo "Other error" ;;
//! esac
//! ```

use std::fmt;

use nova_core::{FailureKind, WorkflowError};

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid input or configuration (exit code 2).
    ///
    /// Blank URLs, malformed config files, bad environment overrides.
    Usage = 2,

    /// A remote stage failed (exit code 5).
    ///
    /// Non-success HTTP status, transport failure, or malformed response.
    Network = 5,

    /// A remote stage timed out (exit code 6).
    Timeout = 6,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Category for a core library error.
    #[must_use]
    pub const fn from_core(err: &nova_core::Error) -> Self {
        match err {
            nova_core::Error::Validation(_)
            | nova_core::Error::Config(_)
            | nova_core::Error::InvalidUrl(_) => Self::Usage,
            nova_core::Error::Remote { .. } | nova_core::Error::Network(_) => Self::Network,
            nova_core::Error::Timeout { .. } => Self::Timeout,
            _ => Self::Internal,
        }
    }

    /// Category for the failure of a run.
    #[must_use]
    pub const fn from_failure(failure: &WorkflowError) -> Self {
        match failure.kind {
            FailureKind::Validation => Self::Usage,
            FailureKind::Remote => Self::Network,
            FailureKind::Timeout => Self::Timeout,
        }
    }

    /// Infer the error category from an error message.
    ///
    /// Heuristic fallback for errors that were never explicitly categorized.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Timeout errors (check before Network so "connection timeout" is categorized correctly)
        if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            return Self::Timeout;
        }

        if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("dns")
            || msg_lower.contains("http")
            || msg_lower.contains("unreachable")
        {
            return Self::Network;
        }

        if msg_lower.contains("invalid argument")
            || msg_lower.contains("missing required")
            || msg_lower.contains("invalid value")
            || msg_lower.contains("must not be empty")
        {
            return Self::Usage;
        }

        Self::Internal
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` with an `ErrorCategory` to enable proper
/// exit codes while preserving full error context and chains.
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Internal, source)
    }

    /// Wrap a core error, categorized by its variant.
    #[must_use]
    pub fn from_core(err: nova_core::Error) -> Self {
        Self::new(ErrorCategory::from_core(&err), err)
    }

    /// Describe a failed run.
    #[must_use]
    pub fn from_failure(failure: &WorkflowError) -> Self {
        Self::new(
            ErrorCategory::from_failure(failure),
            anyhow::anyhow!("{}", failure.message),
        )
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// Checks for a `CliError`, then a core error, and otherwise infers the
/// category from the error message.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }

    if let Some(core_err) = err.downcast_ref::<nova_core::Error>() {
        return ErrorCategory::from_core(core_err).exit_code();
    }

    ErrorCategory::infer_from_message(&err.to_string()).exit_code()
}
