//! # CLI Structure and Argument Parsing
//!
//! Command-line interface for `nova`, built with `clap` derive macros.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Generate a store, showing live progress
//! nova generate https://aliexpress.com/item/123
//!
//! # Pick style and tone, export the bundle, emit JSON
//! nova generate https://aliexpress.com/item/123 --style minimal --tone playful \
//!     --export-dir ./stores --format json
//!
//! # Show the resolved configuration
//! nova config
//! ```
//!
//! ## Output Formats
//!
//! - **text**: Human-readable progress and preview (default on a terminal)
//! - **json**: Machine-readable view model (default when piped)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::utils::cli_args::FormatArg;

/// Main CLI structure for the `nova` command.
#[derive(Parser, Clone, Debug)]
#[command(name = "nova")]
#[command(version)]
#[command(about = "nova - AI store builder: turn a product URL into a store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

/// Available subcommands for the `nova` CLI.
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Generate a store from a product URL
    Generate(GenerateArgs),

    /// Show the resolved configuration
    Config {
        #[command(flatten)]
        format: FormatArg,
    },
}

/// Arguments for `nova generate`.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Product page URL (AliExpress, Amazon, CJ Dropshipping, Alibaba, ...)
    pub url: String,

    /// Content style (overrides `[generate] style`)
    #[arg(long)]
    pub style: Option<String>,

    /// Content tone (overrides `[generate] tone`)
    #[arg(long)]
    pub tone: Option<String>,

    /// Write the generated bundle into this directory
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Never ask whether to retry a failed run
    #[arg(long = "no-prompt")]
    pub no_prompt: bool,

    #[command(flatten)]
    pub format: FormatArg,
}
