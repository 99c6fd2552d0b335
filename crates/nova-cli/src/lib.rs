//! nova CLI - generate a store from a product URL
//!
//! The binary parses arguments, installs logging, and dispatches to the
//! command modules. Errors carry a [`error::ErrorCategory`] that decides the
//! process exit code.
use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
pub mod error;
mod output;
mod utils;

use crate::utils::initialize_logging;
use cli::{Cli, Commands};

/// Execute the nova CLI with the currently configured environment.
///
/// # Errors
///
/// Returns an error if logging initialization or command execution fails.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    execute_command(cli).await
}

async fn execute_command(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Generate(args) => {
            let format = args.format.resolve();
            commands::generate::execute(args, format, quiet).await
        },
        Commands::Config { format } => commands::config::execute(format.resolve()),
    }
}
