//! nova CLI - generate a store from a product URL
//!
//! Thin entry point: all command handling lives in the library crate so it
//! can be exercised from tests.

use std::process::ExitCode;

use colored::Colorize;
use nova_cli::error::exit_code_from_error;

#[tokio::main]
async fn main() -> ExitCode {
    match nova_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}
