//! `nova generate`: run the pipeline for one product URL.

use anyhow::{Result, anyhow};
use inquire::{Confirm, InquireError};
use is_terminal::IsTerminal;
use nova_core::{
    Config, ExportReceipt, FileExporter, HttpClient, Orchestrator, RunOutcome, WorkflowRun, render,
};
use tracing::debug;

use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::output::json::GenerateReport;
use crate::output::progress::ProgressDisplay;
use crate::output::text::TextFormatter;

/// Generate a store for `args.url`.
///
/// A failed run is reported in the chosen format and then returned as a
/// categorized error, so the exit code reflects the failure. In text mode on
/// a terminal the user is offered a retry first.
pub async fn execute(args: GenerateArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let config = load_config(&args)?;
    let client = HttpClient::from_config(&config).map_err(CliError::from_core)?;
    debug!("Using API at {}", client.base_url());

    let progress = (format == OutputFormat::Text && !quiet).then(ProgressDisplay::spinner);

    let mut orchestrator = Orchestrator::new(client)
        .with_options(config.generate.clone())
        .with_request_timeout(config.api.timeout())
        .with_finalize_delay(config.timing.finalize_delay());
    if let Some(display) = progress.clone() {
        orchestrator =
            orchestrator.with_observer(move |event| display.update(&render(&event.run)));
    }
    if let Some(dir) = args.export_dir {
        orchestrator = orchestrator.with_sink(FileExporter::new(dir));
    }

    let interactive = format == OutputFormat::Text && !args.no_prompt && is_interactive();

    let mut outcome = orchestrator
        .start(&args.url)
        .await
        .map_err(CliError::from_core)?;

    let result = loop {
        let report = match outcome {
            RunOutcome::Finished(report) => report,
            other => {
                break Err(CliError::internal(anyhow!("Run did not finish: {other:?}")));
            },
        };

        emit(
            &report.run,
            report.export.as_ref(),
            format,
            progress.as_ref(),
            !interactive,
        )?;

        let Some(failure) = report.run.error.as_ref() else {
            break Ok(());
        };

        let retry = interactive
            && match &progress {
                Some(display) => display.suspend(ask_retry)?,
                None => ask_retry()?,
            };
        if !retry {
            break Err(CliError::from_failure(failure));
        }

        outcome = orchestrator.retry().await.map_err(CliError::from_core)?;
    };

    if let Some(display) = &progress {
        display.finish();
    }
    result.map_err(Into::into)
}

fn load_config(args: &GenerateArgs) -> Result<Config> {
    let mut config = Config::load().map_err(CliError::from_core)?;
    if let Some(style) = &args.style {
        config.generate.style.clone_from(style);
    }
    if let Some(tone) = &args.tone {
        config.generate.tone.clone_from(tone);
    }
    Ok(config)
}

fn emit(
    run: &WorkflowRun,
    export: Option<&ExportReceipt>,
    format: OutputFormat,
    progress: Option<&ProgressDisplay>,
    rerun_hint: bool,
) -> Result<()> {
    let view = render(run);
    match format {
        OutputFormat::Json => {
            println!("{}", GenerateReport::new(&view, export).to_json()?);
        },
        OutputFormat::Text => {
            let text = TextFormatter::format_view(&view, export, rerun_hint);
            match progress {
                Some(display) => display.suspend(|| println!("{text}")),
                None => println!("{text}"),
            }
        },
    }
    Ok(())
}

fn ask_retry() -> Result<bool> {
    match Confirm::new("Retry?")
        .with_default(true)
        .with_help_message("Restarts the run from the analyze step")
        .prompt()
    {
        Ok(answer) => Ok(answer),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}
