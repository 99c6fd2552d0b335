//! Text output formatting

use colored::Colorize;
use nova_core::{ExportReceipt, Indicator, StepView, ViewModel};

pub struct TextFormatter;

impl TextFormatter {
    /// Format the final state of a run: step list, then preview or error.
    ///
    /// `rerun_hint` adds a closing hint to retryable failures; leave it off
    /// when an interactive retry prompt follows.
    pub fn format_view(
        view: &ViewModel,
        export: Option<&ExportReceipt>,
        rerun_hint: bool,
    ) -> String {
        let mut lines: Vec<String> = view.steps.iter().map(format_step).collect();

        if let Some(preview) = &view.preview {
            lines.push(String::new());
            lines.push(format!("{} {}", "Store Ready!".green().bold(), preview.title.bold()));
            lines.push(format!("  Price: {}", preview.price));
            if let Some(image) = &preview.image {
                lines.push(format!("  Image: {}", image.bright_black()));
            }
        }

        if let Some(receipt) = export {
            lines.push(format!("  Saved: {}", receipt.artifact.display()));
            lines.push(format!("  Preview: {}", receipt.preview.cyan()));
        }

        if let Some(error) = &view.error {
            lines.push(String::new());
            lines.push(format!(
                "{} {} step failed",
                "✗".red().bold(),
                error.failed_step
            ));
            lines.push(format!("  {}", error.message));
            if rerun_hint && error.retry_available {
                lines.push(format!(
                    "  {}",
                    "Re-run the command to try again.".bright_black()
                ));
            }
        }

        lines.join("\n")
    }
}

fn format_step(step: &StepView) -> String {
    let marker = match step.indicator {
        Indicator::Dimmed => "○".bright_black(),
        Indicator::Spinner => "◐".cyan(),
        Indicator::Checkmark => "✓".green(),
        Indicator::ErrorMark => "✗".red(),
    };
    let label = if step.indicator == Indicator::Dimmed {
        step.label.bright_black()
    } else {
        step.label.normal()
    };
    format!("{marker} {label}")
}
