//! `nova config`: show the resolved configuration.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use nova_core::Config;
use serde::Serialize;

use crate::error::CliError;
use crate::output::OutputFormat;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigReport<'a> {
    path: Option<PathBuf>,
    base_url: String,
    config: &'a Config,
}

/// Print configuration after file and environment layering.
pub fn execute(format: OutputFormat) -> Result<()> {
    let config = Config::load().map_err(CliError::from_core)?;
    let base_url = config
        .api
        .resolved_base_url()
        .map_err(CliError::from_core)?;
    let report = ConfigReport {
        path: Config::config_path(),
        base_url,
        config: &config,
    };

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => format_text(&report)?,
    };
    println!("{rendered}");
    Ok(())
}

fn format_text(report: &ConfigReport<'_>) -> Result<String> {
    let mut out = String::new();
    match &report.path {
        Some(path) if path.exists() => writeln!(out, "# File: {}", path.display())?,
        Some(path) => writeln!(out, "# File: {} (not found, using defaults)", path.display())?,
        None => writeln!(out, "# File: none")?,
    }
    writeln!(out, "# API: {}", report.base_url)?;
    writeln!(out)?;
    out.push_str(&toml::to_string_pretty(report.config)?);
    Ok(out.trim_end().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_report_lists_sections() {
        let config = Config::default();
        let report = ConfigReport {
            path: None,
            base_url: "http://localhost:3000".to_string(),
            config: &config,
        };

        let text = format_text(&report).unwrap();
        assert!(text.starts_with("# File: none"));
        assert!(text.contains("# API: http://localhost:3000"));
        assert!(text.contains("[api]"));
        assert!(text.contains("[generate]"));
        assert!(text.contains("tone = \"professional\""));
        assert!(text.contains("[timing]"));
    }
}
