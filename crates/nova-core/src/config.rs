//! Configuration management for the nova pipeline.
//!
//! Configuration is stored in TOML and layered as follows:
//!
//! 1. **Built-in defaults** ([`Config::default`])
//! 2. **Config file**: `$NOVA_CONFIG`, else `$NOVA_CONFIG_DIR/config.toml`,
//!    else the platform config directory
//! 3. **Environment variables**: `NOVA_*` overrides
//!
//! ## Example Configuration File
//!
//! ```toml
//! [api]
//! environment = "production"
//! timeout_secs = 20
//!
//! [generate]
//! style = "minimal"
//! tone = "friendly"
//!
//! [timing]
//! build_delay_ms = 1500
//! finalize_delay_ms = 500
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `NOVA_ENV` | `development` or `production` |
//! | `NOVA_API_BASE` | Explicit API base URL |
//! | `NOVA_TIMEOUT_SECS` | Per-request timeout |
//! | `NOVA_BUILD_DELAY_MS` | Synthetic build duration |
//! | `NOVA_FINALIZE_DELAY_MS` | Finalize duration |

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::GenerateOptions;
use crate::{Error, Result};

/// API address used in development.
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:3000";

/// API address used in production.
pub const PRODUCTION_BASE_URL: &str = "https://api.nova.store";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Global configuration for the nova pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API settings
    pub api: ApiConfig,
    /// Default content generation options
    pub generate: GenerateOptions,
    /// Durations of the local pipeline phases
    pub timing: TimingConfig,
}

/// Runtime environment, selecting the default API address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Local backend at [`DEVELOPMENT_BASE_URL`].
    #[default]
    Development,
    /// Hosted backend at [`PRODUCTION_BASE_URL`].
    Production,
}

impl Environment {
    /// Parse an environment name (`dev`/`development`, `prod`/`production`).
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(Error::Config(format!("Unknown environment '{other}'"))),
        }
    }

    /// The API address for this environment.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Which environment's default address to use.
    pub environment: Environment,

    /// Explicit base URL; overrides the environment default when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Upper bound for each remote call, in seconds.
    ///
    /// Expiry fails the running stage with a timeout error.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Resolve and validate the base URL (http or https, no trailing slash).
    pub fn resolved_base_url(&self) -> Result<String> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.environment.default_base_url());

        let parsed = url::Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "{raw}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        Ok(raw.trim_end_matches('/').to_string())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Durations of the local pipeline phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Duration of the synthetic build stage, in milliseconds.
    pub build_delay_ms: u64,
    /// Duration of the finalize stage, in milliseconds.
    pub finalize_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            build_delay_ms: 1_500,
            finalize_delay_ms: 500,
        }
    }
}

impl TimingConfig {
    /// Synthetic build duration.
    #[must_use]
    pub const fn build_delay(&self) -> Duration {
        Duration::from_millis(self.build_delay_ms)
    }

    /// Finalize duration.
    #[must_use]
    pub const fn finalize_delay(&self) -> Duration {
        Duration::from_millis(self.finalize_delay_ms)
    }
}

impl Config {
    /// Load configuration from the default location and apply environment
    /// overrides.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from an explicit file, without environment
    /// overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Where the configuration file is looked up.
    ///
    /// `NOVA_CONFIG` names the file directly; `NOVA_CONFIG_DIR` names its
    /// directory; otherwise the platform config directory is used:
    /// - Linux: `~/.config/nova/config.toml`
    /// - macOS: `~/Library/Application Support/dev.nova.nova/config.toml`
    /// - Windows: `%APPDATA%\nova\nova\config\config.toml`
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(file) = std::env::var_os("NOVA_CONFIG") {
            return Some(PathBuf::from(file));
        }
        if let Some(dir) = std::env::var_os("NOVA_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join(CONFIG_FILE_NAME));
        }
        directories::ProjectDirs::from("dev", "nova", "nova")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Apply `NOVA_*` overrides read through `lookup`.
    ///
    /// Taking a lookup function keeps this testable without touching the
    /// process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("NOVA_ENV") {
            self.api.environment = Environment::parse(&env)?;
        }
        if let Some(base) = lookup("NOVA_API_BASE") {
            self.api.base_url = Some(base);
        }
        if let Some(secs) = lookup("NOVA_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_number("NOVA_TIMEOUT_SECS", &secs)?;
        }
        if let Some(ms) = lookup("NOVA_BUILD_DELAY_MS") {
            self.timing.build_delay_ms = parse_number("NOVA_BUILD_DELAY_MS", &ms)?;
        }
        if let Some(ms) = lookup("NOVA_FINALIZE_DELAY_MS") {
            self.timing.finalize_delay_ms = parse_number("NOVA_FINALIZE_DELAY_MS", &ms)?;
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| Error::Config(format!("{key} must be a non-negative integer: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.environment, Environment::Development);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.generate, GenerateOptions::default());
        assert_eq!(
            config.api.resolved_base_url().unwrap(),
            DEVELOPMENT_BASE_URL
        );
    }

    #[test]
    fn test_environment_selects_base_url() {
        let api = ApiConfig {
            environment: Environment::Production,
            ..ApiConfig::default()
        };
        assert_eq!(api.resolved_base_url().unwrap(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_explicit_base_url_wins_and_is_normalized() {
        let api = ApiConfig {
            environment: Environment::Production,
            base_url: Some("http://127.0.0.1:8080/".to_string()),
            ..ApiConfig::default()
        };
        assert_eq!(api.resolved_base_url().unwrap(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        for bad in ["not a url", "ftp://example.com"] {
            let api = ApiConfig {
                base_url: Some(bad.to_string()),
                ..ApiConfig::default()
            };
            match api.resolved_base_url() {
                Err(Error::InvalidUrl(msg)) => assert!(msg.contains(bad)),
                other => panic!("expected InvalidUrl for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [generate]
            tone = "playful"
            unknown_key = "ignored"
            "#,
        )
        .unwrap();
        assert_eq!(config.generate.style, "modern");
        assert_eq!(config.generate.tone, "playful");
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\nenvironment = \"production\"\n\n[timing]\nbuild_delay_ms = 10\n",
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api.environment, Environment::Production);
        assert_eq!(loaded.timing.build_delay_ms, 10);
        assert_eq!(loaded.timing.finalize_delay_ms, 500);
        assert_eq!(loaded.generate, GenerateOptions::default());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        match Config::load_from(&dir.path().join("absent.toml")) {
            Err(Error::Config(msg)) => assert!(msg.contains("read")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbroken").unwrap();

        match Config::load_from(&path) {
            Err(Error::Config(msg)) => assert!(msg.contains("parse")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(lookup_from(&[
                ("NOVA_ENV", "prod"),
                ("NOVA_TIMEOUT_SECS", "5"),
                ("NOVA_BUILD_DELAY_MS", "0"),
                ("NOVA_FINALIZE_DELAY_MS", "0"),
            ]))
            .unwrap();

        assert_eq!(config.api.environment, Environment::Production);
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.timing.build_delay(), Duration::ZERO);
        assert_eq!(config.timing.finalize_delay(), Duration::ZERO);

        config
            .apply_env_overrides(lookup_from(&[("NOVA_API_BASE", "http://localhost:9999")]))
            .unwrap();
        assert_eq!(
            config.api.resolved_base_url().unwrap(),
            "http://localhost:9999"
        );
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = Config::default();
        assert!(
            config
                .apply_env_overrides(lookup_from(&[("NOVA_TIMEOUT_SECS", "soon")]))
                .is_err()
        );
        assert!(
            config
                .apply_env_overrides(lookup_from(&[("NOVA_ENV", "staging")]))
                .is_err()
        );
    }
}
