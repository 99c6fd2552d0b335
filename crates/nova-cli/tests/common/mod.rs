#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a configured `nova` command suitable for integration tests.
///
/// Configuration is isolated in `config_dir`, synthetic delays are zeroed,
/// and colors are disabled.
#[allow(dead_code)]
pub fn nova_cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nova"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("NOVA_CONFIG");
    cmd.env_remove("NOVA_ENV");
    cmd.env_remove("NOVA_API_BASE");
    cmd.env_remove("NOVA_TIMEOUT_SECS");
    cmd.env_remove("NOVA_OUTPUT_FORMAT");
    cmd.env("NOVA_CONFIG_DIR", config_dir);
    cmd.env("NOVA_BUILD_DELAY_MS", "0");
    cmd.env("NOVA_FINALIZE_DELAY_MS", "0");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Like [`nova_cmd`], pointed at a mock API.
#[allow(dead_code)]
pub fn nova_cmd_with_api(config_dir: &Path, base_url: &str) -> Command {
    let mut cmd = nova_cmd(config_dir);
    cmd.env("NOVA_API_BASE", base_url);
    cmd
}
