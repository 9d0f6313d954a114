//! CLI configuration: TOML file + environment + flag overrides.
//!
//! Resolution order is flag > `SLICEWATCH_*` env var > config file >
//! built-in default, merged through figment.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use slicewatch_core::{DashboardConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config struct ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FileConfig {
    /// Slice manager base URL.
    pub server: Option<String>,

    /// Poll interval in seconds for `watch`.
    #[serde(default = "default_poll_secs")]
    pub poll_interval_secs: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: bool,
}

fn default_poll_secs() -> u64 {
    5
}
fn default_timeout() -> u64 {
    30
}

// ── Loading ─────────────────────────────────────────────────────────

/// Canonical config file path (`~/.config/slicewatch/config.toml` on
/// Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "slicewatch", "slicewatch").map_or_else(
        || PathBuf::from("slicewatch.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Load config, returning defaults if the file doesn't exist or fails
/// to parse.
pub fn load_config_or_default() -> FileConfig {
    let figment = Figment::new()
        .merge(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("SLICEWATCH_").ignore(&["server", "output", "insecure", "timeout"]));

    figment.extract().unwrap_or_default()
}

// ── Resolution to DashboardConfig ───────────────────────────────────

/// Build a `DashboardConfig` from the config file with CLI flag and
/// env overrides applied. `poll_interval` stays at its default; the
/// caller decides between one-shot and watch cadence.
pub fn resolve(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let file = load_config_or_default();

    let url_str = global
        .server
        .clone()
        .or(file.server)
        .ok_or_else(|| CliError::NoServer {
            config_path: config_path().display().to_string(),
        })?;

    let base_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let mut config = DashboardConfig::new(base_url);
    config.poll_interval = Duration::from_secs(file.poll_interval_secs);
    config.request_timeout = Duration::from_secs(global.timeout);
    config.tls = if global.insecure || file.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };
    Ok(config)
}
