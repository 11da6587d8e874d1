//! Layered daemon configuration: built-in defaults, overridden by an
//! optional TOML config file, overridden again by environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

/// Shape of the optional TOML config file. Every field is optional so a
/// partial file only overrides what it mentions.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
struct FileConfig {
    sweep_interval_secs: Option<u64>,
    sweep_company_id: Option<String>,
}

/// Resolved configuration after the defaults → file → env precedence
/// has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub sweep_interval: Duration,
    pub sweep_company_id: Option<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS), sweep_company_id: None }
    }
}

/// `IQ_CONFIG_PATH` if set, otherwise `iqd.toml` in the working
/// directory. The file is optional either way.
fn config_path() -> PathBuf {
    std::env::var("IQ_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("iqd.toml"))
}

fn read_file_config(path: &Path) -> FileConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_file_config(&text),
        Err(_) => FileConfig::default(),
    }
}

fn parse_file_config(text: &str) -> FileConfig {
    toml::from_str(text).unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring malformed config file");
        FileConfig::default()
    })
}

/// Builds the daemon's configuration by applying the config file on top
/// of the defaults, then the environment on top of that.
pub fn load() -> DaemonConfig {
    load_from(&read_file_config(&config_path()))
}

fn load_from(file: &FileConfig) -> DaemonConfig {
    let mut config = DaemonConfig::default();

    if let Some(secs) = file.sweep_interval_secs {
        config.sweep_interval = Duration::from_secs(secs);
    }
    if file.sweep_company_id.is_some() {
        config.sweep_company_id = file.sweep_company_id.clone();
    }

    if let Some(interval) = crate::env::sweep_interval_override() {
        config.sweep_interval = interval;
    }
    if let Some(id) = crate::env::sweep_company_id() {
        config.sweep_company_id = Some(id);
    }

    config
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
