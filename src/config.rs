use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::Severity;

/// Root configuration structure, deserialized from `.legal-risk/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Controls what the rendered report shows.
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Severities shown when `--severity` is not given. Defaults to all.
    #[serde(default = "Severity::all")]
    pub severities: Vec<Severity>,
    /// Characters of extracted text shown by `--preview`.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            severities: Severity::all(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_preview_chars() -> usize {
    3000
}

/// Decides the exit status.
#[derive(Debug, Default, Deserialize)]
pub struct PolicyConfig {
    /// Exit with status 1 when a shown finding is at or above this severity.
    /// Absent means findings never fail the run.
    #[serde(default)]
    pub fail_on: Option<Severity>,
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_path>/.legal-risk/config.toml`
/// 3. `~/.config/legal-risk/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base_path.join(".legal-risk").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("legal-risk").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
