//! Application configuration.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Base URL of the published compendium API used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "https://kayemk.github.io/wmt-compendium-data/api";

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# wmtui configuration.
# Values may also be supplied via WMTUI_* environment variables.

# Base URL of the published compendium API.
#api_base_url = "https://kayemk.github.io/wmt-compendium-data/api"

# Per-request timeout in seconds.
#request_timeout_secs = 15

# Directory that detail exports are written to.
#export_dir = "~/.config/wmtui/exports"
"#;

/// Runtime settings for the compendium browser.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL the three dataset documents are fetched from.
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Directory that detail exports are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_export_dir() -> PathBuf {
    crate::export::ExportManager::default_root()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base(),
            request_timeout_secs: default_timeout(),
            export_dir: default_export_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file (if present) layered with
    /// `WMTUI_*` environment overrides.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(config_path()).required(false))
            .add_source(config::Environment::with_prefix("WMTUI").try_parsing(true))
            .build()
            .context("failed to read configuration")?;
        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }
}

/// Location of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wmtui")
        .join("config.toml")
}

/// Write a commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let path = config_path();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write default config {}", path.display()))
}
