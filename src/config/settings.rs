// Configuration structs

use anyhow::bail;
use std::path::PathBuf;
use std::time::Duration;

use super::constants::*;
use crate::storage::{SaveMode, StorageFormat};

/// Where and how rated conversations are saved
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Offer to save the conversation on quit
    pub enabled: bool,

    /// CSV or JSON
    pub format: StorageFormat,

    /// Save the first exchange only, or every turn
    pub mode: SaveMode,

    /// Transcript file (defaults to conversations.csv / conversations.json)
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: StorageFormat::default(),
            mode: SaveMode::default(),
            path: None,
        }
    }
}

impl StorageConfig {
    /// Configured path, or the format's default file name
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| self.format.default_path())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub api_key: String,

    /// Model identifier (e.g., "gemini-1.5-flash")
    pub model: String,

    /// API root, overridable for proxies and tests
    pub base_url: String,

    /// File holding static background context, read once at startup
    pub background_file: PathBuf,

    /// Per-request timeout for the gateway call
    pub request_timeout_secs: u64,

    pub storage: StorageConfig,
}

impl Config {
    /// Defaults for everything except the API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            background_file: PathBuf::from(DEFAULT_BACKGROUND_FILE),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage: StorageConfig::default(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("Gemini API key is empty. Set {} or api_key in the config file", API_KEY_ENV);
        }

        if self.model.trim().is_empty() {
            bail!("Model name must not be empty");
        }

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("base_url must start with http:// or https:// (got '{}')", self.base_url);
        }

        Ok(())
    }
}
