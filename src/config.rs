//! Configuration management for block-glance.
//!
//! Handles loading configuration from TOML files, with CLI flags and
//! environment variables layered on top.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Default explorer API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Main configuration structure for block-glance.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Explorer API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Display settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Explorer API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Applies values given on the command line (or through their
    /// environment variables), which take precedence over the file.
    pub fn apply_overrides(&mut self, base_url: Option<&str>, timeout_secs: Option<u64>) {
        if let Some(url) = base_url {
            self.base_url = url.to_string();
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
    }

    /// Parses and validates the base URL.
    pub fn parsed_base_url(&self) -> Result<Url> {
        parse_base_url(&self.base_url)
    }

    /// Checks the base URL and that the timeout is non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(AppError::config(
                "Request timeout must be at least 1 second",
            ));
        }
        self.parsed_base_url()?;
        Ok(())
    }
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    /// Title shown in the header bar.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "Bitcoin Blockchain Explorer".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

/// Parses a base URL, accepting only http and https.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::config(format!("Invalid API URL '{raw}': {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AppError::config(format!(
            "Invalid scheme '{}'. Expected 'http' or 'https'",
            url.scheme()
        )));
    }

    Ok(url)
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("block-glance")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AppError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
