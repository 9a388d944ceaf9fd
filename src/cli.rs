//! Command-line argument parsing for block-glance.
//!
//! API flags fall back to their environment variables; whatever is still
//! unset comes from the config file.

use crate::config::Config;
use crate::error::Result;
use crate::tui::headless::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Environment variable for the API base URL.
pub const API_URL_ENV: &str = "BLOCK_GLANCE_API_URL";

/// Environment variable for the request timeout.
pub const TIMEOUT_ENV: &str = "BLOCK_GLANCE_TIMEOUT_SECS";

/// Which mock endpoints fail in headless mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MockFailure {
    /// `GET /api/db-info` fails.
    Info,
    /// `POST /api/query` fails.
    Query,
    /// Both fail.
    All,
}

/// Terminal explorer for a natural-language blockchain query API.
#[derive(Parser, Debug)]
#[command(name = "block-glance")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the explorer API (e.g., http://localhost:8000)
    #[arg(long, value_name = "URL", env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", env = TIMEOUT_ENV)]
    pub timeout: Option<u64>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // === Headless mode options ===
    /// Run in headless mode (no terminal UI, for testing/automation)
    #[arg(long)]
    pub headless: bool,

    /// Use the in-memory mock API instead of HTTP
    #[arg(long)]
    pub mock_api: bool,

    /// Make mock endpoints fail
    #[arg(long, value_name = "WHICH", requires = "mock_api")]
    pub mock_fail: Option<MockFailure>,

    /// Delay mock answers by this many milliseconds
    #[arg(long, value_name = "MS", requires = "mock_api")]
    pub mock_delay: Option<u64>,

    /// Comma-separated events to execute in headless mode (e.g., "type:hello,key:enter")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// Path to script file with events (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Screen size for headless mode (WIDTHxHEIGHT, e.g., "100x30")
    #[arg(long, value_name = "SIZE", default_value = "100x30")]
    pub size: String,

    /// Output format for headless mode (text, json, frames)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write output to file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop on first assertion failure
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Loads the config file and layers flags and environment on top.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load_from_file(&self.config_path())?;
        config
            .api
            .apply_overrides(self.api_url.as_deref(), self.timeout);
        config.api.validate()?;
        Ok(config)
    }

    /// Returns true if headless mode is enabled.
    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// Parses the screen size from the --size argument.
    pub fn parse_screen_size(&self) -> std::result::Result<(u16, u16), String> {
        let Some((width, height)) = self.size.split_once('x') else {
            return Err(format!(
                "Invalid size format: '{}'. Expected WIDTHxHEIGHT (e.g., 100x30)",
                self.size
            ));
        };
        let width = width
            .parse::<u16>()
            .map_err(|_| format!("Invalid width: '{}'", width))?;
        let height = height
            .parse::<u16>()
            .map_err(|_| format!("Invalid height: '{}'", height))?;
        Ok((width, height))
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Validates headless mode arguments.
    pub fn validate_headless(&self) -> std::result::Result<(), String> {
        if !self.headless {
            return Ok(());
        }

        if self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }

        self.parse_screen_size()?;
        self.parse_output_format()?;

        Ok(())
    }
}
