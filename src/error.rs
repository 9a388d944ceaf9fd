//! Error types for block-glance.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for block-glance operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level HTTP errors (connection refused, timeout, bad status).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response bodies that are not JSON or do not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors (invalid config file, bad URL, bad CLI value, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal setup, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Creates an HTTP error with the given message.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Http(_) => "HTTP Error",
            Self::Decode(_) => "Decode Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
