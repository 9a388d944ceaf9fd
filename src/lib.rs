//! block-glance - a terminal explorer for a natural-language blockchain
//! query API.
//!
//! This library exposes the core modules for use in integration tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod tui;
