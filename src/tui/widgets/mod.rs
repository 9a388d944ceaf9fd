//! TUI widgets for the explorer view.
//!
//! One widget per card, plus the header bar and spinner.

pub mod error;
pub mod header;
pub mod input;
pub mod spinner;
pub mod sql;
pub mod summary;
pub mod table;
