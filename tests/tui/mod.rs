//! Headless-mode tests.

pub mod common;
pub mod headless_test;
pub mod view_test;
