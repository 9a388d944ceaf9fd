//! Common test utilities for TUI tests.

use block_glance::api::MockExplorerApi;
use block_glance::tui::headless::{HeadlessConfig, HeadlessResult, HeadlessRunner};
use std::process::Command;
use std::sync::Arc;

/// Runs block-glance with the given arguments and returns
/// (exit code, stdout, stderr).
///
/// Uses the binary cargo builds for integration tests. The API environment
/// variables are cleared so the caller controls them.
pub fn run_binary(args: &[&str], env: &[(&str, &str)]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_block-glance"))
        .args(args)
        .env_remove("BLOCK_GLANCE_API_URL")
        .env_remove("BLOCK_GLANCE_TIMEOUT_SECS")
        .envs(env.iter().copied())
        .output()
        .expect("Failed to execute block-glance");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Runs a headless script in-process against the given mock.
pub async fn run_script(api: MockExplorerApi, script: &str) -> HeadlessResult {
    let mut runner = HeadlessRunner::new(HeadlessConfig::default())
        .expect("create runner")
        .with_api(Arc::new(api));
    runner.load_events(script).expect("parse script");
    runner.run().await.expect("run script")
}
