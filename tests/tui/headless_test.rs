//! Tests for headless mode through the built binary.

use super::common::run_binary;
use std::io::Write;

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_binary(&["--headless", "--mock-api", "--events", "settle"], &[]);

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(stdout.contains("Events: 1 executed"), "{stdout}");
    assert!(stdout.contains("700000"), "{stdout}");
}

#[test]
fn test_headless_type_event_json() {
    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--mock-api",
            "--events",
            "type:count blocks",
            "--output",
            "json",
        ],
        &[],
    );

    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["state"]["input_text"], "count blocks");
    assert_eq!(parsed["events_executed"], 1);
}

#[test]
fn test_headless_assertion_pass_and_fail() {
    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--mock-api",
            "--events",
            "type:hello,assert:contains:hello",
            "--output",
            "json",
        ],
        &[],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains(r#""passed": 1"#));

    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--mock-api",
            "--events",
            "type:hello,assert:contains:goodbye",
        ],
        &[],
    );
    assert_eq!(code, 1, "Should exit with code 1 on assertion failure");
    assert!(stdout.contains("FAILED assert:contains:goodbye"), "{stdout}");
}

#[test]
fn test_headless_mock_failures() {
    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--mock-api",
            "--mock-fail",
            "all",
            "--events",
            "settle,assert:contains:Failed to fetch database info,\
             key:enter,settle,assert:contains:Failed to process query",
        ],
        &[],
    );

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_headless_custom_size() {
    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--mock-api",
            "--size",
            "120x40",
            "--events",
            "settle",
            "--output",
            "json",
        ],
        &[],
    );

    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let lines = parsed["screen_lines"].as_array().unwrap();
    assert!(lines.len() <= 40);
    assert!(lines
        .iter()
        .all(|l| l.as_str().unwrap().chars().count() <= 120));
}

#[test]
fn test_headless_frames_output() {
    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--mock-api",
            "--events",
            "type:hi,key:enter",
            "--output",
            "frames",
        ],
        &[],
    );

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 2 (key:enter) ==="));
    assert!(stdout.contains("Total: 3 frames"));
}

#[test]
fn test_headless_script_file() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "# ask for the average block size").unwrap();
    writeln!(script, "settle").unwrap();
    writeln!(script, "type:avg block size").unwrap();
    writeln!(script, "key:enter").unwrap();
    writeln!(script, "settle").unwrap();
    writeln!(script, "assert:contains-exact:SELECT AVG(size) FROM blocks LIMIT 100").unwrap();
    let path = script.path().to_str().unwrap();

    let (code, stdout, _) =
        run_binary(&["--headless", "--mock-api", "--script", path], &[]);
    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Assertions: 1 passed, 0 failed"));
}

#[test]
fn test_headless_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("screen.txt");
    let out_str = out.to_str().unwrap();

    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--mock-api",
            "--events",
            "settle",
            "--output-file",
            out_str,
        ],
        &[],
    );

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("Database Information"));
}

#[test]
fn test_headless_requires_events() {
    let (code, _, stderr) = run_binary(&["--headless", "--mock-api"], &[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--headless requires --events or --script"));
}

#[test]
fn test_invalid_event_is_reported() {
    let (code, _, stderr) = run_binary(
        &["--headless", "--mock-api", "--events", "click:submit"],
        &[],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown event type"), "{stderr}");
}

#[test]
fn test_api_url_precedence() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[api]").unwrap();
    writeln!(config, "base_url = \"http://from-file.invalid:1\"").unwrap();
    let config_path = config.path().to_str().unwrap();

    // Environment beats the file
    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--config",
            config_path,
            "--events",
            "assert:contains:from-env.invalid",
        ],
        &[("BLOCK_GLANCE_API_URL", "http://from-env.invalid:2")],
    );
    assert_eq!(code, 0, "{stdout}");

    // The flag beats the environment
    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--config",
            config_path,
            "--api-url",
            "http://from-flag.invalid:3",
            "--events",
            "assert:contains:from-flag.invalid",
        ],
        &[("BLOCK_GLANCE_API_URL", "http://from-env.invalid:2")],
    );
    assert_eq!(code, 0, "{stdout}");

    // The file beats the default
    let (code, stdout, _) = run_binary(
        &[
            "--headless",
            "--config",
            config_path,
            "--events",
            "assert:contains:from-file.invalid",
        ],
        &[],
    );
    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_zero_timeout_is_rejected() {
    let (code, _, stderr) = run_binary(
        &["--headless", "--mock-api", "--events", "settle"],
        &[("BLOCK_GLANCE_TIMEOUT_SECS", "0")],
    );
    assert_eq!(code, 1);
    assert!(
        stderr.contains("Request timeout must be at least 1 second"),
        "{stderr}"
    );
}
