//! Binary tests
//!
//! Runs the compiled executable with an isolated configuration directory.

use crate::common::{mock_zap, request_count, API_KEY, REPORT, TARGET};
use std::process::{Command, Output};
use tempfile::TempDir;

fn zapscan(home: &TempDir, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_zapscan"));
    cmd.args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("ZAP_API_KEY");
    cmd
}

async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_binary_runs_scan_and_saves_report() {
    let server = mock_zap(&["100"]).await;
    let home = TempDir::new().unwrap();
    let report = home.path().join("scan.html");
    let report_arg = report.to_string_lossy().to_string();
    let uri = server.uri();

    let output = run(zapscan(
        &home,
        &[
            "--zap-url",
            &uri,
            "--api-key",
            API_KEY,
            "--target",
            TARGET,
            "--report-file",
            &report_arg,
            "--prime-wait",
            "0",
            "--poll-interval",
            "1",
        ],
    ))
    .await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.starts_with(&format!("Accessing target {}\n", TARGET)));
    assert!(stdout.contains("Active Scan completed!\n"));
    assert!(stdout.contains("Found 3 alerts:\n"));
    assert!(stdout.ends_with(&format!("Report saved as {}\n", report.display())));
    assert_eq!(std::fs::read_to_string(&report).unwrap(), REPORT);
    assert_eq!(request_count(&server, "/JSON/ascan/action/scan/").await, 1);
}

#[tokio::test]
async fn test_binary_reads_config_file() {
    let server = mock_zap(&["100"]).await;
    let home = TempDir::new().unwrap();
    let report = home.path().join("from-config.html");
    let config = home.path().join("scan.toml");
    std::fs::write(
        &config,
        format!(
            "zap-url = \"{}\"\napi-key = \"{}\"\ntarget = \"{}\"\nreport-file = \"{}\"\nprime-wait = 0\n",
            server.uri(),
            API_KEY,
            TARGET,
            report.display()
        ),
    )
    .unwrap();
    let config_arg = config.to_string_lossy().to_string();

    let output = run(zapscan(&home, &["--config-file", &config_arg])).await;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(std::fs::read_to_string(&report).unwrap(), REPORT);
}

#[tokio::test]
async fn test_binary_missing_target_is_usage_error() {
    let home = TempDir::new().unwrap();

    let output = run(zapscan(&home, &["--api-key", API_KEY])).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_binary_unknown_option_is_usage_error() {
    let home = TempDir::new().unwrap();

    let output = run(zapscan(&home, &["--targte", TARGET])).await;

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn test_binary_unreachable_scanner_fails() {
    let home = TempDir::new().unwrap();
    let report = home.path().join("never.html");
    let report_arg = report.to_string_lossy().to_string();

    let output = run(zapscan(
        &home,
        &[
            "--zap-url",
            "http://127.0.0.1:9",
            "--api-key",
            API_KEY,
            "--target",
            TARGET,
            "--report-file",
            &report_arg,
            "--connect-attempts",
            "1",
        ],
    ))
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("FATAL"));
    assert!(!report.exists());
}
