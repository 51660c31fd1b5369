//! CLI TOML configuration tests
//!
//! Configuration file loading and how it merges beneath the command line.

use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use toml::Table;
use zapscan::app::cli::Args;
use zapscan::zap::api::PrimeWait;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("zapscan.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_file_fills_gaps_left_by_command_line() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        zap-url = "http://zap.file:8080"
        api-key = "file-key"
        target = "http://file.test"
        poll-interval = 9
        wait-passive = true
        prime-wait = 20
        "#,
    );

    let mut args = Args {
        target: Some("http://cli.test".to_string()),
        poll_interval: Some(1),
        ..Args::default()
    };
    args.merge_from(Args::load_config_file(Some(&path)).await.unwrap());
    let config = args.validate().unwrap();

    assert_eq!(config.zap_url.as_str(), "http://zap.file:8080/");
    assert_eq!(config.api_key, "file-key");
    assert_eq!(config.settings.target, "http://cli.test");
    assert_eq!(config.settings.poll.interval, Duration::from_secs(1));
    assert!(matches!(
        config.settings.prime,
        PrimeWait::UntilIdle { timeout, .. } if timeout == Duration::from_secs(20)
    ));
}

#[tokio::test]
async fn test_file_values_are_validated() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "api-key = \"k\"\ntarget = \"http://localhost\"\nreport-format = \"pdf\"\n",
    );

    let args = Args::load_config_file(Some(&path)).await.unwrap();
    let err = args.validate().unwrap_err();

    assert!(err.message().contains("pdf"));
}

#[tokio::test]
async fn test_file_errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "poll-interval = \"fast\"\n");

    let err = Args::load_config_file(Some(&path)).await.unwrap_err();

    assert!(err.message().contains("zapscan.toml"));
    assert!(err.message().contains("poll-interval"));
}

#[test]
fn test_color_key_loses_to_flag() {
    let mut config = Table::new();
    config.insert("color".to_string(), toml::Value::Boolean(true));
    let mut file_args = Args::default();
    Args::apply_toml_values(&mut file_args, &config).unwrap();

    let mut args = Args {
        no_color: true,
        ..Args::default()
    };
    args.merge_from(file_args);

    assert_eq!(args.color, Some(true));
    assert!(!args.use_color());
}

#[tokio::test]
async fn test_no_wait_passive_flag_beats_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "api-key = \"k\"\ntarget = \"http://localhost\"\nwait-passive = true\nprime-wait = 7\n",
    );
    let argv: Vec<String> = ["zapscan", "--no-wait-passive"].iter().map(|s| s.to_string()).collect();

    let mut args = Args::try_parse_styled(&argv, false).unwrap();
    args.merge_from(Args::load_config_file(Some(&path)).await.unwrap());

    assert_eq!(
        args.validate().unwrap().settings.prime,
        PrimeWait::Fixed(Duration::from_secs(7))
    );
}
