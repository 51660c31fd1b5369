//! CLI argument parsing tests
//!
//! Parsing through the public API, then validation into a run configuration.

use serial_test::serial;
use std::path::PathBuf;
use std::time::Duration;
use zapscan::app::cli::Args;
use zapscan::zap::api::{PrimeWait, ReportFormat};

fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("zapscan")
        .chain(args.iter().copied())
        .map(String::from)
        .collect()
}

#[test]
#[serial]
fn test_command_line_to_scan_config() {
    std::env::remove_var("ZAP_API_KEY");
    let args = Args::try_parse_styled(
        &argv(&[
            "-z",
            "http://zap.internal:8090",
            "-k",
            "secret",
            "-t",
            "https://shop.test/app",
            "-F",
            "xml",
            "--prime-wait",
            "0",
            "-i",
            "1",
        ]),
        false,
    )
    .unwrap();

    let config = args.validate().unwrap();

    assert_eq!(config.zap_url.as_str(), "http://zap.internal:8090/");
    assert_eq!(config.api_key, "secret");
    assert_eq!(config.settings.target, "https://shop.test/app");
    assert_eq!(config.settings.report_format, ReportFormat::Xml);
    assert_eq!(config.settings.report_file, PathBuf::from("zap_report.xml"));
    assert_eq!(config.settings.prime, PrimeWait::Fixed(Duration::ZERO));
    assert_eq!(config.settings.poll.interval, Duration::from_secs(1));
}

#[test]
#[serial]
fn test_api_key_from_environment() {
    std::env::set_var("ZAP_API_KEY", "from-env");
    let from_env = Args::try_parse_styled(&argv(&["-t", "http://localhost:5000"]), false);
    let from_flag =
        Args::try_parse_styled(&argv(&["-t", "http://localhost:5000", "-k", "from-flag"]), false);
    std::env::remove_var("ZAP_API_KEY");

    assert_eq!(from_env.unwrap().api_key.as_deref(), Some("from-env"));
    assert_eq!(from_flag.unwrap().api_key.as_deref(), Some("from-flag"));
}

#[test]
#[serial]
fn test_missing_api_key_fails_validation() {
    std::env::remove_var("ZAP_API_KEY");
    let args = Args::try_parse_styled(&argv(&["-t", "http://localhost:5000"]), false).unwrap();

    let err = args.validate().unwrap_err();

    assert!(err.message().contains("--api-key"));
}

#[test]
fn test_markdown_alias() {
    let args = Args::try_parse_styled(
        &argv(&["-k", "k", "-t", "http://localhost:5000", "-F", "markdown"]),
        false,
    )
    .unwrap();

    let settings = args.validate().unwrap().settings;

    assert_eq!(settings.report_format, ReportFormat::Markdown);
    assert_eq!(settings.report_file, PathBuf::from("zap_report.md"));
}

#[test]
fn test_verbosity_flags() {
    let args = Args::try_parse_styled(&argv(&["-vvv", "-q"]), false).unwrap();
    assert_eq!(args.verbosity(), 2);

    let args = Args::try_parse_styled(&argv(&["-qq"]), false).unwrap();
    assert_eq!(args.verbosity(), -2);
}

#[test]
fn test_invalid_values_rejected_by_parser() {
    assert!(Args::try_parse_styled(&argv(&["--poll-interval", "soon"]), false).is_err());
    assert!(Args::try_parse_styled(&argv(&["--log-format", "xml"]), false).is_err());
    assert!(Args::try_parse_styled(&argv(&["--bogus"]), false).is_err());
}
