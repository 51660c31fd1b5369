//! Core CLI arguments structure and basic functionality
//!
//! This module contains the `Args` struct definition and the parsing entry
//! points. TOML loading and validation are handled by separate modules.

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::core::styles::palette_to_clap;

pub const DEFAULT_ZAP_URL: &str = "http://localhost:8080";
pub const DEFAULT_REPORT_STEM: &str = "zap_report";
pub const DEFAULT_PRIME_WAIT_SECS: u64 = 2;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_ATTEMPTS: usize = 3;

// Command-line options
//
// Every value is optional here so that configuration file values can fill
// the gaps; defaults are applied during validation.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "zapscan")]
#[command(about = "Run an OWASP ZAP active scan against a web application and save the report")]
#[command(version)]
#[command(after_help = "Options may also be set in a TOML configuration file using the long option names as keys")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Base URL of the ZAP API [default: http://localhost:8080]
    #[arg(short = 'z', long = "zap-url", value_name = "URL")]
    pub zap_url: Option<String>,

    /// ZAP API key
    #[arg(
        short = 'k',
        long = "api-key",
        value_name = "KEY",
        env = "ZAP_API_KEY",
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// URL of the application to scan
    #[arg(short = 't', long = "target", value_name = "URL")]
    pub target: Option<String>,

    /// Report output file [default: zap_report.<format>]
    #[arg(short = 'o', long = "report-file", value_name = "FILE")]
    pub report_file: Option<PathBuf>,

    /// Report format
    #[arg(short = 'F', long = "report-format", value_name = "FORMAT", value_parser = ["html", "xml", "json", "md", "markdown"])]
    pub report_format: Option<String>,

    /// Seconds to wait after priming the target [default: 2]
    #[arg(long = "prime-wait", value_name = "SECONDS")]
    pub prime_wait: Option<u64>,

    /// Wait for the passive scan queue to drain (bounded by --prime-wait) instead of a fixed pause
    #[arg(long = "wait-passive", action = ArgAction::SetTrue, conflicts_with = "no_wait_passive")]
    pub wait_passive: bool,

    /// Use the fixed --prime-wait pause even if the configuration file enables --wait-passive
    #[arg(long = "no-wait-passive", action = ArgAction::SetTrue)]
    pub no_wait_passive: bool,

    /// Seconds between scan status checks [default: 5]
    #[arg(short = 'i', long = "poll-interval", value_name = "SECONDS")]
    pub poll_interval: Option<u64>,

    /// Give up on the active scan after this many seconds, 0 to wait forever [default: 3600]
    #[arg(short = 'T', long = "scan-timeout", value_name = "SECONDS")]
    pub scan_timeout: Option<u64>,

    /// Give up on the active scan after this many status checks
    #[arg(long = "max-polls", value_name = "COUNT")]
    pub max_polls: Option<u32>,

    /// Timeout for each API request in seconds [default: 60]
    #[arg(long = "request-timeout", value_name = "SECONDS")]
    pub request_timeout: Option<u64>,

    /// Attempts at reaching the API before giving up [default: 3]
    #[arg(long = "connect-attempts", value_name = "COUNT")]
    pub connect_attempts: Option<usize>,

    /// Force colored output
    #[arg(long = "color", action = ArgAction::SetTrue, conflicts_with = "no_color")]
    pub force_color: bool,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Color setting from the configuration file
    #[arg(skip)]
    pub color: Option<bool>,

    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'L', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse arguments with help output styled to match the console
    pub fn try_parse_styled(args: &[String], color: bool) -> Result<Self, clap::Error> {
        let color_choice = if color {
            clap::ColorChoice::Always
        } else {
            clap::ColorChoice::Never
        };
        let matches = Self::command()
            .styles(palette_to_clap(color))
            .color(color_choice)
            .try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }

    /// Fill every unset value from `fallback` (typically the configuration file)
    pub fn merge_from(&mut self, fallback: Args) {
        self.zap_url = self.zap_url.take().or(fallback.zap_url);
        self.api_key = self.api_key.take().or(fallback.api_key);
        self.target = self.target.take().or(fallback.target);
        self.report_file = self.report_file.take().or(fallback.report_file);
        self.report_format = self.report_format.take().or(fallback.report_format);
        self.prime_wait = self.prime_wait.or(fallback.prime_wait);
        if !(self.wait_passive || self.no_wait_passive) {
            self.wait_passive = fallback.wait_passive;
            self.no_wait_passive = fallback.no_wait_passive;
        }
        self.poll_interval = self.poll_interval.or(fallback.poll_interval);
        self.scan_timeout = self.scan_timeout.or(fallback.scan_timeout);
        self.max_polls = self.max_polls.or(fallback.max_polls);
        self.request_timeout = self.request_timeout.or(fallback.request_timeout);
        self.connect_attempts = self.connect_attempts.or(fallback.connect_attempts);
        self.color = self.color.or(fallback.color);
        self.log_level = self.log_level.take().or(fallback.log_level);
        self.log_format = self.log_format.take().or(fallback.log_format);
        self.log_file = self.log_file.take().or(fallback.log_file);
    }

    /// Net verbosity: each -v raises the log level one step, each -q lowers it
    pub fn verbosity(&self) -> i8 {
        self.verbose.min(10) as i8 - self.quiet.min(10) as i8
    }

    /// Resolve colored output: flags, then configuration, then NO_COLOR and TTY detection
    pub fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        if self.force_color {
            return true;
        }
        self.color.unwrap_or_else(|| {
            std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
        })
    }

    /// Colour hint for help and usage errors, before anything is parsed
    pub fn color_hint(args: &[String]) -> bool {
        if args.iter().any(|a| a == "--no-color") {
            return false;
        }
        args.iter().any(|a| a == "--color")
            || (std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal())
    }

    /// Log file to use, honouring the "none" / "-" values that disable file logging
    pub fn effective_log_file(&self) -> Option<String> {
        self.log_file
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .filter(|p| !(p.eq_ignore_ascii_case("none") || p == "-"))
    }
}
