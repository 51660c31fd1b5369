//! CLI argument validation
//!
//! Turns merged `Args` into a `ScanConfig`: required values present, URLs
//! well formed, intervals positive, defaults filled in.

use reqwest::Url;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::core::retry::RetryPolicy;
use crate::core::validation::{
    validate_http_url, validate_positive, validate_required, ValidationError,
};
use crate::zap::api::{PollPolicy, PrimeWait, ReportFormat, ScanSettings};

use super::args::*;

/// Passive queue polling cadence while `--wait-passive` is active
pub const PASSIVE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Fully validated configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub zap_url: Url,
    pub api_key: String,
    pub request_timeout: Duration,
    pub connect_retry: RetryPolicy,
    pub settings: ScanSettings,
}

impl Args {
    /// Validate arguments and build the run configuration
    pub fn validate(&self) -> Result<ScanConfig, ValidationError> {
        let zap_url = validate_http_url(
            "zap-url",
            self.zap_url.as_deref().unwrap_or(DEFAULT_ZAP_URL),
        )?;
        let api_key = validate_required("api-key", self.api_key.as_deref())?;
        let target = validate_required("target", self.target.as_deref())?;
        validate_http_url("target", &target)?;

        let report_format = self.validate_report_format()?;
        let report_file = self.report_file.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{}.{}", DEFAULT_REPORT_STEM, report_format.extension()))
        });
        if report_file.as_os_str().is_empty() || report_file.is_dir() {
            return Err(ValidationError::new(&format!(
                "--report-file '{}' is not a writable file path",
                report_file.display()
            )));
        }

        let prime_wait =
            Duration::from_secs(self.prime_wait.unwrap_or(DEFAULT_PRIME_WAIT_SECS));
        let prime = if self.wait_passive && !self.no_wait_passive {
            PrimeWait::UntilIdle {
                timeout: prime_wait,
                interval: PASSIVE_POLL_INTERVAL,
            }
        } else {
            PrimeWait::Fixed(prime_wait)
        };

        let poll_interval = validate_positive(
            "poll-interval",
            self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        )?;
        let scan_timeout = self.scan_timeout.unwrap_or(DEFAULT_SCAN_TIMEOUT_SECS);
        if let Some(max_polls) = self.max_polls {
            validate_positive("max-polls", max_polls as u64)?;
        }
        let request_timeout = validate_positive(
            "request-timeout",
            self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )?;
        let connect_attempts = validate_positive(
            "connect-attempts",
            self.connect_attempts.unwrap_or(DEFAULT_CONNECT_ATTEMPTS) as u64,
        )?;

        Ok(ScanConfig {
            zap_url,
            api_key,
            request_timeout: Duration::from_secs(request_timeout),
            connect_retry: RetryPolicy::new(connect_attempts as usize, Duration::from_secs(1)),
            settings: ScanSettings {
                target,
                report_file,
                report_format,
                prime,
                poll: PollPolicy {
                    interval: Duration::from_secs(poll_interval),
                    timeout: (scan_timeout > 0).then(|| Duration::from_secs(scan_timeout)),
                    max_polls: self.max_polls,
                },
            },
        })
    }

    fn validate_report_format(&self) -> Result<ReportFormat, ValidationError> {
        match self.report_format.as_deref() {
            None => Ok(ReportFormat::default()),
            Some(name) => ReportFormat::from_str(name).map_err(|_| {
                ValidationError::new(&format!(
                    "--report-format '{}' is not one of html, xml, json, md",
                    name
                ))
            }),
        }
    }
}
