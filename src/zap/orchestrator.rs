//! Scan orchestration
//!
//! Drives one scan end to end: prime the target, start the active scan, wait
//! for it to finish, list the alerts and save the report. Every wait is
//! bounded and races against the shutdown receiver.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{sleep, Instant};

use crate::core::retry::{retry_async, RetryPolicy};

use super::console::Console;
use super::error::{ZapError, ZapResult};
use super::traits::ScanService;
use super::types::{Alert, Progress, Report, ReportFormat, ScanId};

/// How to let the scanner digest the primed request before scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimeWait {
    /// Sleep for a fixed duration
    Fixed(Duration),
    /// Poll the passive scan queue until it is empty, at most `timeout`
    UntilIdle { timeout: Duration, interval: Duration },
}

/// Bounds for the active scan status loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Maximum time spent waiting; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Maximum number of status queries
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Some(Duration::from_secs(3600)),
            max_polls: None,
        }
    }
}

/// Everything a run needs besides the service itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub target: String,
    pub report_file: PathBuf,
    pub report_format: ReportFormat,
    pub prime: PrimeWait,
    pub poll: PollPolicy,
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub scan_id: ScanId,
    pub alerts: Vec<Alert>,
    pub report_path: PathBuf,
    pub report_bytes: usize,
    pub status_polls: u32,
}

/// Sequences a single scan against a [`ScanService`]
pub struct ScanOrchestrator<'a, S: ScanService + ?Sized> {
    service: &'a S,
    settings: ScanSettings,
}

impl<'a, S: ScanService + ?Sized> ScanOrchestrator<'a, S> {
    pub fn new(service: &'a S, settings: ScanSettings) -> Self {
        Self { service, settings }
    }

    /// Confirm the scanner answers and accepts the API key
    pub async fn check_service(&self, policy: RetryPolicy) -> ZapResult<String> {
        let version = retry_async("Scanner API probe", policy, || self.service.version()).await?;
        log::info!("Connected to ZAP {}", version);
        Ok(version)
    }

    /// Run the whole workflow
    ///
    /// Any service error aborts the run at the step where it happened; later
    /// steps are not attempted. If the status loop times out or is cancelled
    /// the scanner is asked to stop the scan before the error is returned.
    pub async fn run<W: Write + Send>(
        &self,
        console: &mut Console<W>,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> ZapResult<ScanSummary> {
        let target = self.settings.target.as_str();

        console.accessing_target(target);
        self.service.access_url(target).await?;
        self.wait_after_priming(shutdown).await?;

        console.scan_starting();
        let scan_id = self.service.start_active_scan(target).await?;
        log::info!("Active scan {} started against {}", scan_id, target);

        let status_polls = match self.wait_for_completion(&scan_id, console, shutdown).await {
            Ok(polls) => polls,
            Err(e) if e.is_interrupted() => {
                self.stop_scan(&scan_id).await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        console.scan_complete();

        let alerts = self.service.alerts(target).await?;
        log::debug!("Retrieved {} alerts for {}", alerts.len(), target);
        console.alerts(&alerts);

        let report = self.service.report(self.settings.report_format).await?;
        let report_bytes = write_report(&self.settings.report_file, &report).await?;
        console.report_saved(&self.settings.report_file);

        Ok(ScanSummary {
            scan_id,
            alerts,
            report_path: self.settings.report_file.clone(),
            report_bytes,
            status_polls,
        })
    }

    async fn wait_after_priming(&self, shutdown: &mut broadcast::Receiver<()>) -> ZapResult<()> {
        match &self.settings.prime {
            PrimeWait::Fixed(pause) => {
                if sleep_or_shutdown(*pause, shutdown).await {
                    return Err(ZapError::Cancelled {
                        during: "waiting after priming the target".to_string(),
                    });
                }
                Ok(())
            }
            PrimeWait::UntilIdle { timeout, interval } => {
                self.wait_for_passive_queue(*timeout, *interval, shutdown)
                    .await
            }
        }
    }

    async fn wait_for_passive_queue(
        &self,
        timeout: Duration,
        interval: Duration,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> ZapResult<()> {
        let deadline = Instant::now() + timeout;
        let cancelled = || ZapError::Cancelled {
            during: "waiting for passive scanning".to_string(),
        };

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.service.records_to_scan().await {
                Ok(0) => {
                    log::debug!("Passive scan queue is empty");
                    return Ok(());
                }
                Ok(pending) if remaining.is_zero() => {
                    log::warn!(
                        "Passive scan still has {} records after {:?}; continuing",
                        pending,
                        timeout
                    );
                    return Ok(());
                }
                Ok(pending) => {
                    log::debug!("Passive scan has {} records pending", pending);
                    if sleep_or_shutdown(interval.min(remaining), shutdown).await {
                        return Err(cancelled());
                    }
                }
                Err(e) => {
                    // Fall back to a blind pause for the rest of the window
                    log::warn!("Cannot read passive scan queue ({}); pausing {:?}", e, remaining);
                    if sleep_or_shutdown(remaining, shutdown).await {
                        return Err(cancelled());
                    }
                    return Ok(());
                }
            }
        }
    }

    async fn wait_for_completion<W: Write + Send>(
        &self,
        scan_id: &ScanId,
        console: &mut Console<W>,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> ZapResult<u32> {
        let policy = &self.settings.poll;
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            let progress: Progress = self.service.scan_status(scan_id).await?;
            polls += 1;
            log::debug!("Scan {} status check {}: {}", scan_id, polls, progress);
            if progress.is_complete() {
                return Ok(polls);
            }
            console.scan_progress(progress);

            let elapsed = started.elapsed();
            let out_of_polls = policy.max_polls.is_some_and(|max| polls >= max);
            let out_of_time = policy.timeout.is_some_and(|limit| elapsed >= limit);
            if out_of_polls || out_of_time {
                return Err(ZapError::Timeout {
                    scan_id: scan_id.to_string(),
                    elapsed,
                    polls,
                    last_progress: progress.percent(),
                });
            }

            // Never sleep past the deadline
            let pause = match policy.timeout {
                Some(limit) => policy.interval.min(limit.saturating_sub(elapsed)),
                None => policy.interval,
            };
            if sleep_or_shutdown(pause, shutdown).await {
                return Err(ZapError::Cancelled {
                    during: format!("waiting for scan {} ({})", scan_id, progress),
                });
            }
        }
    }

    async fn stop_scan(&self, scan_id: &ScanId) {
        match self.service.stop_scan(scan_id).await {
            Ok(()) => log::info!("Asked scanner to stop scan {}", scan_id),
            Err(e) => log::warn!("Could not stop scan {}: {}", scan_id, e),
        }
    }
}

/// Sleep for `duration`; returns true if shutdown was requested first
///
/// A closed channel means nobody can request shutdown any more, so the full
/// duration is slept.
async fn sleep_or_shutdown(duration: Duration, shutdown: &mut broadcast::Receiver<()>) -> bool {
    if duration.is_zero() {
        return false;
    }
    let pause = sleep(duration);
    tokio::pin!(pause);

    tokio::select! {
        _ = &mut pause => false,
        received = shutdown.recv() => match received {
            Err(RecvError::Closed) => {
                pause.await;
                false
            }
            Ok(()) | Err(RecvError::Lagged(_)) => true,
        },
    }
}

/// Write a report verbatim, replacing any existing file
pub async fn write_report(path: &Path, report: &Report) -> ZapResult<usize> {
    tokio::fs::write(path, &report.body)
        .await
        .map_err(|source| ZapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Wrote {} bytes to {}", report.body.len(), path.display());
    Ok(report.body.len())
}
