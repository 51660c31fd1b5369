//! Shared test helpers: an in-memory scanner stub and default settings

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::zap::error::{ZapError, ZapResult};
use crate::zap::orchestrator::{PollPolicy, PrimeWait, ScanSettings};
use crate::zap::traits::ScanService;
use crate::zap::types::{Alert, Progress, Report, ReportFormat, ScanId};

pub const TARGET: &str = "http://localhost:5000";

/// Scripted stand-in for a ZAP instance that records every call
#[derive(Default)]
pub struct StubService {
    statuses: Mutex<VecDeque<u8>>,
    last_status: Mutex<u8>,
    raw_status: Option<String>,
    passive_queue: Mutex<VecDeque<u64>>,
    passive_unavailable: bool,
    alerts: Vec<Alert>,
    report_body: Vec<u8>,
    refuse_start: bool,
    calls: Mutex<Vec<&'static str>>,
}

impl StubService {
    pub fn new() -> Self {
        Self {
            report_body: b"<html>OK</html>".to_vec(),
            ..Default::default()
        }
    }

    /// Status values returned in order; the last one repeats once exhausted
    pub fn with_statuses(self, statuses: &[u8]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().copied().collect();
        self
    }

    /// Return this raw value from every status query
    pub fn with_raw_status(mut self, raw: &str) -> Self {
        self.raw_status = Some(raw.to_string());
        self
    }

    pub fn with_passive_queue(self, pending: &[u64]) -> Self {
        *self.passive_queue.lock().unwrap() = pending.iter().copied().collect();
        self
    }

    pub fn without_passive_queue(mut self) -> Self {
        self.passive_unavailable = true;
        self
    }

    pub fn with_alerts(mut self, alerts: Vec<Alert>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_report(mut self, body: &str) -> Self {
        self.report_body = body.as_bytes().to_vec();
        self
    }

    pub fn refusing_start(mut self) -> Self {
        self.refuse_start = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl ScanService for StubService {
    async fn version(&self) -> ZapResult<String> {
        self.record("version");
        Ok("2.14.0".to_string())
    }

    async fn access_url(&self, _url: &str) -> ZapResult<()> {
        self.record("access_url");
        Ok(())
    }

    async fn records_to_scan(&self) -> ZapResult<u64> {
        self.record("records_to_scan");
        if self.passive_unavailable {
            return Err(ZapError::Api {
                endpoint: "JSON/pscan/view/recordsToScan/".to_string(),
                status: 400,
                message: "No Implementor (bad_view)".to_string(),
            });
        }
        Ok(self.passive_queue.lock().unwrap().pop_front().unwrap_or(0))
    }

    async fn start_active_scan(&self, _url: &str) -> ZapResult<ScanId> {
        self.record("start_active_scan");
        if self.refuse_start {
            return Err(ZapError::Connection {
                url: "http://localhost:8080/".to_string(),
                message: "Connection refused".to_string(),
            });
        }
        Ok(ScanId::new("0"))
    }

    async fn scan_status(&self, scan_id: &ScanId) -> ZapResult<Progress> {
        self.record("scan_status");
        if let Some(raw) = &self.raw_status {
            return Progress::parse(scan_id, raw);
        }
        let mut last = self.last_status.lock().unwrap();
        if let Some(next) = self.statuses.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(Progress::from(*last))
    }

    async fn stop_scan(&self, _scan_id: &ScanId) -> ZapResult<()> {
        self.record("stop_scan");
        Ok(())
    }

    async fn alerts(&self, _base_url: &str) -> ZapResult<Vec<Alert>> {
        self.record("alerts");
        Ok(self.alerts.clone())
    }

    async fn report(&self, format: ReportFormat) -> ZapResult<Report> {
        self.record("report");
        Ok(Report::new(format, self.report_body.clone()))
    }
}

/// Settings with no priming pause and the default 5 second poll interval
pub fn settings(report_file: &Path) -> ScanSettings {
    ScanSettings {
        target: TARGET.to_string(),
        report_file: report_file.to_path_buf(),
        report_format: ReportFormat::Html,
        prime: PrimeWait::Fixed(Duration::ZERO),
        poll: PollPolicy::default(),
    }
}
