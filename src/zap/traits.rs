//! Scanner service trait
//!
//! The orchestrator only talks to the scanner through this trait so that a
//! stub can stand in for a live ZAP instance.

use async_trait::async_trait;

use super::error::ZapResult;
use super::types::{Alert, Progress, Report, ReportFormat, ScanId};

/// Remote control operations of the scanning service
#[async_trait]
pub trait ScanService: Send + Sync {
    /// Scanner version; doubles as a reachability and API key check
    async fn version(&self) -> ZapResult<String>;

    /// Have the scanner fetch `url` so it enters the site tree
    async fn access_url(&self, url: &str) -> ZapResult<()>;

    /// Number of records still waiting for passive analysis
    async fn records_to_scan(&self) -> ZapResult<u64>;

    /// Start an active scan against `url`
    async fn start_active_scan(&self, url: &str) -> ZapResult<ScanId>;

    /// Current progress of an active scan
    async fn scan_status(&self, scan_id: &ScanId) -> ZapResult<Progress>;

    /// Ask the scanner to abandon an active scan
    async fn stop_scan(&self, scan_id: &ScanId) -> ZapResult<()>;

    /// All alerts recorded below `base_url`, in scanner order
    async fn alerts(&self, base_url: &str) -> ZapResult<Vec<Alert>>;

    /// Whole-session report in the requested rendering
    async fn report(&self, format: ReportFormat) -> ZapResult<Report>;
}
