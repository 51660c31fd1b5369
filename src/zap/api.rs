//! ZAP API
//!
//! Public surface of the scan component, re-exported in one place.

pub use crate::zap::client::ZapClient;
pub use crate::zap::console::Console;
pub use crate::zap::error::{ZapError, ZapResult};
pub use crate::zap::orchestrator::{
    write_report, PollPolicy, PrimeWait, ScanOrchestrator, ScanSettings, ScanSummary,
};
pub use crate::zap::traits::ScanService;
pub use crate::zap::types::{Alert, Progress, Report, ReportFormat, ScanId};
