//! ZAP Scan Component
//!
//! Everything needed to drive an OWASP ZAP instance through one active scan:
//!
//! - **ScanService**: the remote control operations the workflow relies on
//! - **ZapClient**: `ScanService` over the ZAP HTTP API
//! - **ScanOrchestrator**: prime → start → poll → alerts → report, with
//!   bounded, cancellable waits
//! - **Console**: the human-readable progress lines

pub mod api;
pub mod client;
pub mod console;
pub mod error;
pub mod orchestrator;
pub mod traits;
pub mod types;

pub use error::{ZapError, ZapResult};

#[cfg(test)]
mod tests;
