//! zapscan: drive an OWASP ZAP active scan from the command line
//!
//! Opens the target through ZAP, runs an active scan, waits for it with a
//! bounded and cancellable poll loop, prints the alerts and saves the report.

pub mod app;
pub mod core;
pub mod zap;
