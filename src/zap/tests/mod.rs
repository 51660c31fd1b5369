//! Test modules for the scan component
//!
//! The orchestrator suites run against an in-memory stub; the client suite
//! runs against a mock HTTP server.

pub mod helpers;
