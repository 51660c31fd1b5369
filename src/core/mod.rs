//! Core services and infrastructure

pub mod error_handling;
pub mod logging;
pub mod retry;
pub mod shutdown;
pub mod styles; // centralized styling palette for console and help output
pub mod validation;
pub mod version;
