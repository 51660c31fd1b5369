//! CLI module
//!
//! Argument parsing, configuration file loading and validation.

pub mod args;
pub mod config;
pub mod validation;

pub use args::Args;
pub use validation::ScanConfig;
