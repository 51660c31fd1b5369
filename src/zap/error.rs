//! Scanner Error Types

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while driving the scanner API
#[derive(Debug, Error)]
pub enum ZapError {
    /// Invalid client configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The scanner could not be reached
    #[error("Cannot reach scanner at {url}: {message}")]
    Connection { url: String, message: String },

    /// The scanner answered with a non-success status
    #[error("Scanner API error on {endpoint} (HTTP {status}): {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The scanner answered with a body we could not interpret
    #[error("Unexpected response from {endpoint}: {message}")]
    Response { endpoint: String, message: String },

    /// Scan progress was not a percentage between 0 and 100
    #[error("Scan {scan_id} reported an invalid status '{value}'")]
    InvalidStatus { scan_id: String, value: String },

    /// The scan did not finish within its limits
    #[error("Scan {scan_id} did not complete within {elapsed:?} ({polls} status checks, last progress {last_progress}%)")]
    Timeout {
        scan_id: String,
        elapsed: Duration,
        polls: u32,
        last_progress: u8,
    },

    /// Shutdown was requested during one of the waits
    #[error("Cancelled while {during}")]
    Cancelled { during: String },

    /// Writing the report failed
    #[error("Failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ZapError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ZapError::Configuration {
            message: message.into(),
        }
    }

    pub fn response(endpoint: &str, message: impl Into<String>) -> Self {
        ZapError::Response {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// True for the variants produced by the bounded poll loop
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ZapError::Timeout { .. } | ZapError::Cancelled { .. })
    }
}

impl crate::core::error_handling::ContextualError for ZapError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            ZapError::Configuration { .. } | ZapError::Timeout { .. } | ZapError::Cancelled { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ZapError::Configuration { message } => Some(message),
            ZapError::Timeout { .. } => {
                Some("Active scan did not complete in time; raise --scan-timeout or --max-polls")
            }
            ZapError::Cancelled { .. } => Some("Scan cancelled by signal"),
            _ => None,
        }
    }
}

pub type ZapResult<T> = Result<T, ZapError>;
