//! Validation utilities for CLI arguments and configuration values
//!
//! Provides the shared `ValidationError` type and the small value checks used
//! when turning raw arguments into a typed scan configuration.

use crate::core::error_handling::ContextualError;
use reqwest::Url;
use thiserror::Error;

/// A configuration or argument value failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Validate an http(s) URL, naming the offending option in the error
pub fn validate_http_url(option: &str, value: &str) -> Result<Url, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(&format!("--{} cannot be empty", option)));
    }

    let url = Url::parse(trimmed).map_err(|e| {
        ValidationError::new(&format!("--{}: '{}' is not a valid URL: {}", option, trimmed, e))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::new(&format!(
                "--{}: unsupported URL scheme '{}' (expected http or https)",
                option, other
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(ValidationError::new(&format!(
            "--{}: '{}' has no host",
            option, trimmed
        )));
    }

    Ok(url)
}

/// Validate a value that must be greater than zero
pub fn validate_positive(option: &str, value: u64) -> Result<u64, ValidationError> {
    if value == 0 {
        Err(ValidationError::new(&format!(
            "--{} must be greater than 0",
            option
        )))
    } else {
        Ok(value)
    }
}

/// Validate a required, non-blank string value
pub fn validate_required(option: &str, value: Option<&str>) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::new(&format!(
            "--{} is required (command line, environment or configuration file)",
            option
        ))),
    }
}
