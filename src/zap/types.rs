//! Scanner data types
//!
//! Everything here crosses the API boundary: the scan handle, its progress,
//! the alerts and the rendered report. None of it is owned locally beyond a
//! single run.

use serde::Deserialize;
use std::fmt;
use strum_macros::{Display, EnumString};

use super::error::{ZapError, ZapResult};

/// Opaque identifier of a started active scan
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanId(String);

impl ScanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Active scan progress as a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Progress(u8);

impl Progress {
    pub const COMPLETE: Progress = Progress(100);

    /// Parse a raw status value; anything that is not an integer in 0..=100
    /// is rejected rather than treated as "still running".
    pub fn parse(scan_id: &ScanId, raw: &str) -> ZapResult<Self> {
        let invalid = || ZapError::InvalidStatus {
            scan_id: scan_id.to_string(),
            value: raw.to_string(),
        };
        let value: u32 = raw.trim().parse().map_err(|_| invalid())?;
        if value > 100 {
            return Err(invalid());
        }
        Ok(Progress(value as u8))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self >= Self::COMPLETE
    }
}

impl From<u8> for Progress {
    fn from(value: u8) -> Self {
        Progress(value.min(100))
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A single finding reported by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Alert {
    /// Alert name
    pub alert: String,
    /// Risk and confidence, e.g. "Medium (High)"
    #[serde(rename = "riskdesc", default)]
    pub risk_desc: String,
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "pluginId", default)]
    pub plugin_id: Option<String>,
}

impl Alert {
    pub fn new(alert: impl Into<String>, risk_desc: impl Into<String>) -> Self {
        Self {
            alert: alert.into(),
            risk_desc: risk_desc.into(),
            risk: None,
            confidence: None,
            url: None,
            plugin_id: None,
        }
    }

    /// Fill an absent `riskdesc` from the separate risk and confidence fields
    pub fn with_derived_risk_desc(mut self) -> Self {
        if self.risk_desc.trim().is_empty() {
            if let Some(risk) = &self.risk {
                self.risk_desc = match &self.confidence {
                    Some(confidence) => format!("{} ({})", risk, confidence),
                    None => risk.clone(),
                };
            }
        }
        self
    }
}

/// Report renderings the scanner can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportFormat {
    #[default]
    Html,
    Xml,
    Json,
    #[strum(serialize = "md", serialize = "markdown", to_string = "md")]
    Markdown,
}

impl ReportFormat {
    /// Path of the report endpoint below the API base URL
    pub fn endpoint(self) -> String {
        format!("OTHER/core/other/{}report/", self)
    }

    /// Conventional file extension for the rendering
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Xml => "xml",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

/// A rendered report, kept byte-for-byte as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub format: ReportFormat,
    pub body: Vec<u8>,
}

impl Report {
    pub fn new(format: ReportFormat, body: impl Into<Vec<u8>>) -> Self {
        Self {
            format,
            body: body.into(),
        }
    }
}
