//! Human-readable progress output for a scan run

use std::io::Write;
use std::path::Path;

use crate::core::styles::StyleRole;

use super::types::{Alert, Progress};

/// Writes scan progress lines to any sink (stdout in production, a buffer in tests)
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<std::io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(std::io::stdout(), color)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Console output is informational; a closed stdout must not abort the scan
    fn line(&mut self, text: &str) {
        if writeln!(self.out, "{}", text).and_then(|_| self.out.flush()).is_err() {
            log::debug!("Console output dropped: {}", text);
        }
    }

    pub fn accessing_target(&mut self, target: &str) {
        let url = StyleRole::Url.paint(target, self.color);
        self.line(&format!("Accessing target {}", url));
    }

    pub fn scan_starting(&mut self) {
        self.line("Starting Active Scan...");
    }

    pub fn scan_progress(&mut self, progress: Progress) {
        let pct = StyleRole::Progress.paint(&progress.to_string(), self.color);
        self.line(&format!("Scan progress: {}", pct));
    }

    pub fn scan_complete(&mut self) {
        let text = StyleRole::Success.paint("Active Scan completed!", self.color);
        self.line(&text);
    }

    pub fn alerts(&mut self, alerts: &[Alert]) {
        let heading = format!("Found {} alerts:", alerts.len());
        let heading = StyleRole::Heading.paint(&heading, self.color);
        self.line(&heading);
        for alert in alerts {
            let risk = StyleRole::for_risk(&alert.risk_desc).paint(&alert.risk_desc, self.color);
            self.line(&format!("- {} ({})", alert.alert, risk));
        }
    }

    pub fn report_saved(&mut self, path: &Path) {
        let shown = StyleRole::Url.paint(&path.display().to_string(), self.color);
        self.line(&format!("Report saved as {}", shown));
    }
}
