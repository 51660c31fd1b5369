//! Common test utilities: a mock ZAP API built on wiremock

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const API_KEY: &str = "integration-key";
pub const TARGET: &str = "http://localhost:5000";
pub const REPORT: &str = "<html><body>ZAP Scanning Report</body></html>";

/// Replies to status queries with a fixed sequence, repeating the last value
pub struct StatusSequence {
    values: Vec<&'static str>,
    next: AtomicUsize,
}

impl StatusSequence {
    pub fn new(values: &[&'static str]) -> Self {
        Self {
            values: values.to_vec(),
            next: AtomicUsize::new(0),
        }
    }
}

impl Respond for StatusSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let value = self.values[index.min(self.values.len() - 1)];
        ResponseTemplate::new(200).set_body_json(json!({ "status": value }))
    }
}

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Start a mock ZAP that runs a scan through the given status values
pub async fn mock_zap(statuses: &[&'static str]) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/JSON/core/view/version/"))
        .respond_with(ok(json!({"version": "2.14.0"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/JSON/core/action/accessUrl/"))
        .respond_with(ok(json!({"accessUrl": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/JSON/pscan/view/recordsToScan/"))
        .respond_with(ok(json!({"recordsToScan": "0"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/JSON/ascan/action/scan/"))
        .respond_with(ok(json!({"scan": "1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/JSON/ascan/view/status/"))
        .respond_with(StatusSequence::new(statuses))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/JSON/ascan/action/stop/"))
        .respond_with(ok(json!({"Result": "OK"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/JSON/core/view/alerts/"))
        .respond_with(ok(json!({
            "alerts": [
                {"alert": "Absence of Anti-CSRF Tokens", "riskdesc": "Medium (Low)"},
                {"alert": "Strict-Transport-Security Header Not Set", "riskdesc": "Low (High)"},
                {"alert": "Application Error Disclosure", "riskdesc": "Medium (Medium)"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/OTHER/core/other/htmlreport/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REPORT))
        .mount(&server)
        .await;

    server
}

/// Number of requests the server received for `endpoint`
pub async fn request_count(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}
