//! HTTP client for the ZAP remote control API
//!
//! JSON views and actions live under `{base}/JSON/{component}/{type}/{name}/`
//! and reports under `{base}/OTHER/core/other/{format}report/`. Every request
//! carries the API key in the `X-ZAP-API-Key` header.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

use super::error::{ZapError, ZapResult};
use super::traits::ScanService;
use super::types::{Alert, Progress, Report, ReportFormat, ScanId};

pub const API_KEY_HEADER: &str = "X-ZAP-API-Key";

/// Client for a single ZAP instance
#[derive(Debug, Clone)]
pub struct ZapClient {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
}

impl ZapClient {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: Url, api_key: impl Into<String>, timeout: Duration) -> ZapResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ZapError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        // Url::join replaces the last path segment unless the base ends in '/'
        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> ZapResult<Url> {
        let mut url = self.base_url.join(endpoint).map_err(|e| {
            ZapError::configuration(format!("Invalid API endpoint '{}': {}", endpoint, e))
        })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter().copied());
        }
        Ok(url)
    }

    async fn send(&self, endpoint: &str, params: &[(&str, &str)]) -> ZapResult<reqwest::Response> {
        let url = self.endpoint_url(endpoint, params)?;
        log::debug!("GET {}", url.path());

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ZapError::Connection {
                url: self.base_url.to_string(),
                message: if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ZapError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: api_error_message(status, &body),
        })
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> ZapResult<Value> {
        let body = self
            .send(endpoint, params)
            .await?
            .text()
            .await
            .map_err(|e| ZapError::response(endpoint, e.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|e| ZapError::response(endpoint, format!("invalid JSON: {}", e)))
    }
}

/// Extract a scalar field; ZAP encodes most scalars as JSON strings
fn scalar_field(endpoint: &str, value: &Value, key: &str) -> ZapResult<String> {
    match value.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(ZapError::response(
            endpoint,
            format!("field '{}' has unexpected value {}", key, other),
        )),
        None => Err(ZapError::response(
            endpoint,
            format!("missing field '{}'", key),
        )),
    }
}

/// Best human-readable message for a failed API call
///
/// ZAP error bodies look like `{"code":"bad_view","message":"No Implementor"}`.
fn api_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let code = value.get("code").and_then(Value::as_str);
        let message = value.get("message").and_then(Value::as_str);
        match (code, message) {
            (Some(code), Some(message)) => return format!("{} ({})", message, code),
            (None, Some(message)) => return message.to_string(),
            (Some(code), None) => return code.to_string(),
            (None, None) => {}
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[async_trait]
impl ScanService for ZapClient {
    async fn version(&self) -> ZapResult<String> {
        const ENDPOINT: &str = "JSON/core/view/version/";
        let value = self.get_json(ENDPOINT, &[]).await?;
        scalar_field(ENDPOINT, &value, "version")
    }

    async fn access_url(&self, url: &str) -> ZapResult<()> {
        const ENDPOINT: &str = "JSON/core/action/accessUrl/";
        self.get_json(ENDPOINT, &[("url", url), ("followRedirects", "true")])
            .await?;
        Ok(())
    }

    async fn records_to_scan(&self) -> ZapResult<u64> {
        const ENDPOINT: &str = "JSON/pscan/view/recordsToScan/";
        let value = self.get_json(ENDPOINT, &[]).await?;
        let raw = scalar_field(ENDPOINT, &value, "recordsToScan")?;
        raw.trim().parse().map_err(|_| {
            ZapError::response(ENDPOINT, format!("recordsToScan is not a number: '{}'", raw))
        })
    }

    async fn start_active_scan(&self, url: &str) -> ZapResult<ScanId> {
        const ENDPOINT: &str = "JSON/ascan/action/scan/";
        let value = self
            .get_json(ENDPOINT, &[("url", url), ("recurse", "true")])
            .await?;
        let id = scalar_field(ENDPOINT, &value, "scan")?;
        if id.trim().is_empty() {
            return Err(ZapError::response(ENDPOINT, "empty scan id"));
        }
        Ok(ScanId::new(id.trim()))
    }

    async fn scan_status(&self, scan_id: &ScanId) -> ZapResult<Progress> {
        const ENDPOINT: &str = "JSON/ascan/view/status/";
        let value = self
            .get_json(ENDPOINT, &[("scanId", scan_id.as_str())])
            .await?;
        let raw = scalar_field(ENDPOINT, &value, "status")?;
        Progress::parse(scan_id, &raw)
    }

    async fn stop_scan(&self, scan_id: &ScanId) -> ZapResult<()> {
        const ENDPOINT: &str = "JSON/ascan/action/stop/";
        self.get_json(ENDPOINT, &[("scanId", scan_id.as_str())])
            .await?;
        Ok(())
    }

    async fn alerts(&self, base_url: &str) -> ZapResult<Vec<Alert>> {
        const ENDPOINT: &str = "JSON/core/view/alerts/";
        let mut value = self.get_json(ENDPOINT, &[("baseurl", base_url)]).await?;
        let alerts = value
            .get_mut("alerts")
            .map(Value::take)
            .ok_or_else(|| ZapError::response(ENDPOINT, "missing field 'alerts'"))?;
        let alerts: Vec<Alert> = serde_json::from_value(alerts)
            .map_err(|e| ZapError::response(ENDPOINT, format!("malformed alert list: {}", e)))?;
        Ok(alerts.into_iter().map(Alert::with_derived_risk_desc).collect())
    }

    async fn report(&self, format: ReportFormat) -> ZapResult<Report> {
        let endpoint = format.endpoint();
        let body = self
            .send(&endpoint, &[])
            .await?
            .bytes()
            .await
            .map_err(|e| ZapError::response(&endpoint, e.to_string()))?;
        Ok(Report::new(format, body.to_vec()))
    }
}
