use crate::domain::generation::{GenerationError, PollObservation, Vendor};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

const MESSAGE_KEYS: &[&str] = &["message", "detail", "error", "msg"];
const BODY_PREVIEW_CHARS: usize = 300;

/// Shared `reqwest::Client` for all vendor adapters
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("genstudio-backend/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Credential lookup done before any network call
pub fn require_credential<'a>(
    vendor: Vendor,
    value: &'a Option<String>,
    name: &str,
) -> Result<&'a str, GenerationError> {
    value.as_deref().ok_or_else(|| GenerationError::Configuration {
        vendor,
        detail: format!("{} is not set", name),
    })
}

/// Status codes worth polling again
fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

/// Vendor error text: a message field of a JSON body, or the raw body
fn rejection_message(status: StatusCode, text: &str) -> String {
    let from_json = serde_json::from_str::<Value>(text).ok().and_then(|body| {
        MESSAGE_KEYS.iter().find_map(|key| match body.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Object(inner)) => {
                inner.get("message").and_then(Value::as_str).map(str::to_string)
            }
            _ => None,
        })
    });

    from_json
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}

fn preview(text: &str) -> String {
    text.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// JSON over HTTP with the error mapping every vendor shares
pub struct VendorHttpClient {
    vendor: Vendor,
    http: reqwest::Client,
}

impl VendorHttpClient {
    pub fn new(vendor: Vendor, http: reqwest::Client) -> Self {
        Self { vendor, http }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Start call: every failure is final.
    /// Non-2xx becomes `VendorRejected` with the vendor's status and message.
    pub async fn submit_json(&self, request: RequestBuilder) -> Result<Value, GenerationError> {
        let vendor = self.vendor;
        let response = request.send().await.map_err(|e| GenerationError::Transport {
            vendor,
            message: e.to_string(),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| GenerationError::Transport {
            vendor,
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            let message = rejection_message(status, &text);
            tracing::warn!(
                vendor = %vendor,
                status = status.as_u16(),
                message = %message,
                "Vendor rejected generation request"
            );
            return Err(GenerationError::VendorRejected {
                vendor,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| GenerationError::MalformedVendorPayload {
            vendor,
            reason: format!("start response is not JSON: {}", e),
            payload: Value::String(preview(&text)),
        })
    }

    /// Status call: network errors, 408/429/5xx and non-JSON bodies are
    /// misses; any other non-2xx aborts with `VendorRejected`.
    pub async fn poll_json(
        &self,
        request: RequestBuilder,
    ) -> Result<PollObservation<Value>, GenerationError> {
        let vendor = self.vendor;
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Ok(PollObservation::Miss(format!("request failed: {}", e))),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Ok(PollObservation::Miss(format!("failed to read body: {}", e))),
        };

        if is_transient(status) {
            return Ok(PollObservation::Miss(format!("HTTP {}", status.as_u16())));
        }

        if !status.is_success() {
            return Err(GenerationError::VendorRejected {
                vendor,
                status: status.as_u16(),
                message: rejection_message(status, &text),
            });
        }

        match serde_json::from_str(&text) {
            Ok(payload) => Ok(PollObservation::Observed(payload)),
            Err(e) => Ok(PollObservation::Miss(format!("body is not JSON: {}", e))),
        }
    }
}

/// Task id from a start response, looking inside a `data` envelope as well.
/// Numeric ids are accepted and turned into strings.
pub fn extract_task_id(payload: &Value, keys: &[&str]) -> Option<String> {
    let candidates = [Some(payload), payload.get("data")];

    candidates
        .into_iter()
        .flatten()
        .flat_map(|body| keys.iter().filter_map(move |key| body.get(*key)))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
