use super::error::GenerationError;
use super::model::{GenerationResult, GenerationStatus, ResultDetails, Vendor};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

const STATUS_KEYS: &[&str] = &["status", "state"];
const AUDIO_KEYS: &[&str] = &["audio_url", "audioUrl", "downloadUrl", "download_url"];
const VIDEO_KEYS: &[&str] = &["video_url", "videoUrl"];
const TITLE_KEYS: &[&str] = &["title"];
const DURATION_KEYS: &[&str] = &["duration", "duration_seconds"];
const ERROR_KEYS: &[&str] = &["error", "error_message", "errorMessage", "message"];
const FAILURE_WITHOUT_DETAILS: &str = "vendor reported failure without details";

static CLOCK_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):([0-5]?\d)$").expect("valid duration pattern"));

/// Where a vendor puts things in its status payloads
#[derive(Debug, Clone, Default)]
pub struct PayloadProfile {
    /// Key wrapping the interesting object, e.g. `data`
    pub envelope: Option<&'static str>,
    /// Prefix for relative asset paths
    pub asset_base: Option<String>,
}

impl PayloadProfile {
    pub fn with_envelope(envelope: &'static str) -> Self {
        Self {
            envelope: Some(envelope),
            asset_base: None,
        }
    }

    pub fn with_asset_base(asset_base: impl Into<String>) -> Self {
        Self {
            envelope: None,
            asset_base: Some(asset_base.into().trim_end_matches('/').to_string()),
        }
    }

    /// The object the normalizer reads fields from
    pub fn body<'a>(&self, payload: &'a Value) -> Option<&'a Map<String, Value>> {
        let inner = match self.envelope {
            Some(key) => payload.get(key).unwrap_or(payload),
            None => payload,
        };

        match inner {
            Value::Object(map) => Some(map),
            // Some vendors answer with a one element list of clips
            Value::Array(items) => items.first().and_then(Value::as_object),
            _ => None,
        }
    }

    fn resolve_url(&self, url: &str) -> String {
        match &self.asset_base {
            Some(base) if url.starts_with('/') => format!("{}{}", base, url),
            _ => url.to_string(),
        }
    }
}

/// Maps vendor payloads into [`GenerationResult`]
pub struct ResultNormalizer;

impl ResultNormalizer {
    /// Status the payload reports, or `None` when it cannot be told.
    /// A payload without a status field but with an asset is a direct result.
    pub fn classify(profile: &PayloadProfile, payload: &Value) -> Option<GenerationStatus> {
        let body = profile.body(payload)?;

        match first_string(body, STATUS_KEYS) {
            Some(word) => GenerationStatus::from_vendor(&word),
            None if first_string(body, AUDIO_KEYS).is_some()
                || first_string(body, VIDEO_KEYS).is_some() =>
            {
                Some(GenerationStatus::Complete)
            }
            None => None,
        }
    }

    pub fn normalize(
        vendor: Vendor,
        task_id: &str,
        profile: &PayloadProfile,
        payload: Value,
    ) -> Result<GenerationResult, GenerationError> {
        let malformed = |reason: String, payload: &Value| GenerationError::MalformedVendorPayload {
            vendor,
            reason,
            payload: payload.clone(),
        };

        let status = Self::classify(profile, &payload)
            .ok_or_else(|| malformed("no recognizable status".to_string(), &payload))?;

        let mut body = profile
            .body(&payload)
            .cloned()
            .ok_or_else(|| malformed("payload is not an object".to_string(), &payload))?;

        take_first(&mut body, STATUS_KEYS);
        let task_id = task_id.to_string();

        match status {
            GenerationStatus::Complete => {
                let audio_url =
                    take_first_string(&mut body, AUDIO_KEYS).map(|u| profile.resolve_url(&u));
                let video_url =
                    take_first_string(&mut body, VIDEO_KEYS).map(|u| profile.resolve_url(&u));
                let title = take_first_string(&mut body, TITLE_KEYS);
                let duration_seconds =
                    take_first(&mut body, DURATION_KEYS).and_then(|v| parse_duration(&v));
                drop_blank_errors(&mut body);

                GenerationResult::complete(
                    task_id,
                    vendor,
                    ResultDetails {
                        audio_url,
                        video_url,
                        title,
                        duration_seconds,
                        metadata: body,
                    },
                )
                .map_err(|reason| malformed(reason, &payload))
            }
            GenerationStatus::Failed => {
                let error = take_first_string(&mut body, ERROR_KEYS)
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| FAILURE_WITHOUT_DETAILS.to_string());

                GenerationResult::failed(task_id, vendor, error, body)
                    .map_err(|reason| malformed(reason, &payload))
            }
            pending => GenerationResult::pending(task_id, vendor, pending, body)
                .map_err(|reason| malformed(reason, &payload)),
        }
    }
}

fn first_string(body: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn take_first(body: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    let key = keys
        .iter()
        .find(|key| body.get(**key).is_some_and(|v| !v.is_null()))?;
    body.remove(*key)
}

/// First non-blank string among the aliases. The chosen key and any blank
/// aliases are removed; other non-blank aliases stay in the body.
fn take_first_string(body: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
    let found = first_string(body, keys);
    let mut taken = false;

    for key in keys {
        let (blank, chosen) = match body.get(*key).and_then(Value::as_str).map(str::trim) {
            Some(value) => (value.is_empty(), !taken && Some(value) == found.as_deref()),
            None => continue,
        };

        if blank || chosen {
            taken |= chosen;
            body.remove(*key);
        }
    }

    found
}

fn drop_blank_errors(body: &mut Map<String, Value>) {
    for key in ["error", "error_message", "errorMessage"] {
        let blank = body
            .get(key)
            .is_some_and(|v| v.is_null() || v.as_str().is_some_and(|s| s.trim().is_empty()));
        if blank {
            body.remove(key);
        }
    }
}

/// Seconds from either a number or an `m:ss` clock string
fn parse_duration(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|d| *d >= 0.0),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(seconds) = s.parse::<f64>() {
                return Some(seconds).filter(|d| *d >= 0.0);
            }
            let caps = CLOCK_DURATION.captures(s)?;
            let minutes: f64 = caps[1].parse().ok()?;
            let seconds: f64 = caps[2].parse().ok()?;
            Some(minutes * 60.0 + seconds)
        }
        _ => None,
    }
}
