use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Third-party music generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum Vendor {
    Suno,
    Kie,
    MusicGen,
    Mureka,
}

impl Vendor {
    pub const ALL: [Vendor; 4] = [Vendor::Suno, Vendor::Kie, Vendor::MusicGen, Vendor::Mureka];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Suno => "suno",
            Vendor::Kie => "kie",
            Vendor::MusicGen => "musicgen",
            Vendor::Mureka => "mureka",
        }
    }

    /// Attempt ceiling used when no override is configured
    pub fn default_max_attempts(&self) -> u32 {
        match self {
            Vendor::MusicGen => 120,
            Vendor::Suno | Vendor::Kie | Vendor::Mureka => 60,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suno" => Ok(Vendor::Suno),
            "kie" => Ok(Vendor::Kie),
            "musicgen" | "custom" => Ok(Vendor::MusicGen),
            "mureka" => Ok(Vendor::Mureka),
            other => Err(format!("unknown vendor '{}'", other)),
        }
    }
}

/// Vendor-independent generation parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    pub title: Option<String>,
    pub duration_seconds: Option<u32>,
    pub style: Option<String>,
    pub mood: Option<String>,
    pub tags: Vec<String>,
    pub lyrics: Option<String>,
    pub instrumental: bool,
}

impl GenerationRequest {
    /// Build a request from a prompt; blank prompts are rejected
    pub fn new(prompt: impl Into<String>) -> Result<Self, String> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err("Prompt is required".to_string());
        }

        Ok(Self {
            prompt,
            ..Default::default()
        })
    }

    pub fn with_prompt(&self, prompt: String) -> Self {
        Self {
            prompt,
            ..self.clone()
        }
    }

    /// Style, mood and tags flattened into the comma separated form vendors expect
    pub fn style_tags(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .style
            .iter()
            .chain(self.mood.iter())
            .chain(self.tags.iter())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// One in-flight vendor job. Immutable once created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationTask {
    task_id: String,
    vendor: Vendor,
    submitted_at: DateTime<Utc>,
    #[serde(skip)]
    request: GenerationRequest,
}

impl GenerationTask {
    pub fn new(task_id: String, vendor: Vendor, request: GenerationRequest) -> Self {
        Self {
            task_id,
            vendor,
            submitted_at: Utc::now(),
            request,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// What a vendor answered to the start call
#[derive(Debug, Clone)]
pub struct Submission {
    pub task_id: String,
    pub payload: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Queued,
    InProgress,
    Complete,
    Failed,
}

impl GenerationStatus {
    /// Map a vendor status word onto the shared vocabulary
    pub fn from_vendor(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "queued" | "pending" | "submitted" | "waiting" => Some(Self::Queued),
            "in_progress" | "processing" | "streaming" | "running" | "generating" => {
                Some(Self::InProgress)
            }
            "complete" | "completed" | "success" | "succeeded" | "done" => Some(Self::Complete),
            "failed" | "fail" | "failure" | "error" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Asset and descriptive fields of a finished track
#[derive(Debug, Clone, Default)]
pub struct ResultDetails {
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub title: Option<String>,
    pub duration_seconds: Option<f64>,
    pub metadata: Map<String, Value>,
}

/// Uniform outcome of a generation.
///
/// Fields are private: a `complete` result always carries a non-empty asset
/// URL and a `failed` one a non-empty error, and the constructors are the
/// only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    task_id: String,
    vendor: Vendor,
    status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    metadata: Map<String, Value>,
}

impl GenerationResult {
    /// Finished result; fails when neither an audio nor a video URL is present
    pub fn complete(
        task_id: String,
        vendor: Vendor,
        details: ResultDetails,
    ) -> Result<Self, String> {
        let audio_url = non_empty(details.audio_url);
        let video_url = non_empty(details.video_url);

        if audio_url.is_none() && video_url.is_none() {
            return Err("complete result without an asset URL".to_string());
        }

        Ok(Self {
            task_id,
            vendor,
            status: GenerationStatus::Complete,
            audio_url,
            video_url,
            title: non_empty(details.title),
            duration_seconds: details.duration_seconds,
            error: None,
            metadata: details.metadata,
        })
    }

    /// Vendor-reported failure; fails when the error message is blank
    pub fn failed(
        task_id: String,
        vendor: Vendor,
        error: String,
        metadata: Map<String, Value>,
    ) -> Result<Self, String> {
        let error =
            non_empty(Some(error)).ok_or_else(|| "failed result without an error".to_string())?;

        Ok(Self {
            task_id,
            vendor,
            status: GenerationStatus::Failed,
            audio_url: None,
            video_url: None,
            title: None,
            duration_seconds: None,
            error: Some(error),
            metadata,
        })
    }

    /// Non-terminal snapshot (queued / in progress)
    pub fn pending(
        task_id: String,
        vendor: Vendor,
        status: GenerationStatus,
        metadata: Map<String, Value>,
    ) -> Result<Self, String> {
        if status.is_terminal() {
            return Err(format!("'{}' is not a pending status", status));
        }

        Ok(Self {
            task_id,
            vendor,
            status,
            audio_url: None,
            video_url: None,
            title: None,
            duration_seconds: None,
            error: None,
            metadata,
        })
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    /// Audio first, video for video-only vendors
    pub fn primary_asset_url(&self) -> Option<&str> {
        self.audio_url().or_else(|| self.video_url())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
