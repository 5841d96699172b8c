use crate::domain::generation::{GenerationResult, GenerationStatus, Vendor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

const TITLE_PROMPT_CHARS: usize = 30;

/// A finished generation kept for the library
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: Uuid,
    pub vendor: Vendor,
    pub task_id: String,
    pub title: String,
    pub prompt: String,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub duration_seconds: Option<f64>,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Insert/upsert payload for a complete generation
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrack {
    pub vendor: Vendor,
    pub task_id: String,
    pub title: String,
    pub prompt: String,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub duration_seconds: Option<f64>,
    pub metadata: JsonValue,
}

impl NewTrack {
    /// Only complete results become tracks
    pub fn from_result(result: &GenerationResult, prompt: &str) -> Option<Self> {
        if result.status() != GenerationStatus::Complete {
            return None;
        }

        let title = result
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_title(prompt));

        Some(Self {
            vendor: result.vendor(),
            task_id: result.task_id().to_string(),
            title,
            prompt: prompt.to_string(),
            audio_url: result.audio_url().map(str::to_string),
            video_url: result.video_url().map(str::to_string),
            duration_seconds: result.duration_seconds(),
            metadata: JsonValue::Object(result.metadata().clone()),
        })
    }
}

/// `AI Generated: "first thirty chars..."`
pub fn fallback_title(prompt: &str) -> String {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return "Untitled Track".to_string();
    }

    let head: String = prompt.chars().take(TITLE_PROMPT_CHARS).collect();
    if head.len() < prompt.len() {
        format!("AI Generated: \"{}...\"", head)
    } else {
        format!("AI Generated: \"{}\"", head)
    }
}
