pub mod error;
pub mod prompts;
pub mod service;

pub use error::CreativeError;
pub use service::{CreativeService, Generated};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which backend produced a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreativeProvider {
    OpenAi,
    Groq,
    Simulated,
}

impl std::fmt::Display for CreativeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreativeProvider::OpenAi => write!(f, "openai"),
            CreativeProvider::Groq => write!(f, "groq"),
            CreativeProvider::Simulated => write!(f, "simulated"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LyricsRequest {
    pub prompt: String,
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoConceptRequest {
    pub prompt: String,
    pub style: Option<String>,
    pub duration: Option<String>,
    pub budget: Option<String>,
}

/// Inputs for a structured music description
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicBrief {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub style: Option<String>,
    pub lyrics: Option<String>,
    #[serde(alias = "duration")]
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicDescription {
    pub music_description: String,
    #[serde(default)]
    pub structure: Vec<String>,
    #[serde(default)]
    pub tempo: Option<u32>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub instrumentation: Vec<String>,
    #[serde(default)]
    pub mixing_notes: Option<String>,
}

/// Text generation strategy, picked once at startup from configuration
#[async_trait]
pub trait CreativeGenerator: Send + Sync {
    fn provider(&self) -> CreativeProvider;

    async fn lyrics(&self, request: &LyricsRequest) -> Result<String, CreativeError>;

    async fn video_concept(&self, request: &VideoConceptRequest) -> Result<String, CreativeError>;

    async fn music_description(
        &self,
        brief: &MusicBrief,
    ) -> Result<MusicDescription, CreativeError>;
}
