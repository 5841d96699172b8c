pub mod error;
pub mod service;

pub use error::VocalError;
pub use service::{SungVocals, VocalOutcome, VocalService};

use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_EMOTION: &str = "passionate";
pub const MAX_LYRICS_CHARS: usize = 10_000;

/// Voices the speech provider can sing with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VocalVoice {
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

impl VocalVoice {
    /// Case-insensitive; `None` for voices the provider does not offer
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "alloy" => Some(VocalVoice::Alloy),
            "echo" => Some(VocalVoice::Echo),
            "fable" => Some(VocalVoice::Fable),
            "onyx" => Some(VocalVoice::Onyx),
            "nova" => Some(VocalVoice::Nova),
            "shimmer" => Some(VocalVoice::Shimmer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VocalVoice::Alloy => "alloy",
            VocalVoice::Echo => "echo",
            VocalVoice::Fable => "fable",
            VocalVoice::Onyx => "onyx",
            VocalVoice::Nova => "nova",
            VocalVoice::Shimmer => "shimmer",
        }
    }
}

impl std::fmt::Display for VocalVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocalRequest {
    #[serde(default)]
    pub lyrics: String,
    pub voice: Option<String>,
    pub emotion: Option<String>,
}

/// Speech backend that performs a singing script.
///
/// Implementations handle their provider's input limits and return one
/// MP3 stream for the whole script.
#[async_trait]
pub trait VocalSynthesizer: Send + Sync {
    async fn sing(&self, script: &str, voice: VocalVoice) -> Result<Vec<u8>, VocalError>;
}
