use super::error::VocalError;
use super::{VocalRequest, VocalSynthesizer, VocalVoice, DEFAULT_EMOTION, MAX_LYRICS_CHARS};
use std::sync::Arc;

pub const DEMO_MESSAGE: &str =
    "Running in demo mode. Add your OpenAI API key for real vocal generation.";

/// A finished vocal take
#[derive(Debug, Clone)]
pub struct SungVocals {
    pub audio: Vec<u8>,
    pub voice: VocalVoice,
    pub characters: usize,
}

#[derive(Debug, Clone)]
pub enum VocalOutcome {
    Audio(SungVocals),
    /// No speech provider configured
    Demo { message: String },
}

pub struct VocalService {
    synthesizer: Option<Arc<dyn VocalSynthesizer>>,
}

impl VocalService {
    pub fn new(synthesizer: Option<Arc<dyn VocalSynthesizer>>) -> Self {
        Self { synthesizer }
    }

    /// Validate the request and sing it. Without a synthesizer the request
    /// is still validated and answered with the demo notice.
    pub async fn sing(&self, request: &VocalRequest) -> Result<VocalOutcome, VocalError> {
        let lyrics = request.lyrics.trim();
        if lyrics.is_empty() {
            return Err(VocalError::Invalid("Lyrics are required".to_string()));
        }
        if lyrics.chars().count() > MAX_LYRICS_CHARS {
            return Err(VocalError::Invalid(
                "Lyrics must be 10,000 characters or less".to_string(),
            ));
        }

        let voice = match non_blank(&request.voice) {
            Some(name) => VocalVoice::parse(name)
                .ok_or_else(|| VocalError::Invalid(format!("Unknown voice: {}", name)))?,
            None => VocalVoice::default(),
        };
        let emotion = non_blank(&request.emotion).unwrap_or(DEFAULT_EMOTION);

        let Some(synthesizer) = &self.synthesizer else {
            tracing::info!(voice = %voice, "No speech provider configured, answering in demo mode");
            return Ok(VocalOutcome::Demo {
                message: DEMO_MESSAGE.to_string(),
            });
        };

        let script = singing_script(lyrics, voice, emotion);
        let audio = synthesizer.sing(&script, voice).await?;
        if audio.is_empty() {
            return Err(VocalError::Dependency(
                "no audio data received".to_string(),
            ));
        }

        Ok(VocalOutcome::Audio(SungVocals {
            audio,
            voice,
            characters: script.chars().count(),
        }))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Performance directions wrapped around the lyrics
fn singing_script(lyrics: &str, voice: VocalVoice, emotion: &str) -> String {
    format!(
        "Sing these lyrics with {} emotion, in a {} voice style:\n\n{}\n\n\
         Make it sound musical and match the rhythm of the lyrics.",
        emotion, voice, lyrics
    )
}
