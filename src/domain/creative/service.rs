use super::error::CreativeError;
use super::prompts;
use super::{
    CreativeGenerator, CreativeProvider, LyricsRequest, MusicBrief, MusicDescription,
    VideoConceptRequest,
};
use crate::domain::generation::GenerationRequest;
use serde::Serialize;
use std::sync::Arc;

/// Generated content tagged with the backend that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated<T> {
    pub content: T,
    pub provider: CreativeProvider,
}

pub struct CreativeService {
    generator: Arc<dyn CreativeGenerator>,
    fallback: Arc<dyn CreativeGenerator>,
}

impl CreativeService {
    pub fn new(
        generator: Arc<dyn CreativeGenerator>,
        fallback: Arc<dyn CreativeGenerator>,
    ) -> Self {
        Self { generator, fallback }
    }

    pub fn provider(&self) -> CreativeProvider {
        self.generator.provider()
    }

    /// Song lyrics. Generator failures are surfaced to the caller.
    pub async fn lyrics(
        &self,
        request: &LyricsRequest,
    ) -> Result<Generated<String>, CreativeError> {
        validate_prompt(&request.prompt)?;

        let content = self.generator.lyrics(request).await?;

        tracing::info!(
            provider = %self.generator.provider(),
            chars = content.len(),
            "Lyrics generated"
        );

        Ok(Generated {
            content,
            provider: self.generator.provider(),
        })
    }

    /// Music video concept. Falls back to the simulated generator when the real one fails.
    pub async fn video_concept(
        &self,
        request: &VideoConceptRequest,
    ) -> Result<Generated<String>, CreativeError> {
        validate_prompt(&request.prompt)?;

        match self.generator.video_concept(request).await {
            Ok(content) => Ok(Generated {
                content,
                provider: self.generator.provider(),
            }),
            Err(e) => {
                tracing::warn!(
                    provider = %self.generator.provider(),
                    error = %e,
                    "Video concept generation failed, using simulated concept"
                );

                let content = self.fallback.video_concept(request).await?;
                Ok(Generated {
                    content,
                    provider: self.fallback.provider(),
                })
            }
        }
    }

    /// Structured description of how a track should sound
    pub async fn music_description(
        &self,
        brief: &MusicBrief,
    ) -> Result<Generated<MusicDescription>, CreativeError> {
        let content = self.generator.music_description(brief).await?;

        Ok(Generated {
            content,
            provider: self.generator.provider(),
        })
    }

    /// Prompt with a generated music description folded in.
    /// Any failure keeps the original prompt, and so does a simulated
    /// generator: its template would override what the caller asked for.
    pub async fn enhance_prompt(&self, request: &GenerationRequest) -> String {
        if self.generator.provider() == CreativeProvider::Simulated {
            tracing::debug!("No text generation provider configured, prompt left as is");
            return request.prompt.clone();
        }

        let brief = MusicBrief {
            title: request.title.clone(),
            genre: None,
            mood: request.mood.clone(),
            style: request.style_tags(),
            lyrics: request.lyrics.clone(),
            duration_seconds: request.duration_seconds,
        };

        match self.generator.music_description(&brief).await {
            Ok(description) => {
                let enhanced = prompts::enhanced_prompt(
                    &request.prompt,
                    request.lyrics.as_deref(),
                    &description,
                );
                tracing::debug!(
                    provider = %self.generator.provider(),
                    original_chars = request.prompt.len(),
                    enhanced_chars = enhanced.len(),
                    "Prompt enhanced"
                );
                enhanced
            }
            Err(e) => {
                tracing::warn!(
                    provider = %self.generator.provider(),
                    error = %e,
                    "Prompt enhancement failed, using original prompt"
                );
                request.prompt.clone()
            }
        }
    }
}

fn validate_prompt(prompt: &str) -> Result<(), CreativeError> {
    if prompt.trim().is_empty() {
        return Err(CreativeError::Invalid("Prompt is required".to_string()));
    }
    Ok(())
}
