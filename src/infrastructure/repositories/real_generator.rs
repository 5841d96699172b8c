use crate::domain::creative::prompts::{
    extract_json_object, lyrics_prompt, music_description_prompt, video_concept_prompt,
};
use crate::domain::creative::{
    CreativeError, CreativeGenerator, CreativeProvider, LyricsRequest, MusicBrief, MusicDescription,
    VideoConceptRequest,
};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

const LYRICS_SYSTEM: &str =
    "You are a professional songwriter. Write lyrics with clear section labels.";
const VIDEO_SYSTEM: &str =
    "You are an experienced music video director. Write practical, production-ready concepts.";
const DESCRIPTION_SYSTEM: &str = "You are a music producer. Answer with JSON only.";

/// Sampling settings for one kind of completion
struct Sampling {
    temperature: f32,
    max_tokens: u32,
}

const LYRICS_SAMPLING: Sampling = Sampling {
    temperature: 0.8,
    max_tokens: 800,
};
const VIDEO_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 3000,
};
const DESCRIPTION_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 1000,
};

/// Chat-completion backed generator for OpenAI and OpenAI-compatible APIs (Groq)
pub struct RealGenerator {
    client: Client<OpenAIConfig>,
    provider: CreativeProvider,
    model: String,
}

impl RealGenerator {
    pub fn openai(api_key: &str, model: String) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(api_key)),
            provider: CreativeProvider::OpenAi,
            model,
        }
    }

    pub fn groq(api_key: &str, model: String) -> Self {
        Self::groq_at(GROQ_API_BASE, api_key, model)
    }

    /// Groq-flavoured generator against any OpenAI-compatible base URL
    pub fn groq_at(api_base: &str, api_key: &str, model: String) -> Self {
        Self {
            client: Client::with_config(
                OpenAIConfig::new()
                    .with_api_base(api_base)
                    .with_api_key(api_key),
            ),
            provider: CreativeProvider::Groq,
            model,
        }
    }

    async fn complete(
        &self,
        system: &str,
        prompt: String,
        sampling: &Sampling,
    ) -> Result<String, CreativeError> {
        let start_time = std::time::Instant::now();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .temperature(sampling.temperature)
            .max_tokens(sampling.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                provider = %self.provider,
                model = %self.model,
                "Chat completion failed"
            );
            CreativeError::from(e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                CreativeError::MalformedResponse("completion has no content".to_string())
            })?;

        tracing::info!(
            provider = %self.provider,
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            content_length = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }
}

/// Parse the JSON object a model was asked to answer with
pub fn parse_music_description(answer: &str) -> Result<MusicDescription, CreativeError> {
    let json = extract_json_object(answer).ok_or_else(|| {
        CreativeError::MalformedResponse("answer contains no JSON object".to_string())
    })?;

    let description: MusicDescription = serde_json::from_str(json).map_err(|e| {
        CreativeError::MalformedResponse(format!("music description is not valid JSON: {}", e))
    })?;

    if description.music_description.trim().is_empty() {
        return Err(CreativeError::MalformedResponse(
            "music description is empty".to_string(),
        ));
    }

    Ok(description)
}

#[async_trait]
impl CreativeGenerator for RealGenerator {
    fn provider(&self) -> CreativeProvider {
        self.provider
    }

    async fn lyrics(&self, request: &LyricsRequest) -> Result<String, CreativeError> {
        self.complete(LYRICS_SYSTEM, lyrics_prompt(request), &LYRICS_SAMPLING)
            .await
    }

    async fn video_concept(&self, request: &VideoConceptRequest) -> Result<String, CreativeError> {
        self.complete(VIDEO_SYSTEM, video_concept_prompt(request), &VIDEO_SAMPLING)
            .await
    }

    async fn music_description(
        &self,
        brief: &MusicBrief,
    ) -> Result<MusicDescription, CreativeError> {
        let answer = self
            .complete(DESCRIPTION_SYSTEM, music_description_prompt(brief), &DESCRIPTION_SAMPLING)
            .await?;
        parse_music_description(&answer)
    }
}
