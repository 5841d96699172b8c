use crate::domain::vocals::{VocalError, VocalSynthesizer, VocalVoice};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_CHARS: usize = 4096;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("valid line break pattern"));

/// OpenAI text-to-speech implementation of the vocal synthesizer
pub struct OpenAiVocalRepository {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiVocalRepository {
    pub fn new(api_key: &str, model: String) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(api_key)),
            model,
        }
    }

    /// Same provider behind any OpenAI-compatible base URL
    pub fn with_api_base(api_base: &str, api_key: &str, model: String) -> Self {
        Self {
            client: Client::with_config(
                OpenAIConfig::new()
                    .with_api_base(api_base)
                    .with_api_key(api_key),
            ),
            model,
        }
    }

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    /// Synthesize a single batch
    async fn call_openai(&self, text: &str, voice: VocalVoice) -> Result<Vec<u8>, VocalError> {
        tracing::debug!(
            model = %self.model,
            voice = %voice,
            text_length = text.chars().count(),
            "Calling OpenAI speech API"
        );

        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice: openai_voice(voice),
            response_format: None, // mp3
            speed: None,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                voice = %voice,
                text_length = text.chars().count(),
                "OpenAI speech call failed"
            );
            VocalError::from(e)
        })?;

        Ok(response.bytes.to_vec())
    }
}

fn openai_voice(voice: VocalVoice) -> Voice {
    match voice {
        VocalVoice::Alloy => Voice::Alloy,
        VocalVoice::Echo => Voice::Echo,
        VocalVoice::Fable => Voice::Fable,
        VocalVoice::Onyx => Voice::Onyx,
        VocalVoice::Nova => Voice::Nova,
        VocalVoice::Shimmer => Voice::Shimmer,
    }
}

/// Split a script into requests under the provider limit, on line breaks
/// where possible. Lines longer than the limit are cut by characters.
fn split_into_batches(script: &str) -> Vec<String> {
    if script.chars().count() <= MAX_BATCH_CHARS {
        return vec![script.to_string()];
    }

    let mut batches = Vec::new();
    let mut current = String::new();
    let mut last_end = 0;

    let line_ends = LINE_BREAKS
        .find_iter(script)
        .map(|m| m.end())
        .chain(std::iter::once(script.len()));

    for end in line_ends {
        let line = &script[last_end..end];
        last_end = end;
        if line.is_empty() {
            continue;
        }

        let line_chars = line.chars().count();
        if !current.is_empty() && current.chars().count() + line_chars > MAX_BATCH_CHARS {
            push_batch(&mut batches, &current);
            current.clear();
        }

        if line_chars > MAX_BATCH_CHARS {
            let chars: Vec<char> = line.chars().collect();
            for chunk in chars.chunks(MAX_BATCH_CHARS) {
                push_batch(&mut batches, &chunk.iter().collect::<String>());
            }
        } else {
            current.push_str(line);
        }
    }
    push_batch(&mut batches, &current);

    batches
}

fn push_batch(batches: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        batches.push(text.to_string());
    }
}

#[async_trait]
impl VocalSynthesizer for OpenAiVocalRepository {
    async fn sing(&self, script: &str, voice: VocalVoice) -> Result<Vec<u8>, VocalError> {
        let start_time = std::time::Instant::now();
        let batches = split_into_batches(script);

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.call_openai(batch, voice).await?;
            merged_audio.extend(audio);

            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        tracing::info!(
            provider = "openai",
            model = %self.model,
            voice = %voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = script.chars().count(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "Vocal synthesis completed"
        );

        Ok(merged_audio)
    }
}
