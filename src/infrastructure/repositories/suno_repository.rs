use super::vendor_http::{extract_task_id, require_credential, VendorHttpClient};
use crate::domain::generation::{
    GenerationError, GenerationRepository, GenerationRequest, PayloadProfile, PollObservation,
    Submission, Vendor,
};
use crate::infrastructure::config::SunoConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize, PartialEq)]
struct SunoGenerateBody<'a> {
    prompt: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style_preset: Option<&'a str>,
}

impl<'a> SunoGenerateBody<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        Self {
            prompt: &request.prompt,
            title: request.title.as_deref().unwrap_or("Untitled Track"),
            duration: request.duration_seconds,
            // Suno's `mode` is the musical mode; the mood travels as a tag
            tags: request
                .mood
                .iter()
                .chain(request.tags.iter())
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect(),
            style_preset: request.style.as_deref(),
        }
    }
}

/// Suno-compatible API: bearer auth, `{id, status}` jobs
pub struct SunoRepository {
    client: VendorHttpClient,
    config: SunoConfig,
    profile: PayloadProfile,
}

impl SunoRepository {
    pub fn new(http: reqwest::Client, config: SunoConfig) -> Self {
        Self {
            client: VendorHttpClient::new(Vendor::Suno, http),
            config,
            profile: PayloadProfile::default(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl GenerationRepository for SunoRepository {
    fn vendor(&self) -> Vendor {
        Vendor::Suno
    }

    fn profile(&self) -> &PayloadProfile {
        &self.profile
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission, GenerationError> {
        let api_key = require_credential(Vendor::Suno, &self.config.api_key, "SUNO_API_KEY")?;

        tracing::info!(
            prompt_length = request.prompt.len(),
            has_duration = request.duration_seconds.is_some(),
            "Generating song with Suno"
        );

        let payload = self
            .client
            .submit_json(
                self.client
                    .http()
                    .post(self.url("/generate"))
                    .bearer_auth(api_key)
                    .json(&SunoGenerateBody::from_request(request)),
            )
            .await?;

        let task_id = extract_task_id(&payload, &["id"]).ok_or_else(|| {
            GenerationError::MalformedVendorPayload {
                vendor: Vendor::Suno,
                reason: "start response has no generation id".to_string(),
                payload: payload.clone(),
            }
        })?;

        Ok(Submission { task_id, payload })
    }

    async fn fetch_status(&self, task_id: &str) -> Result<PollObservation<Value>, GenerationError> {
        let api_key = require_credential(Vendor::Suno, &self.config.api_key, "SUNO_API_KEY")?;
        let url = self.url(&format!("/generations/{}", urlencoding::encode(task_id)));

        self.client
            .poll_json(self.client.http().get(url).bearer_auth(api_key))
            .await
    }
}
