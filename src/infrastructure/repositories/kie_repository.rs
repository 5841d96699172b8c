use super::vendor_http::{extract_task_id, require_credential, VendorHttpClient};
use crate::domain::generation::{
    GenerationError, GenerationRepository, GenerationRequest, PayloadProfile, PollObservation,
    ResultNormalizer, Submission, Vendor,
};
use crate::infrastructure::config::KieConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

const TASK_ID_KEYS: &[&str] = &["taskId", "task_id"];

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct KieGenerateBody<'a> {
    prompt: &'a str,
    custom_mode: bool,
    instrumental: bool,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<String>,
}

impl<'a> KieGenerateBody<'a> {
    /// Custom mode sends lyrics as the prompt and needs a title and style
    fn from_request(request: &'a GenerationRequest, model: &'a str) -> Self {
        let lyrics = request.lyrics.as_deref().filter(|l| !l.trim().is_empty());
        let custom_mode = lyrics.is_some() && !request.instrumental;

        Self {
            prompt: if custom_mode { lyrics.unwrap_or(&request.prompt) } else { &request.prompt },
            custom_mode,
            instrumental: request.instrumental,
            model,
            title: if custom_mode { request.title.as_deref() } else { None },
            style: if custom_mode {
                Some(request.style_tags().unwrap_or_else(|| request.prompt.clone()))
            } else {
                None
            },
        }
    }
}

/// Kie.ai: answers either with a `taskId` to poll or with the finished track
pub struct KieRepository {
    client: VendorHttpClient,
    config: KieConfig,
    profile: PayloadProfile,
}

impl KieRepository {
    pub fn new(http: reqwest::Client, config: KieConfig) -> Self {
        Self {
            client: VendorHttpClient::new(Vendor::Kie, http),
            config,
            profile: PayloadProfile::default(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl GenerationRepository for KieRepository {
    fn vendor(&self) -> Vendor {
        Vendor::Kie
    }

    fn profile(&self) -> &PayloadProfile {
        &self.profile
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission, GenerationError> {
        let api_key = require_credential(Vendor::Kie, &self.config.api_key, "KIE_API_KEY")?;
        let body = KieGenerateBody::from_request(request, &self.config.model);

        tracing::info!(
            model = %self.config.model,
            custom_mode = body.custom_mode,
            instrumental = body.instrumental,
            "Generating music with Kie.ai"
        );

        let payload = self
            .client
            .submit_json(
                self.client
                    .http()
                    .post(self.url("/api/v1/generate"))
                    .bearer_auth(api_key)
                    .json(&body),
            )
            .await?;

        if let Some(task_id) = extract_task_id(&payload, TASK_ID_KEYS) {
            return Ok(Submission { task_id, payload });
        }

        // No task to poll: only acceptable when the track is already there
        match ResultNormalizer::classify(&self.profile, &payload) {
            Some(status) if status.is_terminal() => Ok(Submission {
                task_id: format!("kie-{}", Uuid::new_v4()),
                payload,
            }),
            _ => Err(GenerationError::MalformedVendorPayload {
                vendor: Vendor::Kie,
                reason: "start response has neither a taskId nor an audio URL".to_string(),
                payload,
            }),
        }
    }

    async fn fetch_status(&self, task_id: &str) -> Result<PollObservation<Value>, GenerationError> {
        let api_key = require_credential(Vendor::Kie, &self.config.api_key, "KIE_API_KEY")?;
        let url = self.url(&format!("/api/v1/task/{}", urlencoding::encode(task_id)));

        self.client
            .poll_json(self.client.http().get(url).bearer_auth(api_key))
            .await
    }
}
