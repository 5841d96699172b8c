use super::vendor_http::{extract_task_id, VendorHttpClient};
use crate::domain::generation::{
    GenerationError, GenerationRepository, GenerationRequest, PayloadProfile, PollObservation,
    Submission, Vendor,
};
use crate::infrastructure::config::MusicGenConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// The backend renders at most this many seconds per request
const MAX_DURATION_SECONDS: u32 = 30;

#[derive(Debug, Serialize, PartialEq)]
struct MusicGenBody<'a> {
    prompt: &'a str,
    duration: u32,
    model_size: &'static str,
    temperature: f32,
    top_k: u32,
    top_p: f32,
}

impl<'a> MusicGenBody<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        Self {
            prompt: &request.prompt,
            duration: request
                .duration_seconds
                .unwrap_or(MAX_DURATION_SECONDS)
                .clamp(1, MAX_DURATION_SECONDS),
            model_size: "medium",
            temperature: 1.0,
            top_k: 250,
            top_p: 0.0,
        }
    }
}

/// Self-hosted MusicGen backend. No credential; audio paths are relative
/// to the backend URL.
pub struct MusicGenRepository {
    client: VendorHttpClient,
    base_url: String,
    profile: PayloadProfile,
}

impl MusicGenRepository {
    pub fn new(http: reqwest::Client, config: MusicGenConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        Self {
            client: VendorHttpClient::new(Vendor::MusicGen, http),
            profile: PayloadProfile::with_asset_base(base_url.clone()),
            base_url,
        }
    }
}

#[async_trait]
impl GenerationRepository for MusicGenRepository {
    fn vendor(&self) -> Vendor {
        Vendor::MusicGen
    }

    fn profile(&self) -> &PayloadProfile {
        &self.profile
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission, GenerationError> {
        let body = MusicGenBody::from_request(request);

        tracing::info!(
            backend = %self.base_url,
            duration = body.duration,
            model_size = body.model_size,
            "Generating music with MusicGen backend"
        );

        let payload = self
            .client
            .submit_json(
                self.client
                    .http()
                    .post(format!("{}/api/generate", self.base_url))
                    .json(&body),
            )
            .await?;

        let task_id = extract_task_id(&payload, &["task_id"]).ok_or_else(|| {
            GenerationError::MalformedVendorPayload {
                vendor: Vendor::MusicGen,
                reason: "start response has no task_id".to_string(),
                payload: payload.clone(),
            }
        })?;

        Ok(Submission { task_id, payload })
    }

    async fn fetch_status(&self, task_id: &str) -> Result<PollObservation<Value>, GenerationError> {
        let url = format!("{}/api/status/{}", self.base_url, urlencoding::encode(task_id));
        self.client.poll_json(self.client.http().get(url)).await
    }
}
