use super::vendor_http::{extract_task_id, require_credential, VendorHttpClient};
use crate::domain::generation::{
    GenerationError, GenerationRepository, GenerationRequest, PayloadProfile, PollObservation,
    Submission, Vendor,
};
use crate::infrastructure::config::MurekaConfig;
use async_trait::async_trait;
use serde_json::{json, Value};

const RAPIDAPI_HOST: &str = "mureka-ai-music-generation.p.rapidapi.com";

/// Which create endpoint a request maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreateMode {
    Simple,
    Instrumental,
    Advanced,
}

impl CreateMode {
    fn for_request(request: &GenerationRequest) -> Self {
        if request.instrumental {
            CreateMode::Instrumental
        } else if request.lyrics.as_deref().is_some_and(|l| !l.trim().is_empty()) {
            CreateMode::Advanced
        } else {
            CreateMode::Simple
        }
    }

    fn path(&self) -> &'static str {
        match self {
            CreateMode::Simple => "/music/create",
            CreateMode::Instrumental => "/music/create-instrumental",
            CreateMode::Advanced => "/music/create-advanced",
        }
    }

    fn body(&self, account: &str, request: &GenerationRequest) -> Value {
        match self {
            CreateMode::Advanced => json!({
                "account": account,
                "lyrics": request.lyrics.as_deref().unwrap_or_default(),
                "title": request.title.as_deref().unwrap_or("Untitled Track"),
            }),
            CreateMode::Simple | CreateMode::Instrumental => json!({
                "account": account,
                "prompt": request.prompt,
            }),
        }
    }
}

/// Mureka behind RapidAPI. Responses are wrapped in `{success, data}`.
pub struct MurekaRepository {
    client: VendorHttpClient,
    config: MurekaConfig,
    profile: PayloadProfile,
}

impl MurekaRepository {
    pub fn new(http: reqwest::Client, config: MurekaConfig) -> Self {
        Self {
            client: VendorHttpClient::new(Vendor::Mureka, http),
            config,
            profile: PayloadProfile::with_envelope("data"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn credentials(&self) -> Result<(&str, &str), GenerationError> {
        let key = require_credential(Vendor::Mureka, &self.config.rapidapi_key, "RAPIDAPI_KEY")?;
        let account = require_credential(Vendor::Mureka, &self.config.account, "MUREKA_ACCOUNT")?;
        Ok((key, account))
    }

    fn with_headers(&self, request: reqwest::RequestBuilder, key: &str) -> reqwest::RequestBuilder {
        request
            .header("x-rapidapi-key", key)
            .header("x-rapidapi-host", RAPIDAPI_HOST)
    }
}

#[async_trait]
impl GenerationRepository for MurekaRepository {
    fn vendor(&self) -> Vendor {
        Vendor::Mureka
    }

    fn profile(&self) -> &PayloadProfile {
        &self.profile
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission, GenerationError> {
        let (key, account) = self.credentials()?;
        let mode = CreateMode::for_request(request);

        tracing::info!(endpoint = mode.path(), "Generating music with Mureka");

        let payload = self
            .client
            .submit_json(self.with_headers(
                self.client
                    .http()
                    .post(self.url(mode.path()))
                    .json(&mode.body(account, request)),
                key,
            ))
            .await?;

        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(GenerationError::MalformedVendorPayload {
                vendor: Vendor::Mureka,
                reason: "start response reported success=false".to_string(),
                payload,
            });
        }

        let task_id = extract_task_id(&payload, &["id", "song_id"]).ok_or_else(|| {
            GenerationError::MalformedVendorPayload {
                vendor: Vendor::Mureka,
                reason: "start response has no song id".to_string(),
                payload: payload.clone(),
            }
        })?;

        Ok(Submission { task_id, payload })
    }

    async fn fetch_status(&self, task_id: &str) -> Result<PollObservation<Value>, GenerationError> {
        let (key, _) = self.credentials()?;
        let url = self.url(&format!("/music/{}", urlencoding::encode(task_id)));

        self.client
            .poll_json(self.with_headers(self.client.http().get(url), key))
            .await
    }
}
