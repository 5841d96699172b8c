use super::error::GenerationError;
use super::model::{GenerationRequest, GenerationResult, GenerationStatus, GenerationTask, Vendor};
use super::normalizer::{PayloadProfile, ResultNormalizer};
use super::poller::{poll_until_terminal, PollError, PollObservation, PollPolicy};
use super::GenerationRepository;
use crate::domain::creative::CreativeService;
use crate::domain::track::{NewTrack, TrackRepository};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// What a non-blocking submission produced
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The vendor accepted the job; the caller polls the status endpoint
    Pending(GenerationTask),
    /// The vendor answered with a terminal result straight away
    Finished(GenerationResult),
}

pub struct GenerationService {
    vendors: HashMap<Vendor, Arc<dyn GenerationRepository>>,
    track_repo: Arc<dyn TrackRepository>,
    creative: Arc<CreativeService>,
    poll_interval: Duration,
    max_attempts: Option<u32>,
}

impl GenerationService {
    pub fn new(
        repositories: Vec<Arc<dyn GenerationRepository>>,
        track_repo: Arc<dyn TrackRepository>,
        creative: Arc<CreativeService>,
        poll_interval: Duration,
        max_attempts: Option<u32>,
    ) -> Self {
        let vendors = repositories
            .into_iter()
            .map(|repo| (repo.vendor(), repo))
            .collect();

        Self {
            vendors,
            track_repo,
            creative,
            poll_interval,
            max_attempts,
        }
    }

    fn repository(&self, vendor: Vendor) -> Result<Arc<dyn GenerationRepository>, GenerationError> {
        self.vendors
            .get(&vendor)
            .cloned()
            .ok_or_else(|| GenerationError::Configuration {
                vendor,
                detail: "no adapter registered".to_string(),
            })
    }

    fn policy_for(&self, vendor: Vendor) -> PollPolicy {
        PollPolicy::new(
            self.poll_interval,
            self.max_attempts.unwrap_or_else(|| vendor.default_max_attempts()),
        )
    }

    async fn prepare(&self, request: GenerationRequest, enhance_prompt: bool) -> GenerationRequest {
        if !enhance_prompt {
            return request;
        }
        let enhanced = self.creative.enhance_prompt(&request).await;
        request.with_prompt(enhanced)
    }

    /// Submit and, when the start call already carries a terminal payload,
    /// normalize it right away.
    async fn start(
        &self,
        repo: &Arc<dyn GenerationRepository>,
        request: GenerationRequest,
    ) -> Result<(GenerationTask, Option<GenerationResult>), GenerationError> {
        let vendor = repo.vendor();
        let submission = repo.submit(&request).await?;

        tracing::info!(
            vendor = %vendor,
            task_id = %submission.task_id,
            "Generation submitted"
        );

        let task = GenerationTask::new(submission.task_id, vendor, request);

        let immediate = match ResultNormalizer::classify(repo.profile(), &submission.payload) {
            Some(status) if status.is_terminal() => Some(ResultNormalizer::normalize(
                vendor,
                task.task_id(),
                repo.profile(),
                submission.payload,
            )?),
            _ => None,
        };

        Ok((task, immediate))
    }

    async fn poll(
        &self,
        repo: &Arc<dyn GenerationRepository>,
        task: &GenerationTask,
    ) -> Result<GenerationResult, GenerationError> {
        let vendor = repo.vendor();
        let policy = self.policy_for(vendor);

        let polled = poll_until_terminal(
            policy,
            |attempt| {
                let repo = repo.clone();
                let task_id = task.task_id().to_string();
                async move {
                    tracing::debug!(
                        vendor = %vendor,
                        task_id = %task_id,
                        attempt,
                        "Checking status"
                    );
                    let observation = match repo.fetch_status(&task_id).await? {
                        PollObservation::Observed(payload) => classified(repo.profile(), payload),
                        PollObservation::Miss(reason) => PollObservation::Miss(reason),
                    };
                    Ok::<_, GenerationError>(observation)
                }
            },
            |(status, _): &(GenerationStatus, Value)| status.is_terminal(),
        )
        .await
        .map_err(|e| match e {
            PollError::Timeout { attempts, last_miss } => GenerationError::PollTimeout {
                vendor,
                task_id: task.task_id().to_string(),
                attempts,
                last_miss,
            },
            PollError::Aborted { error, attempts } => {
                tracing::warn!(
                    vendor = %vendor,
                    task_id = %task.task_id(),
                    attempts,
                    error = %error,
                    "Polling aborted"
                );
                error
            }
        })?;

        tracing::info!(
            vendor = %vendor,
            task_id = %task.task_id(),
            attempts = polled.attempts,
            status = %polled.value.0,
            "Generation reached terminal status"
        );

        ResultNormalizer::normalize(vendor, task.task_id(), repo.profile(), polled.value.1)
    }

    /// Hand a complete result to the track store. Store failures never fail
    /// the generation itself.
    async fn persist(&self, result: &GenerationResult, prompt: &str) {
        let Some(track) = NewTrack::from_result(result, prompt) else {
            return;
        };

        match self.track_repo.save(track).await {
            Ok(saved) => tracing::info!(
                vendor = %result.vendor(),
                task_id = %result.task_id(),
                track_id = %saved.id,
                "Track saved"
            ),
            Err(e) => tracing::warn!(
                vendor = %result.vendor(),
                task_id = %result.task_id(),
                error = %e,
                "Failed to save track"
            ),
        }
    }
}

/// Payloads without a recognizable status count as misses
fn classified(
    profile: &PayloadProfile,
    payload: Value,
) -> PollObservation<(GenerationStatus, Value)> {
    match ResultNormalizer::classify(profile, &payload) {
        Some(status) => PollObservation::Observed((status, payload)),
        None => PollObservation::Miss("unrecognized status in payload".to_string()),
    }
}

#[async_trait]
pub trait GenerationServiceApi: Send + Sync {
    /// Submit, poll until terminal and normalize.
    ///
    /// Returns the terminal result (complete or failed). Complete results are
    /// saved as tracks.
    async fn generate(
        &self,
        vendor: Vendor,
        request: GenerationRequest,
        enhance_prompt: bool,
    ) -> Result<GenerationResult, GenerationError>;

    /// Submit without waiting for the vendor to finish
    async fn submit(
        &self,
        vendor: Vendor,
        request: GenerationRequest,
        enhance_prompt: bool,
    ) -> Result<SubmitOutcome, GenerationError>;

    /// One status check, normalized. Transient misses become `StatusUnavailable`.
    async fn check_status(
        &self,
        vendor: Vendor,
        task_id: &str,
    ) -> Result<GenerationResult, GenerationError>;
}

#[async_trait]
impl GenerationServiceApi for GenerationService {
    async fn generate(
        &self,
        vendor: Vendor,
        request: GenerationRequest,
        enhance_prompt: bool,
    ) -> Result<GenerationResult, GenerationError> {
        let repo = self.repository(vendor)?;
        let original_prompt = request.prompt.clone();
        let request = self.prepare(request, enhance_prompt).await;

        let (task, immediate) = self.start(&repo, request).await?;

        let result = match immediate {
            Some(result) => {
                tracing::info!(
                    vendor = %vendor,
                    task_id = %task.task_id(),
                    "Vendor returned an immediate result"
                );
                result
            }
            None => self.poll(&repo, &task).await?,
        };

        self.persist(&result, &original_prompt).await;
        Ok(result)
    }

    async fn submit(
        &self,
        vendor: Vendor,
        request: GenerationRequest,
        enhance_prompt: bool,
    ) -> Result<SubmitOutcome, GenerationError> {
        let repo = self.repository(vendor)?;
        let original_prompt = request.prompt.clone();
        let request = self.prepare(request, enhance_prompt).await;

        match self.start(&repo, request).await? {
            (_, Some(result)) => {
                self.persist(&result, &original_prompt).await;
                Ok(SubmitOutcome::Finished(result))
            }
            (task, None) => Ok(SubmitOutcome::Pending(task)),
        }
    }

    async fn check_status(
        &self,
        vendor: Vendor,
        task_id: &str,
    ) -> Result<GenerationResult, GenerationError> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(GenerationError::Invalid("Task id is required".to_string()));
        }

        let repo = self.repository(vendor)?;

        let payload = match repo.fetch_status(task_id).await? {
            PollObservation::Observed(payload) => payload,
            PollObservation::Miss(reason) => {
                return Err(GenerationError::StatusUnavailable { vendor, reason })
            }
        };

        if ResultNormalizer::classify(repo.profile(), &payload).is_none() {
            return Err(GenerationError::StatusUnavailable {
                vendor,
                reason: "unrecognized status in payload".to_string(),
            });
        }

        let result = ResultNormalizer::normalize(vendor, task_id, repo.profile(), payload)?;
        // The original prompt is not known here; the vendor title or an
        // "Untitled Track" fallback names the track.
        self.persist(&result, "").await;
        Ok(result)
    }
}
