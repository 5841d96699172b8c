use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::generation::{
        GenerationRequest, GenerationResult, GenerationService, GenerationServiceApi,
        GenerationStatus, GenerationTask, SubmitOutcome, Vendor,
    },
    error::{AppError, AppResult},
};

/// Request for POST /api/generations
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGenerationRequest {
    pub vendor: String,
    pub prompt: String,
    pub title: Option<String>,
    pub duration: Option<u32>,
    pub style: Option<String>,
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub lyrics: Option<String>,
    #[serde(default)]
    pub instrumental: bool,
    #[serde(default)]
    pub enhance_prompt: bool,
    pub wait: Option<bool>,
}

impl CreateGenerationRequest {
    fn into_parts(self) -> AppResult<(Vendor, GenerationRequest, bool, bool)> {
        let vendor: Vendor = self.vendor.parse().map_err(AppError::BadRequest)?;
        let base = GenerationRequest::new(self.prompt).map_err(AppError::BadRequest)?;

        let request = GenerationRequest {
            title: self.title.filter(|t| !t.trim().is_empty()),
            duration_seconds: self.duration.filter(|d| *d > 0),
            style: self.style,
            mood: self.mood,
            tags: self.tags,
            lyrics: self.lyrics,
            instrumental: self.instrumental,
            ..base
        };

        Ok((vendor, request, self.enhance_prompt, self.wait.unwrap_or(true)))
    }
}

/// Response for an accepted, still running generation
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingGenerationResponse {
    pub task_id: String,
    pub vendor: Vendor,
    pub status: GenerationStatus,
    pub submitted_at: DateTime<Utc>,
    pub status_url: String,
}

impl From<GenerationTask> for PendingGenerationResponse {
    fn from(task: GenerationTask) -> Self {
        Self {
            status_url: format!(
                "/api/generations/{}/{}",
                task.vendor(),
                urlencoding::encode(task.task_id())
            ),
            task_id: task.task_id().to_string(),
            vendor: task.vendor(),
            status: GenerationStatus::Queued,
            submitted_at: task.submitted_at(),
        }
    }
}

/// A vendor-reported failure is an error response, not a 200
fn finished(result: GenerationResult) -> AppResult<Json<GenerationResult>> {
    if result.status() == GenerationStatus::Failed {
        return Err(AppError::GenerationFailed(format!(
            "{} task {}: {}",
            result.vendor(),
            result.task_id(),
            result.error().unwrap_or_default()
        )));
    }
    Ok(Json(result))
}

pub struct GenerationController {
    generation_service: Arc<GenerationService>,
}

impl GenerationController {
    pub fn new(generation_service: Arc<GenerationService>) -> Self {
        Self { generation_service }
    }

    /// POST /api/generations - Start a generation, waiting for it unless `wait` is false
    pub async fn create(
        State(controller): State<Arc<GenerationController>>,
        Json(request): Json<CreateGenerationRequest>,
    ) -> AppResult<Response> {
        let (vendor, request, enhance_prompt, wait) = request.into_parts()?;

        tracing::info!(
            vendor = %vendor,
            prompt_length = request.prompt.len(),
            enhance_prompt,
            wait,
            "Generation requested"
        );

        if wait {
            let result = controller
                .generation_service
                .generate(vendor, request, enhance_prompt)
                .await?;
            return Ok(finished(result)?.into_response());
        }

        match controller
            .generation_service
            .submit(vendor, request, enhance_prompt)
            .await?
        {
            SubmitOutcome::Pending(task) => Ok((
                StatusCode::ACCEPTED,
                Json(PendingGenerationResponse::from(task)),
            )
                .into_response()),
            SubmitOutcome::Finished(result) => Ok(finished(result)?.into_response()),
        }
    }

    /// GET /api/generations/{vendor}/{taskId} - Current normalized status of a task
    pub async fn status(
        State(controller): State<Arc<GenerationController>>,
        Path((vendor, task_id)): Path<(String, String)>,
    ) -> AppResult<Json<GenerationResult>> {
        let vendor: Vendor = vendor.parse().map_err(AppError::NotFound)?;

        let result = controller
            .generation_service
            .check_status(vendor, &task_id)
            .await?;

        Ok(Json(result))
    }
}
