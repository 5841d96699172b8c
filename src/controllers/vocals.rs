use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::vocals::{VocalOutcome, VocalRequest, VocalService},
    error::AppResult,
};

/// Answer when no speech provider is configured
#[derive(Debug, Serialize, Deserialize)]
pub struct DemoVocalsResponse {
    pub demo: bool,
    pub message: String,
}

pub struct VocalsController {
    vocal_service: Arc<VocalService>,
}

impl VocalsController {
    pub fn new(vocal_service: Arc<VocalService>) -> Self {
        Self { vocal_service }
    }

    /// POST /api/vocals - Sing lyrics, answered with MP3 bytes
    pub async fn sing(
        State(controller): State<Arc<VocalsController>>,
        Json(request): Json<VocalRequest>,
    ) -> AppResult<Response> {
        match controller.vocal_service.sing(&request).await? {
            VocalOutcome::Audio(take) => {
                let mut headers = HeaderMap::new();
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
                headers.insert("x-vocal-voice", HeaderValue::from_static(take.voice.as_str()));
                headers.insert("x-character-count", HeaderValue::from(take.characters));

                Ok((StatusCode::OK, headers, Body::from(take.audio)).into_response())
            }
            VocalOutcome::Demo { message } => Ok(Json(DemoVocalsResponse {
                demo: true,
                message,
            })
            .into_response()),
        }
    }
}
