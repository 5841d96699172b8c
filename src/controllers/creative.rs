use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::creative::{
        CreativeProvider, CreativeService, LyricsRequest, MusicBrief, MusicDescription,
        VideoConceptRequest,
    },
    error::AppResult,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct LyricsResponse {
    pub lyrics: String,
    pub provider: CreativeProvider,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoConceptResponse {
    pub concept: String,
    pub provider: CreativeProvider,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MusicDescriptionResponse {
    #[serde(flatten)]
    pub description: MusicDescription,
    pub provider: CreativeProvider,
}

pub struct CreativeController {
    creative_service: Arc<CreativeService>,
}

impl CreativeController {
    pub fn new(creative_service: Arc<CreativeService>) -> Self {
        Self { creative_service }
    }

    /// POST /api/lyrics
    pub async fn lyrics(
        State(controller): State<Arc<CreativeController>>,
        Json(request): Json<LyricsRequest>,
    ) -> AppResult<Json<LyricsResponse>> {
        let generated = controller.creative_service.lyrics(&request).await?;
        Ok(Json(LyricsResponse {
            lyrics: generated.content,
            provider: generated.provider,
        }))
    }

    /// POST /api/video-concepts
    pub async fn video_concept(
        State(controller): State<Arc<CreativeController>>,
        Json(request): Json<VideoConceptRequest>,
    ) -> AppResult<Json<VideoConceptResponse>> {
        let generated = controller.creative_service.video_concept(&request).await?;
        Ok(Json(VideoConceptResponse {
            concept: generated.content,
            provider: generated.provider,
        }))
    }

    /// POST /api/music-descriptions
    pub async fn music_description(
        State(controller): State<Arc<CreativeController>>,
        Json(brief): Json<MusicBrief>,
    ) -> AppResult<Json<MusicDescriptionResponse>> {
        let generated = controller.creative_service.music_description(&brief).await?;
        Ok(Json(MusicDescriptionResponse {
            description: generated.content,
            provider: generated.provider,
        }))
    }
}
