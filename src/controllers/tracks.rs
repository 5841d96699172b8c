use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::track::{clamp_limit, Track, TrackRepository},
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct ListTracksQuery {
    pub limit: Option<i64>,
}

pub struct TrackController {
    track_repo: Arc<dyn TrackRepository>,
}

impl TrackController {
    pub fn new(track_repo: Arc<dyn TrackRepository>) -> Self {
        Self { track_repo }
    }

    /// GET /api/tracks - Most recent tracks first
    pub async fn list_tracks(
        State(controller): State<Arc<TrackController>>,
        Query(query): Query<ListTracksQuery>,
    ) -> AppResult<Json<Vec<Track>>> {
        let tracks = controller
            .track_repo
            .list_recent(clamp_limit(query.limit))
            .await?;
        Ok(Json(tracks))
    }

    /// GET /api/tracks/{id}
    pub async fn get_track(
        State(controller): State<Arc<TrackController>>,
        Path(id): Path<String>,
    ) -> AppResult<Json<Track>> {
        let id = Uuid::parse_str(&id)
            .map_err(|_| AppError::NotFound(format!("Track {} not found", id)))?;

        controller
            .track_repo
            .find_by_id(id)
            .await?
            .map(Json)
            .ok_or_else(|| AppError::NotFound(format!("Track {} not found", id)))
    }
}
