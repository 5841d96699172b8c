use crate::domain::track::{NewTrack, Track, TrackRepository};
use crate::error::AppResult;
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct PgTrackRepository {
    pool: Arc<DbPool>,
}

impl PgTrackRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackRepository for PgTrackRepository {
    /// Upsert on (vendor, task_id); the row id and created_at survive an update
    async fn save(&self, track: NewTrack) -> AppResult<Track> {
        let pool = self.pool.as_ref();
        let saved = sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO tracks (id, vendor, task_id, title, prompt, audio_url, video_url, duration_seconds, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (vendor, task_id) DO UPDATE SET
                title = EXCLUDED.title,
                audio_url = EXCLUDED.audio_url,
                video_url = EXCLUDED.video_url,
                duration_seconds = EXCLUDED.duration_seconds,
                metadata = EXCLUDED.metadata,
                prompt = CASE WHEN EXCLUDED.prompt = '' THEN tracks.prompt ELSE EXCLUDED.prompt END
            RETURNING id, vendor, task_id, title, prompt, audio_url, video_url, duration_seconds, metadata, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(track.vendor)
        .bind(&track.task_id)
        .bind(&track.title)
        .bind(&track.prompt)
        .bind(&track.audio_url)
        .bind(&track.video_url)
        .bind(track.duration_seconds)
        .bind(&track.metadata)
        .fetch_one(pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Track>> {
        let pool = self.pool.as_ref();
        let track = sqlx::query_as::<_, Track>(
            r#"
            SELECT id, vendor, task_id, title, prompt, audio_url, video_url, duration_seconds, metadata, created_at
            FROM tracks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(track)
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Track>> {
        let pool = self.pool.as_ref();
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT id, vendor, task_id, title, prompt, audio_url, video_url, duration_seconds, metadata, created_at
            FROM tracks
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(tracks)
    }

    async fn ping(&self) -> AppResult<()> {
        check_connection(self.pool.as_ref()).await?;
        Ok(())
    }
}
