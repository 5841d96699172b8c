use async_trait::async_trait;
use chrono::Utc;
use genstudio_backend::domain::track::{NewTrack, Track, TrackRepository};
use genstudio_backend::error::{AppError, AppResult};
use parking_lot::Mutex;
use uuid::Uuid;

/// In-memory track store with the same upsert rule as the Postgres one
#[derive(Default)]
pub struct MemoryTrackRepository {
    tracks: Mutex<Vec<Track>>,
    offline: Mutex<bool>,
}

impl MemoryTrackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Track> {
        self.tracks.lock().clone()
    }

    /// Make every call fail like a lost database connection
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock() = offline;
    }

    fn check_online(&self) -> AppResult<()> {
        if *self.offline.lock() {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl TrackRepository for MemoryTrackRepository {
    async fn save(&self, track: NewTrack) -> AppResult<Track> {
        self.check_online()?;
        let mut tracks = self.tracks.lock();

        if let Some(existing) = tracks
            .iter_mut()
            .find(|t| t.vendor == track.vendor && t.task_id == track.task_id)
        {
            existing.title = track.title;
            existing.audio_url = track.audio_url;
            existing.video_url = track.video_url;
            existing.duration_seconds = track.duration_seconds;
            existing.metadata = track.metadata;
            if !track.prompt.is_empty() {
                existing.prompt = track.prompt;
            }
            return Ok(existing.clone());
        }

        let saved = Track {
            id: Uuid::new_v4(),
            vendor: track.vendor,
            task_id: track.task_id,
            title: track.title,
            prompt: track.prompt,
            audio_url: track.audio_url,
            video_url: track.video_url,
            duration_seconds: track.duration_seconds,
            metadata: track.metadata,
            created_at: Utc::now(),
        };
        tracks.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Track>> {
        self.check_online()?;
        Ok(self.tracks.lock().iter().find(|t| t.id == id).cloned())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Track>> {
        self.check_online()?;
        // Insertion order is creation order
        Ok(self
            .tracks
            .lock()
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_online()
    }
}
