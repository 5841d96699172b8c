pub mod model;

pub use model::{fallback_title, NewTrack, Track};

use crate::error::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

/// Storage for finished generations.
/// Implementations must treat `(vendor, task_id)` as unique: saving the same
/// task twice updates the stored track instead of adding a second one.
#[async_trait]
pub trait TrackRepository: Send + Sync {
    async fn save(&self, track: NewTrack) -> AppResult<Track>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Track>>;
    /// Newest first
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Track>>;
    async fn ping(&self) -> AppResult<()>;
}

/// Clamp a caller supplied page size into `1..=MAX_LIST_LIMIT`
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}
