//! In-memory video job store.
//!
//! Entries live for the lifetime of the process: there is no eviction and no
//! persistence. The map is shared across request handlers through
//! [`crate::AppState`]; running several server processes gives each one its
//! own independent registry.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{VideoJob, VideoSnapshot};

/// Job identifier → job record, plus the URL prefix used for finished videos.
pub struct VideoRegistry {
    jobs: RwLock<HashMap<String, VideoJob>>,
    download_base_url: String,
}

impl VideoRegistry {
    pub fn new(download_base_url: impl Into<String>) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            download_base_url: download_base_url.into(),
        }
    }

    /// Create and store a job, returning its ID.
    pub async fn create(&self, prompt: String, duration: i64, quality: Option<String>) -> String {
        let job = VideoJob::new(prompt, duration, quality);
        let video_id = job.video_id.clone();
        self.jobs.write().await.insert(video_id.clone(), job);
        video_id
    }

    /// Current view of a job, or `None` for an unknown ID.
    pub async fn snapshot(&self, video_id: &str) -> Option<VideoSnapshot> {
        self.snapshot_at(video_id, Instant::now()).await
    }

    /// View of a job as observed at `now`.
    pub async fn snapshot_at(&self, video_id: &str, now: Instant) -> Option<VideoSnapshot> {
        let jobs = self.jobs.read().await;
        jobs.get(video_id)
            .map(|job| job.snapshot_at(now, &self.download_base_url))
    }

    /// Copy of the stored record.
    pub async fn get(&self, video_id: &str) -> Option<VideoJob> {
        self.jobs.read().await.get(video_id).cloned()
    }

    /// Number of jobs created since startup.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
