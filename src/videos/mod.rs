//! Mock video jobs.
//!
//! A job is created by `POST /api/v1/videos/generate` and never mutated.
//! Its status is not stored: every read derives it from the time elapsed since
//! creation, so repeated reads at the same instant always agree.
//!
//! ```text
//!  0s ────── 0.5s ─────────────── 3s ──────────▶
//!   queued   │    processing      │   done (video_url set)
//! ```

pub mod registry;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::Serialize;
use tokio::time::Instant;

pub use registry::VideoRegistry;

/// Elapsed time below which a job reports `queued`.
pub const QUEUED_FOR: Duration = Duration::from_millis(500);

/// Elapsed time from which a job reports `done`.
pub const READY_AFTER: Duration = Duration::from_secs(3);

/// Length of the random lowercase suffix of a video ID.
const ID_SUFFIX_LEN: usize = 9;

/// Quality tag recorded when the request omits one.
pub const DEFAULT_QUALITY: &str = "standard";

/// Derived lifecycle status of a video job.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Queued,
    Processing,
    Done,
}

impl VideoStatus {
    /// Status of a job that has existed for `elapsed`.
    pub fn at(elapsed: Duration) -> Self {
        if elapsed < QUEUED_FOR {
            Self::Queued
        } else if elapsed < READY_AFTER {
            Self::Processing
        } else {
            Self::Done
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Done => "done",
        }
    }
}

/// A stored generate request.
#[derive(Debug, Clone)]
pub struct VideoJob {
    pub video_id: String,
    pub prompt: String,
    /// Requested length in seconds. Expected to be 5, 10 or 25 but not checked.
    pub duration: i64,
    /// Free-form quality tag. Recorded only.
    pub quality: String,
    /// Monotonic creation instant, source of the derived status.
    pub created_at: Instant,
}

/// Point-in-time view of a job, as returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSnapshot {
    pub video_id: String,
    pub status: VideoStatus,
    pub video_url: Option<String>,
}

impl VideoJob {
    /// Build a new job with a freshly generated ID.
    pub fn new(prompt: String, duration: i64, quality: Option<String>) -> Self {
        Self {
            video_id: generate_video_id(unix_millis()),
            prompt,
            duration,
            quality: quality.unwrap_or_else(|| DEFAULT_QUALITY.to_string()),
            created_at: Instant::now(),
        }
    }

    /// Derive the job's status as observed at `now`.
    ///
    /// A `now` earlier than `created_at` counts as zero elapsed time.
    pub fn snapshot_at(&self, now: Instant, download_base_url: &str) -> VideoSnapshot {
        let status = VideoStatus::at(now.saturating_duration_since(self.created_at));
        let video_url = (status == VideoStatus::Done)
            .then(|| download_url(download_base_url, &self.video_id));
        VideoSnapshot {
            video_id: self.video_id.clone(),
            status,
            video_url,
        }
    }
}

/// `mock_<unix-millis>_<9 random lowercase letters>`.
///
/// Uniqueness is probabilistic: two IDs minted in the same millisecond collide
/// only if their suffixes do (1 in 26^9).
pub fn generate_video_id(unix_ms: u64) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect();
    format!("mock_{unix_ms}_{suffix}")
}

/// Polling path for a video ID.
pub fn status_path(video_id: &str) -> String {
    format!("/api/v1/videos/{video_id}/status")
}

/// Synthetic download URL for a finished video.
pub fn download_url(base: &str, video_id: &str) -> String {
    format!("{}/{video_id}.mp4", base.trim_end_matches('/'))
}

#[allow(clippy::cast_possible_truncation)]
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://demo.soniavideo.fr/videos";

    fn is_valid_id(id: &str) -> bool {
        let Some(rest) = id.strip_prefix("mock_") else {
            return false;
        };
        let Some((digits, suffix)) = rest.split_once('_') else {
            return false;
        };
        !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && suffix.len() == 9
            && suffix.bytes().all(|b| b.is_ascii_lowercase())
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(VideoStatus::at(Duration::ZERO), VideoStatus::Queued);
        assert_eq!(VideoStatus::at(Duration::from_millis(499)), VideoStatus::Queued);
        assert_eq!(VideoStatus::at(Duration::from_millis(500)), VideoStatus::Processing);
        assert_eq!(VideoStatus::at(Duration::from_millis(2999)), VideoStatus::Processing);
        assert_eq!(VideoStatus::at(Duration::from_secs(3)), VideoStatus::Done);
        assert_eq!(VideoStatus::at(Duration::from_secs(3600)), VideoStatus::Done);
    }

    #[test]
    fn test_status_monotonic() {
        let mut last = VideoStatus::Queued;
        for ms in (0..5000).step_by(50) {
            let status = VideoStatus::at(Duration::from_millis(ms));
            assert!(status >= last, "regressed at {ms}ms");
            last = status;
        }
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_value(VideoStatus::Processing).unwrap(), "processing");
        assert_eq!(VideoStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_generate_video_id_format() {
        let id = generate_video_id(1_700_000_000_123);
        assert!(id.starts_with("mock_1700000000123_"));
        assert!(is_valid_id(&id), "bad id: {id}");
    }

    #[test]
    fn test_generate_video_id_suffixes_differ() {
        let a = generate_video_id(1);
        let b = generate_video_id(1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_job_defaults_quality() {
        let job = VideoJob::new("cat video".into(), 5, None);
        assert_eq!(job.quality, "standard");
        assert!(is_valid_id(&job.video_id));
        let job = VideoJob::new("cat video".into(), 25, Some("hd".into()));
        assert_eq!(job.quality, "hd");
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_url_only_when_done() {
        let job = VideoJob::new("p".into(), 10, None);

        let snap = job.snapshot_at(job.created_at, BASE);
        assert_eq!(snap.status, VideoStatus::Queued);
        assert_eq!(snap.video_url, None);

        let snap = job.snapshot_at(job.created_at + Duration::from_secs(1), BASE);
        assert_eq!(snap.status, VideoStatus::Processing);
        assert_eq!(snap.video_url, None);

        let snap = job.snapshot_at(job.created_at + READY_AFTER, BASE);
        assert_eq!(snap.status, VideoStatus::Done);
        assert_eq!(
            snap.video_url.as_deref(),
            Some(format!("{BASE}/{}.mp4", job.video_id).as_str())
        );
    }

    #[test]
    fn test_paths() {
        assert_eq!(status_path("mock_1_abc"), "/api/v1/videos/mock_1_abc/status");
        assert_eq!(
            download_url("https://cdn.example/videos/", "mock_1_abc"),
            "https://cdn.example/videos/mock_1_abc.mp4"
        );
    }
}
