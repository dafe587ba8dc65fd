//! Mock video generation endpoints.
//!
//! - `POST /api/v1/videos/generate` — register a generate request
//! - `GET  /api/v1/videos/{video_id}/status` — poll a request's derived status
//!
//! Both sit behind the bearer-token middleware. No video is ever rendered:
//! status moves from `queued` to `processing` to `done` purely with time.

use std::fmt;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::videos::{self, VideoStatus};
use crate::AppState;

/// Request body for `POST /api/v1/videos/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateVideoRequest {
    /// Text prompt, stored as-is.
    pub prompt: String,
    /// Requested length in seconds (5, 10 or 25 expected, not enforced).
    #[serde(deserialize_with = "lenient_i64")]
    pub duration: i64,
    /// Quality tag. Defaults to `"standard"`.
    #[serde(default)]
    pub quality: Option<String>,
}

/// Response body for `POST /api/v1/videos/generate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateVideoResponse {
    pub video_id: String,
    /// Relative path to poll for status.
    pub status_url: String,
}

/// Response body for `GET /api/v1/videos/{video_id}/status`.
///
/// `video_url` and `detail` are always present, as `null` when unset.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct VideoStatusResponse {
    pub video_id: String,
    pub status: VideoStatus,
    pub video_url: Option<String>,
    pub detail: Option<String>,
}

/// Accept an integer given as a JSON integer, an integral float (`5.0`) or a
/// decimal string (`"5"`). Anything else is a type error.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientI64;

    impl de::Visitor<'_> for LenientI64 {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer, an integral float or a string of digits")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_precision_loss,
            clippy::float_cmp
        )]
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(LenientI64)
}

/// `POST /api/v1/videos/generate` — store a new mock job and return its ID.
///
/// Body errors are reported as `{"detail": ...}` with the extractor's status.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateVideoRequest>, JsonRejection>,
) -> Result<Json<GenerateVideoResponse>, ApiError> {
    let Json(payload) = payload?;
    let GenerateVideoRequest {
        prompt,
        duration,
        quality,
    } = payload;

    let video_id = state.videos.create(prompt, duration, quality).await;
    info!(video_id = %video_id, duration, "Video queued");

    Ok(Json(GenerateVideoResponse {
        status_url: videos::status_path(&video_id),
        video_id,
    }))
}

/// `GET /api/v1/videos/{video_id}/status` — derive the job's status from its age.
///
/// Returns 404 if the ID was never issued by this process.
pub async fn status(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoStatusResponse>, ApiError> {
    let Some(snapshot) = state.videos.snapshot(&video_id).await else {
        debug!(video_id = %video_id, "Unknown video");
        return Err(ApiError::NotFound("Video not found"));
    };

    debug!(video_id = %video_id, status = snapshot.status.as_str(), "Video status");
    Ok(Json(VideoStatusResponse {
        video_id: snapshot.video_id,
        status: snapshot.status,
        video_url: snapshot.video_url,
        detail: None,
    }))
}
