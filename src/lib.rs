#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]

//! sonia-video-mock library — the building blocks of the mock video API.
//!
//! - `auth` — bearer token middleware
//! - `config` — configuration loading
//! - `error` — API error taxonomy and HTTP mapping
//! - `routes` — REST API route handlers
//! - `state` — shared handler state
//! - `videos` — job records, derived status, in-memory registry

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod videos;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

// Re-export key types at crate root for convenience.
pub use auth::ApiKey;
pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
pub use videos::{VideoRegistry, VideoStatus};

/// Build the full HTTP router.
///
/// `/` and `/api/health` are public; everything under `/api/v1/videos`
/// passes through [`auth::require_api_key`] first.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::root::root))
        .route("/api/health", get(routes::health::health));

    let authed_routes = Router::new()
        .route("/api/v1/videos/generate", post(routes::videos::generate))
        .route(
            "/api/v1/videos/{video_id}/status",
            get(routes::videos::status),
        )
        .route_layer(middleware::from_fn(auth::require_api_key));

    Router::new()
        .merge(public_routes)
        .merge(authed_routes)
        .layer(Extension(ApiKey(state.config.auth.api_key.clone())))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_root_is_public() {
        let app = router(AppState::new(Config::default()));
        let (status, body) = get_json(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Sonia Video API - Ready");
    }

    #[tokio::test]
    async fn test_health_counts_videos() {
        let state = AppState::new(Config::default());
        state.videos.create("a".into(), 5, None).await;
        state.videos.create("b".into(), 10, None).await;

        let (status, body) = get_json(router(state), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["videos"], 2);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = router(AppState::new(Config::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nothing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
