//! Shared application state passed to every handler via Axum's `State` extractor.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::videos::VideoRegistry;

/// Shared application state for the mock video server.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup.
    pub config: Arc<Config>,
    /// Monotonic instant when the server started (for uptime calculation).
    pub start_time: Instant,
    /// In-memory store of generate requests.
    pub videos: Arc<VideoRegistry>,
}

impl AppState {
    /// Build state with an empty registry.
    pub fn new(config: Config) -> Self {
        let videos = Arc::new(VideoRegistry::new(
            config.videos.download_base_url.clone(),
        ));
        Self {
            config: Arc::new(config),
            start_time: Instant::now(),
            videos,
        }
    }
}
