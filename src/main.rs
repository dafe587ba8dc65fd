#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # sonia-video-mock
//!
//! Mock of an asynchronous video-generation API. Clients submit a prompt,
//! get a job ID back, and poll until the job reports `done` with a synthetic
//! download URL. Nothing is rendered; progression is driven purely by time.
//!
//! ## API surface
//!
//! | Method | Path                               | Auth | Description               |
//! |--------|------------------------------------|------|---------------------------|
//! | GET    | `/`                                | No   | Readiness banner          |
//! | GET    | `/api/health`                      | No   | Liveness probe            |
//! | POST   | `/api/v1/videos/generate`          | Yes  | Submit a generate request |
//! | GET    | `/api/v1/videos/{video_id}/status` | Yes  | Poll derived job status   |
//!
//! ## Architecture
//!
//! ```text
//! main.rs          — entry point, clap subcommands, graceful shutdown
//! lib.rs           — router assembly
//! auth.rs          — Bearer token middleware, constant-time comparison
//! config.rs        — TOML + env-var configuration
//! error.rs         — ApiError → HTTP status + JSON body
//! state.rs         — AppState shared by handlers
//! routes/
//!   root.rs        — GET /
//!   health.rs      — GET /api/health
//!   videos.rs      — POST generate, GET status
//! videos/
//!   mod.rs         — VideoJob, VideoStatus, ID and URL formats
//!   registry.rs    — in-memory VideoRegistry
//! ```

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use sonia_video_mock::{AppState, Config};

/// Mock asynchronous video-generation API.
#[derive(Parser)]
#[command(name = "sonia-video-mock", version)]
struct Cli {
    /// Path to TOML config file.
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default when no subcommand given).
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = match cli.command {
        Some(Commands::Serve) | None => cli.config,
    };

    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            // Tracing is configured from this config, so it is not up yet.
            eprintln!("sonia-video-mock: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    match run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_server(config: Config) -> std::io::Result<()> {
    info!("sonia-video-mock v{} starting", env!("CARGO_PKG_VERSION"));
    info!("Listening on {}", config.server.listen);

    if config.auth.api_key.is_empty() {
        warn!("SONIA_VIDEO_API_KEY is empty, an empty Bearer token will be accepted");
    }

    let state = AppState::new(config);
    let app = sonia_video_mock::router(state.clone());

    let listener = TcpListener::bind(&state.config.server.listen).await?;
    info!("Server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(
        videos = state.videos.len().await,
        "Shutting down, in-memory videos discarded"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received SIGINT"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
                info!("Received SIGINT");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received SIGINT");
    }
}
