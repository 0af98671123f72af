//! HTTP server configuration and request routing.
//!
//! Provides Axum server setup with middleware stack and graceful
//! shutdown for the callback ingress endpoints. Requests flow through
//! middleware in order:
//! 1. Request ID generation
//! 2. Request/response logging
//! 3. Timeout enforcement (30s)
//! 4. Body size limit (100MB)
//! 5. Handler execution
//!
//! The log-browsing routes are mounted only when the file adapter is
//! active; under other adapters those paths fall through to a 404.
//!
//! # Graceful Shutdown
//!
//! The server handles SIGTERM gracefully:
//! - Stops accepting new connections
//! - Waits for in-flight requests (30s max)
//! - Returns so `main` can release adapter resources

use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{handlers, middleware::request_id::inject_request_id, state::AppState};

/// Largest accepted callback body. Frame-level results for long media
/// can run large.
const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

/// Creates the Axum router with all routes and middleware.
///
/// Sets up:
/// - Both callback ingress endpoints
/// - Log browsing (file adapter only)
/// - Health reporting
/// - Request tracing, timeout, and body-limit middleware
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use modsink_api::{server::create_router, AppState};
/// use modsink_core::{ConsoleArchive, RealClock};
///
/// let state = AppState::new(
///     Arc::new(ConsoleArchive::new()),
///     None,
///     Arc::new(RealClock::new()),
///     "development",
/// );
/// let app = create_router(state);
/// // Serve the app...
/// ```
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/callback/audio/results", post(handlers::receive_audio_result))
        .route("/callback/video/results", post(handlers::receive_video_result))
        .route("/health", get(handlers::health_check));

    if state.file_store.is_some() {
        router = router
            .route("/api/logs", get(handlers::list_logs))
            .route("/api/logs/{filename}", get(handlers::get_log));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Starts the HTTP server with graceful shutdown support.
///
/// Binds to the specified address, announces the callback endpoints,
/// and serves requests until a shutdown signal is received.
///
/// # Errors
///
/// Returns `std::io::Error` if:
/// - Port is already in use
/// - Network interface unavailable
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = create_router(state);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);
    info!("Audio results callback endpoint: http://{actual_addr}/callback/audio/results");
    info!("Video results callback endpoint: http://{actual_addr}/callback/video/results");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
///
/// Enables graceful shutdown on:
/// - CTRL+C (SIGINT) - Development
/// - SIGTERM - Kubernetes/Docker
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting up to 30 seconds for in-flight requests to complete");
}
