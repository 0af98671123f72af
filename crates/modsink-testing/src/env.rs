//! Disposable test environment with router builders and HTTP helpers.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use modsink_api::{create_router, AppState};
use modsink_core::{Archive, ConsoleArchive, FileArchive, TestClock};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Test environment with an isolated log directory and deterministic
/// clock.
///
/// Each instance owns a temp directory that is removed on drop, so
/// parallel tests never share archive state. Routers built from the
/// same environment share its clock, letting tests advance time and
/// observe uptime or record timestamps deterministically.
pub struct TestEnv {
    /// Deterministic clock injected into routers built by this env.
    pub clock: TestClock,
    log_dir: TempDir,
}

impl TestEnv {
    /// Creates a fresh environment with its own temp log directory.
    pub fn new() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
            )
            .with_test_writer()
            .try_init();

        let log_dir = TempDir::new().context("failed to create temp log directory")?;

        Ok(Self { clock: TestClock::new(), log_dir })
    }

    /// Path of the log directory backing file-mode routers.
    pub fn log_path(&self) -> &Path {
        self.log_dir.path()
    }

    /// Opens a file archive over this environment's log directory.
    pub async fn file_archive(&self) -> Result<FileArchive> {
        FileArchive::open(self.log_dir.path()).await.context("failed to open file archive")
    }

    /// Router running the file adapter with log browsing mounted.
    pub async fn file_router(&self) -> Result<Router> {
        let archive = Arc::new(self.file_archive().await?);
        let state = AppState::new(
            archive.clone(),
            Some(archive),
            Arc::new(self.clock.clone()),
            "test",
        );

        Ok(create_router(state))
    }

    /// Router running the console adapter (no persistence, no log routes).
    pub fn console_router(&self) -> Router {
        self.router_with_archive(Arc::new(ConsoleArchive::new()))
    }

    /// Router over an injected archive (no log routes).
    ///
    /// Pair with [`crate::RecordingArchive`] to exercise the validating
    /// database-style path without PostgreSQL.
    pub fn router_with_archive(&self, archive: Arc<dyn Archive>) -> Router {
        let state = AppState::new(archive, None, Arc::new(self.clock.clone()), "test");

        create_router(state)
    }

    /// POSTs a JSON payload and returns status plus parsed body.
    pub async fn post_json(
        &self,
        router: &Router,
        uri: &str,
        payload: &Value,
    ) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .context("failed to build request")?;

        Self::execute(router, request).await
    }

    /// POSTs a raw body for malformed-payload scenarios.
    pub async fn post_raw(
        &self,
        router: &Router,
        uri: &str,
        body: &str,
    ) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .context("failed to build request")?;

        Self::execute(router, request).await
    }

    /// GETs a path and returns status plus parsed body.
    pub async fn get(&self, router: &Router, uri: &str) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .context("failed to build request")?;

        Self::execute(router, request).await
    }

    async fn execute(router: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response =
            router.clone().oneshot(request).await.context("failed to execute request")?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("failed to read response body")?;

        // Unrouted paths answer with an empty body.
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not valid JSON")?
        };

        Ok((status, body))
    }
}
