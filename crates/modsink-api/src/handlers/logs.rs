//! Log-browsing routes over the file archive.
//!
//! Mounted only while the file adapter is active; other adapters leave
//! the paths unrouted. Client-supplied filenames are validated inside
//! the archive before any path is built, so traversal attempts are
//! rejected without touching the filesystem.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use modsink_core::{CoreError, FileArchive, LogFileInfo, LogRecord};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Listing envelope for `GET /api/logs`.
#[derive(Debug, Serialize)]
pub struct LogListResponse {
    /// Always `true`; failures use the error envelope instead.
    pub success: bool,

    /// Number of archived records.
    pub count: usize,

    /// Records sorted by modification time, newest first.
    pub files: Vec<LogFileInfo>,
}

/// Lists archived callback records.
#[instrument(name = "list_logs", skip(state))]
pub async fn list_logs(State(state): State<AppState>) -> Result<Json<LogListResponse>, ApiError> {
    let store = file_store(&state)?;

    let files = store
        .list()
        .await
        .map_err(|e| ApiError::LogReadFailure { details: e.to_string() })?;

    debug!(count = files.len(), "Listed archived callback records");

    Ok(Json(LogListResponse { success: true, count: files.len(), files }))
}

/// Fetches one archived record by exact filename.
#[instrument(name = "get_log", skip(state))]
pub async fn get_log(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<LogRecord>, ApiError> {
    let store = file_store(&state)?;

    match store.read(&filename).await {
        Ok(record) => Ok(Json(record)),
        Err(CoreError::InvalidInput(reason)) => Err(ApiError::InvalidLogFilename { reason }),
        Err(CoreError::NotFound(_)) => Err(ApiError::LogNotFound { filename }),
        Err(e) => Err(ApiError::LogReadFailure { details: e.to_string() }),
    }
}

/// The file store these routes serve from.
///
/// The routes are only mounted when the store exists, so the error arm
/// is a misconfiguration guard rather than a reachable path.
fn file_store(state: &AppState) -> Result<&Arc<FileArchive>, ApiError> {
    state.file_store.as_ref().ok_or(ApiError::LogsDisabled)
}
