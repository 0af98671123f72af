//! Moderation-callback ingress for audio and video results.
//!
//! Both routes share one implementation parameterized by media kind:
//! parse the raw body as JSON, log the full payload, validate required
//! fields when the active archive demands it, then store the record and
//! acknowledge with the archive's receipt. Unknown payload fields are
//! accepted and preserved verbatim.

use axum::{body::Bytes, extract::State, Json};
use chrono::{DateTime, Utc};
use modsink_core::{ArchiveReceipt, CallbackId, MediaKind, ModerationResult};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState};

/// Acknowledgement returned for accepted callbacks.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    /// Always `true`; failures use the error envelope instead.
    pub success: bool,

    /// Human-readable acknowledgement.
    pub message: String,

    /// File the record was saved under (file adapter only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to_file: Option<String>,

    /// Generated row identifier (database adapter only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CallbackId>,
}

/// Receives an audio moderation result.
pub async fn receive_audio_result(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CallbackResponse>, ApiError> {
    receive_callback(&state, MediaKind::Audio, &body).await
}

/// Receives a video moderation result.
pub async fn receive_video_result(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CallbackResponse>, ApiError> {
    receive_callback(&state, MediaKind::Video, &body).await
}

/// Shared ingress path for both callback routes.
#[instrument(
    name = "receive_callback",
    skip(state, body),
    fields(media = %media, payload_bytes = body.len())
)]
async fn receive_callback(
    state: &AppState,
    media: MediaKind,
    body: &[u8],
) -> Result<Json<CallbackResponse>, ApiError> {
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::MalformedJson { details: e.to_string() })?;

    let received_at = DateTime::<Utc>::from(state.clock.now_system());
    let result = ModerationResult::from_payload(media, payload, received_at);

    info!(
        request_id = result.request_id.as_deref().unwrap_or("-"),
        bt_id = result.bt_id.as_deref().unwrap_or("-"),
        risk_level = result.risk_level.as_deref().unwrap_or("-"),
        message = result.message.as_deref().unwrap_or("-"),
        payload = %result.payload,
        "Received {} callback",
        media.label()
    );

    if state.archive.requires_validation() {
        let missing = result.missing_required_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Rejecting callback with missing required fields");
            return Err(ApiError::MissingFields { required: missing });
        }
    }

    let receipt = state
        .archive
        .store(&result)
        .await
        .map_err(|e| ApiError::ArchiveFailure { media, details: e.to_string() })?;

    Ok(Json(acknowledge(media, receipt)))
}

/// Builds the acknowledgement for a stored callback.
fn acknowledge(media: MediaKind, receipt: ArchiveReceipt) -> CallbackResponse {
    let message = format!("{} callback received successfully", media.label());

    match receipt {
        ArchiveReceipt::Logged => {
            CallbackResponse { success: true, message, saved_to_file: None, id: None }
        },
        ArchiveReceipt::File { filename } => {
            CallbackResponse { success: true, message, saved_to_file: Some(filename), id: None }
        },
        ArchiveReceipt::Database { id } => {
            CallbackResponse { success: true, message, saved_to_file: None, id: Some(id) }
        },
    }
}
