//! API error types mapping failures onto HTTP responses.
//!
//! One enum covers the whole surface: malformed bodies and rejected
//! filenames become 400s, absent records 404s, and persistence faults
//! 500s carrying the underlying message. Handlers return
//! `Result<_, ApiError>` and bubble with `?`; the [`IntoResponse`] impl
//! shapes the JSON body the provider-facing contract promises.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use modsink_core::MediaKind;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body was not parseable JSON.
    #[error("Invalid JSON payload: {details}")]
    MalformedJson {
        /// Underlying parse failure.
        details: String,
    },

    /// Required provider fields absent, null, or empty (database adapter).
    #[error("Missing required fields: {}", required.join(", "))]
    MissingFields {
        /// Exactly the missing fields, in canonical order.
        required: Vec<&'static str>,
    },

    /// The active archive failed while persisting a callback.
    #[error("Failed to process {media} callback: {details}")]
    ArchiveFailure {
        /// Which ingress route failed.
        media: MediaKind,
        /// Underlying adapter failure.
        details: String,
    },

    /// Requested log filename failed validation.
    #[error("Invalid log filename: {reason}")]
    InvalidLogFilename {
        /// Why the name was rejected.
        reason: String,
    },

    /// Requested log file does not exist.
    #[error("Log file not found: {filename}")]
    LogNotFound {
        /// The name that was requested.
        filename: String,
    },

    /// A log file exists but could not be read or parsed.
    #[error("Failed to read log file: {details}")]
    LogReadFailure {
        /// Underlying read or parse failure.
        details: String,
    },

    /// Log browsing requested while the file adapter is inactive.
    ///
    /// The routes are only mounted under the file adapter, so this is
    /// unreachable through the public router.
    #[error("Log browsing is not enabled")]
    LogsDisabled,
}

impl ApiError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedJson { .. }
            | Self::MissingFields { .. }
            | Self::InvalidLogFilename { .. } => StatusCode::BAD_REQUEST,
            Self::LogNotFound { .. } | Self::LogsDisabled => StatusCode::NOT_FOUND,
            Self::ArchiveFailure { .. } | Self::LogReadFailure { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// JSON body sent to the client.
    fn body(&self) -> serde_json::Value {
        match self {
            Self::MalformedJson { details } => json!({
                "error": "Invalid JSON payload",
                "details": details,
            }),
            Self::MissingFields { required } => json!({
                "error": "Missing required fields",
                "required": required,
            }),
            Self::ArchiveFailure { media, details } => json!({
                "error": format!("Failed to process {media} callback"),
                "details": details,
            }),
            Self::InvalidLogFilename { .. } => json!({
                "error": "Invalid filename",
            }),
            Self::LogNotFound { .. } => json!({
                "error": "Log file not found",
            }),
            Self::LogReadFailure { details } => json!({
                "error": "Failed to read log file",
                "details": details,
            }),
            Self::LogsDisabled => json!({
                "error": "Log browsing is not enabled",
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log level tracks the fault class before the body is shaped.
        match &self {
            Self::ArchiveFailure { .. } | Self::LogReadFailure { .. } => {
                tracing::error!("Internal error: {self}");
            },
            Self::MalformedJson { .. } | Self::MissingFields { .. } => {
                tracing::warn!("Client error: {self}");
            },
            Self::InvalidLogFilename { .. } | Self::LogNotFound { .. } | Self::LogsDisabled => {
                tracing::debug!("Client error: {self}");
            },
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}
