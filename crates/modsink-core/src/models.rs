//! Core domain models for moderation callbacks.
//!
//! Defines the media discriminator, the received-callback record with its
//! extracted provider fields, archive receipts, and the persisted log
//! record/listing shapes. Payloads are kept as opaque JSON and validated
//! only at the boundary fields the provider contract actually requires.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Which callback route a result arrived on.
///
/// The lowercase rendering ("audio"/"video") is the `{type}` component of
/// archived file names and the database discriminator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Audio moderation result.
    Audio,
    /// Video moderation result.
    Video,
}

impl MediaKind {
    /// Lowercase discriminator used in file names and database rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Capitalized label used in acknowledgement messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::Video => "Video",
        }
    }

    /// Provider fields that must be present when validation is enabled.
    ///
    /// Audio callbacks additionally carry a human-readable `message`;
    /// the order here is the canonical order for error reporting.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Audio => &["requestId", "btId", "message", "riskLevel"],
            Self::Video => &["requestId", "btId", "riskLevel"],
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strongly-typed identifier for an archived callback row.
///
/// Generated client-side when the database adapter inserts a row and
/// echoed back to the provider in the acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackId(pub Uuid);

impl CallbackId {
    /// Creates a new random callback ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallbackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CallbackId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// One received moderation callback.
///
/// The payload is stored verbatim; the well-known provider fields are
/// extracted beside it for logging, file naming, and database columns.
/// Records are created once per inbound request and never updated.
#[derive(Debug, Clone)]
pub struct ModerationResult {
    /// Which callback route the result arrived on.
    pub media: MediaKind,

    /// Caller-assigned correlation identifier, if the payload carried one.
    pub request_id: Option<String>,

    /// Provider-assigned batch/track identifier.
    pub bt_id: Option<String>,

    /// Human-readable verdict (audio callbacks).
    pub message: Option<String>,

    /// Categorical moderation-severity label, free-form.
    pub risk_level: Option<String>,

    /// The callback payload exactly as received.
    pub payload: Value,

    /// Server-assigned receipt timestamp.
    pub received_at: DateTime<Utc>,
}

impl ModerationResult {
    /// Builds a result from a raw callback payload.
    ///
    /// Extracts the well-known fields without touching the payload
    /// itself: string values are taken as-is, scalar values are rendered
    /// to their string form, and anything else is treated as absent.
    pub fn from_payload(media: MediaKind, payload: Value, received_at: DateTime<Utc>) -> Self {
        let request_id = string_field(&payload, "requestId");
        let bt_id = string_field(&payload, "btId");
        let message = string_field(&payload, "message");
        let risk_level = string_field(&payload, "riskLevel");

        Self { media, request_id, bt_id, message, risk_level, payload, received_at }
    }

    /// Names of required fields that are missing, in canonical order.
    ///
    /// A field is missing when it is absent, JSON `null`, or an empty
    /// string; any other JSON value passes. Only the database adapter
    /// acts on this list.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        self.media
            .required_fields()
            .iter()
            .copied()
            .filter(|field| field_is_missing(self.payload.get(*field)))
            .collect()
    }
}

/// Extracts a payload field as a string for logging and file naming.
fn string_field(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

/// Required-field presence test: absent, null, and empty string fail.
fn field_is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// What the active archive reports back for response echoing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveReceipt {
    /// Logged only; nothing was persisted.
    Logged,

    /// Written to `filename` under the log directory.
    File {
        /// Name of the written file.
        filename: String,
    },

    /// Inserted as a new database row.
    Database {
        /// Generated row identifier.
        id: CallbackId,
    },
}

/// Persisted shape of one archived callback file.
///
/// Serializes as `{timestamp, type, requestId, data}`; `requestId` is
/// `null` when the payload carried none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Server-assigned receipt time.
    pub timestamp: DateTime<Utc>,

    /// Media discriminator ("audio" or "video").
    #[serde(rename = "type")]
    pub media: MediaKind,

    /// Correlation identifier echoed from the payload.
    pub request_id: Option<String>,

    /// The callback payload exactly as received.
    pub data: Value,
}

impl From<&ModerationResult> for LogRecord {
    fn from(result: &ModerationResult) -> Self {
        Self {
            timestamp: result.received_at,
            media: result.media,
            request_id: result.request_id.clone(),
            data: result.payload.clone(),
        }
    }
}

/// Listing entry for one archived callback file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFileInfo {
    /// File name within the log directory.
    pub filename: String,

    /// File size in bytes.
    pub size: u64,

    /// Creation timestamp, falling back to the modification time on
    /// filesystems that do not track creation.
    pub created: DateTime<Utc>,

    /// Last modification timestamp.
    pub modified: DateTime<Utc>,
}
