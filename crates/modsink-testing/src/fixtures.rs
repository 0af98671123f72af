//! Canonical callback payloads for tests.
//!
//! Builders start from a fully valid payload for the media kind, so a
//! test only states its deviation: override a field, blank it, or drop
//! it entirely to probe validation.

use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Builder for provider callback payloads.
#[derive(Debug, Clone)]
pub struct CallbackBuilder {
    fields: Map<String, Value>,
}

impl CallbackBuilder {
    /// Valid audio payload with generated identifiers.
    pub fn audio() -> Self {
        let mut fields = Map::new();
        fields.insert("requestId".to_string(), json!(format!("req-{}", Uuid::new_v4().simple())));
        fields.insert("btId".to_string(), json!(format!("bt-{}", Uuid::new_v4().simple())));
        fields.insert("message".to_string(), json!("Content approved"));
        fields.insert("riskLevel".to_string(), json!("PASS"));

        Self { fields }
    }

    /// Valid video payload with generated identifiers and frame detail.
    pub fn video() -> Self {
        let mut fields = Map::new();
        fields.insert("requestId".to_string(), json!(format!("req-{}", Uuid::new_v4().simple())));
        fields.insert("btId".to_string(), json!(format!("bt-{}", Uuid::new_v4().simple())));
        fields.insert("riskLevel".to_string(), json!("REVIEW"));
        fields.insert(
            "frames".to_string(),
            json!([
                {"offsetMs": 0, "label": "normal"},
                {"offsetMs": 5000, "label": "flagged"},
            ]),
        );

        Self { fields }
    }

    /// Sets `requestId`.
    #[must_use]
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.fields.insert("requestId".to_string(), Value::String(id.into()));
        self
    }

    /// Sets an arbitrary field, replacing any existing value.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Removes a field entirely.
    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    /// Finishes the payload.
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Valid audio payload with the given requestId.
pub fn audio_payload(request_id: &str) -> Value {
    CallbackBuilder::audio().request_id(request_id).build()
}

/// Valid video payload with the given requestId.
pub fn video_payload(request_id: &str) -> Value {
    CallbackBuilder::video().request_id(request_id).build()
}
