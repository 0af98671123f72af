//! Console adapter: the ingress log line is the whole record.

use async_trait::async_trait;

use crate::{
    archive::Archive,
    error::Result,
    models::{ArchiveReceipt, ModerationResult},
};

/// Adapter that keeps no record beyond the ingress log line.
///
/// Useful for local development and smoke testing callback delivery
/// without provisioning a log directory or database.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleArchive;

impl ConsoleArchive {
    /// Creates a console archive.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Archive for ConsoleArchive {
    async fn store(&self, _result: &ModerationResult) -> Result<ArchiveReceipt> {
        Ok(ArchiveReceipt::Logged)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::models::MediaKind;

    #[tokio::test]
    async fn store_acknowledges_without_persisting() {
        let archive = ConsoleArchive::new();
        let result =
            ModerationResult::from_payload(MediaKind::Audio, json!({"requestId": "r1"}), Utc::now());

        let receipt = archive.store(&result).await.expect("console store");

        assert_eq!(receipt, ArchiveReceipt::Logged);
    }

    #[test]
    fn console_adapter_skips_validation() {
        assert!(!ConsoleArchive::new().requires_validation());
    }
}
