//! Recording archive double for exercising ingress without storage.

use std::sync::Mutex;

use async_trait::async_trait;
use modsink_core::{Archive, ArchiveReceipt, CallbackId, CoreError, ModerationResult, Result};

/// Archive double that captures stored results in memory.
///
/// Behaves like the database adapter: validation is required and
/// receipts carry generated row IDs, so the required-field gate and
/// acknowledgement shape can be tested without PostgreSQL. A failure
/// can be armed with [`RecordingArchive::fail_with`] to drive the
/// server-error path.
#[derive(Debug, Default)]
pub struct RecordingArchive {
    stored: Mutex<Vec<ModerationResult>>,
    failure: Mutex<Option<String>>,
}

impl RecordingArchive {
    /// Creates an empty recording archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every result stored so far.
    pub fn stored(&self) -> Vec<ModerationResult> {
        self.stored.lock().expect("recording archive lock poisoned").clone()
    }

    /// Number of results stored so far.
    pub fn len(&self) -> usize {
        self.stored.lock().expect("recording archive lock poisoned").len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every subsequent store fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().expect("recording archive lock poisoned") = Some(message.into());
    }

    /// Clears an armed failure.
    pub fn clear_failure(&self) {
        *self.failure.lock().expect("recording archive lock poisoned") = None;
    }
}

#[async_trait]
impl Archive for RecordingArchive {
    async fn store(&self, result: &ModerationResult) -> Result<ArchiveReceipt> {
        let armed = self.failure.lock().expect("recording archive lock poisoned").clone();
        if let Some(message) = armed {
            return Err(CoreError::Database(message));
        }

        self.stored.lock().expect("recording archive lock poisoned").push(result.clone());

        Ok(ArchiveReceipt::Database { id: CallbackId::new() })
    }

    fn requires_validation(&self) -> bool {
        true
    }
}
