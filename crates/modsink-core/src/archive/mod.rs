//! Pluggable persistence for received callbacks.
//!
//! Exactly one adapter is active per process, selected by configuration
//! at startup: console (log only), file (one JSON record per callback),
//! or database (one PostgreSQL row per callback). Adapters are never
//! combined and the ingress handlers see only the [`Archive`] trait.

pub mod console;
pub mod database;
pub mod file;

pub use console::ConsoleArchive;
pub use database::DbArchive;
pub use file::FileArchive;

use crate::{
    error::Result,
    models::{ArchiveReceipt, ModerationResult},
};

/// Persistence seam for inbound moderation callbacks.
///
/// Implementations store one received result and report what the HTTP
/// acknowledgement should echo. Storage is synchronous with the request:
/// the provider only gets a success response once the record is durable
/// (or logged, for the console adapter).
#[async_trait::async_trait]
pub trait Archive: Send + Sync + std::fmt::Debug {
    /// Stores one received result.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store rejects the write; the
    /// caller maps it to a 500 response.
    async fn store(&self, result: &ModerationResult) -> Result<ArchiveReceipt>;

    /// Whether ingress must reject payloads with missing required fields.
    ///
    /// Only the database adapter enforces the provider contract; the
    /// console and file adapters accept any JSON shape.
    fn requires_validation(&self) -> bool {
        false
    }
}
