//! Shared application state wired at startup and injected into handlers.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use modsink_core::{Archive, Clock, FileArchive};

/// Process-wide resources handed to every handler.
///
/// Built once in `main` (or a test harness) and cloned per request;
/// there are no module-level singletons, so parallel tests each get an
/// isolated instance.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Active persistence adapter for inbound callbacks.
    pub archive: Arc<dyn Archive>,

    /// File store backing the log-browsing routes.
    ///
    /// `Some` only under the file adapter; the routes are not mounted
    /// otherwise.
    pub file_store: Option<Arc<FileArchive>>,

    /// Clock used for record timestamps and uptime measurement.
    pub clock: Arc<dyn Clock>,

    /// Deployment environment label reported by `/health`.
    pub environment: String,

    started_at: Instant,
}

impl AppState {
    /// Builds state, capturing the start instant from the clock.
    pub fn new(
        archive: Arc<dyn Archive>,
        file_store: Option<Arc<FileArchive>>,
        clock: Arc<dyn Clock>,
        environment: impl Into<String>,
    ) -> Self {
        let started_at = clock.now();
        Self { archive, file_store, clock, environment: environment.into(), started_at }
    }

    /// Time elapsed since this state was constructed.
    pub fn uptime(&self) -> Duration {
        self.clock.now().duration_since(self.started_at)
    }
}
