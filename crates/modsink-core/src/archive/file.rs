//! File-backed archive writing one JSON record per callback.
//!
//! Records are keyed `{type}_{requestId}.json` under a log directory, so
//! a repeated requestId for the same media kind overwrites the earlier
//! record (last write wins). The same store backs the log-browsing API:
//! [`FileArchive::list`] and [`FileArchive::read`] serve the listing and
//! fetch routes, and every client-supplied filename is validated before
//! any path is built.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    archive::Archive,
    error::{CoreError, Result},
    models::{ArchiveReceipt, LogFileInfo, LogRecord, ModerationResult},
};

/// Filename component used when the payload carries no usable requestId.
const UNKNOWN_REQUEST_ID: &str = "unknown";

/// File-backed archive rooted at a log directory.
#[derive(Debug, Clone)]
pub struct FileArchive {
    root: PathBuf,
}

impl FileArchive {
    /// Opens the archive, creating the log directory if absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        Ok(Self { root })
    }

    /// Directory the archive writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filename a result is stored under.
    pub fn filename_for(result: &ModerationResult) -> String {
        format!("{}_{}.json", result.media, sanitize_request_id(result.request_id.as_deref()))
    }

    /// Lists archived records sorted by modification time, newest first.
    ///
    /// Only regular `.json` files are reported; ties on modification
    /// time break by filename so the order is stable.
    ///
    /// # Errors
    ///
    /// Returns an error when the log directory cannot be read.
    pub async fn list(&self) -> Result<Vec<LogFileInfo>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata.modified()?;
            // Not every filesystem tracks creation time.
            let created = metadata.created().unwrap_or(modified);

            files.push(LogFileInfo {
                filename: filename.to_string(),
                size: metadata.len(),
                created: DateTime::<Utc>::from(created),
                modified: DateTime::<Utc>::from(modified),
            });
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.filename.cmp(&b.filename)));

        Ok(files)
    }

    /// Reads one archived record by exact filename.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for names that could escape the log
    /// directory, `NotFound` for absent files, and `Serialization` when
    /// a file exists but does not hold a valid record.
    pub async fn read(&self, filename: &str) -> Result<LogRecord> {
        validate_filename(filename)?;

        let path = self.root.join(filename);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::NotFound(format!("log file {filename} not found")));
            },
            Err(e) => return Err(CoreError::Io(e)),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Archive for FileArchive {
    async fn store(&self, result: &ModerationResult) -> Result<ArchiveReceipt> {
        let filename = Self::filename_for(result);
        let record = LogRecord::from(result);
        let json = serde_json::to_vec_pretty(&record)?;

        tokio::fs::write(self.root.join(&filename), json).await?;
        debug!(filename = %filename, media = %result.media, "Archived callback record");

        Ok(ArchiveReceipt::File { filename })
    }
}

/// Reduces a requestId to the filename-safe charset.
///
/// Characters outside `[A-Za-z0-9._-]` become `_`; a missing or fully
/// empty id becomes `unknown` so the filename stays legal.
pub fn sanitize_request_id(request_id: Option<&str>) -> String {
    let Some(id) = request_id else {
        return UNKNOWN_REQUEST_ID.to_string();
    };

    if id.is_empty() {
        return UNKNOWN_REQUEST_ID.to_string();
    }

    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

/// Rejects filenames that could address anything outside the log
/// directory: path separators, NUL, and the exact dot segments.
///
/// Interior dots stay legal; a name like `video_a..b.json` is an
/// ordinary record name, not a traversal.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(CoreError::InvalidInput("filename must not be empty".to_string()));
    }
    if filename == "." || filename == ".." {
        return Err(CoreError::InvalidInput(format!("filename must not be '{filename}'")));
    }
    if filename.contains(['/', '\\', '\0']) {
        return Err(CoreError::InvalidInput(
            "filename must not contain path separators or NUL".to_string(),
        ));
    }

    Ok(())
}
