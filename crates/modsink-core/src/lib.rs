//! Core domain models and persistence adapters.
//!
//! Provides strongly-typed domain primitives for moderation callbacks, the
//! pluggable archive abstraction with its console, file, and database
//! implementations, and error handling shared by the rest of the service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod error;
pub mod models;
pub mod time;

pub use archive::{Archive, ConsoleArchive, DbArchive, FileArchive};
pub use error::{CoreError, Result};
pub use models::{
    ArchiveReceipt, CallbackId, LogFileInfo, LogRecord, MediaKind, ModerationResult,
};
pub use time::{Clock, RealClock, TestClock};
