//! HTTP API for the modsink moderation-callback receiver.
//!
//! Provides the axum router and server lifecycle, the callback ingress
//! and log-browsing handlers, health reporting, configuration loading,
//! and the shared application state handlers run against.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use config::{ArchiveMode, Config};
pub use error::ApiError;
pub use server::{create_router, start_server};
pub use state::AppState;
