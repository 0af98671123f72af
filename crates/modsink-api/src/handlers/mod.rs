//! HTTP request handlers for the modsink API.
//!
//! Handlers follow a consistent pattern: parse and validate input, log
//! the received payload for observability, delegate persistence to the
//! active archive, and answer with the standardized JSON envelopes.
//!
//! # Handler Organization
//!
//! - `callbacks`: audio/video moderation-result ingress
//! - `logs`: archived-record browsing (file adapter only)
//! - `health`: process health and uptime reporting

pub mod callbacks;
pub mod health;
pub mod logs;

pub use callbacks::{receive_audio_result, receive_video_result};
pub use health::health_check;
pub use logs::{get_log, list_logs};
