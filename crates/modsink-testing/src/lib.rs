//! Test infrastructure for the modsink workspace.
//!
//! Provides a disposable environment with an isolated log directory and
//! a controllable clock, router builders for every adapter, in-memory
//! archive doubles, and canonical callback payload fixtures. Tests
//! drive the real router through `tower::ServiceExt::oneshot`, so no
//! port binding or external services are required.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
pub mod fixtures;
pub mod recording;

pub use env::TestEnv;
pub use fixtures::CallbackBuilder;
pub use modsink_core::TestClock;
pub use recording::RecordingArchive;
