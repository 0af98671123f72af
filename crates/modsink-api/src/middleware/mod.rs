//! HTTP middleware for request processing.
//!
//! Callback ingestion is unauthenticated by contract (the provider does
//! not sign deliveries), so the stack is limited to request-id tagging
//! for correlation.

pub mod request_id;
