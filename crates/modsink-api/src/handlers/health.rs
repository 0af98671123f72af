//! Process health and uptime reporting.
//!
//! Stateless report of uptime, process memory, and environment. The
//! endpoint probes no dependencies and always succeeds, so it is safe
//! for aggressive liveness polling. Uptime derives from the injected
//! clock, which keeps it monotonically non-decreasing in-process and
//! controllable in tests.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::{debug, instrument};

use crate::state::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`; the endpoint does not probe dependencies.
    pub status: &'static str,

    /// When the report was produced.
    pub timestamp: DateTime<Utc>,

    /// Time since the service started.
    pub uptime: UptimeReport,

    /// Process memory usage in whole megabytes.
    pub memory: MemoryReport,

    /// Configured deployment environment label.
    pub environment: String,

    /// Crate version serving the report.
    pub version: String,
}

/// Uptime in raw seconds plus a human-readable rendering.
#[derive(Debug, Serialize)]
pub struct UptimeReport {
    /// Whole seconds since startup.
    pub seconds: u64,

    /// `"1d 2h 3m 4s"` style rendering; zero units are omitted and
    /// seconds always appear.
    pub formatted: String,
}

/// Resident and virtual process memory as `"NMB"` strings.
#[derive(Debug, Serialize)]
pub struct MemoryReport {
    /// Resident set size.
    pub rss: String,

    /// Virtual memory size.
    #[serde(rename = "virtual")]
    pub virtual_size: String,
}

/// Health check endpoint handler.
#[instrument(name = "health_check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = state.uptime().as_secs();
    // Metric collection must never fail the probe.
    let (rss_bytes, virtual_bytes) = process_memory().unwrap_or((0, 0));

    debug!(uptime_seconds, "Health check completed");

    Json(HealthResponse {
        status: "ok",
        timestamp: DateTime::<Utc>::from(state.clock.now_system()),
        uptime: UptimeReport {
            seconds: uptime_seconds,
            formatted: format_uptime(uptime_seconds),
        },
        memory: MemoryReport {
            rss: format!("{}MB", to_whole_mb(rss_bytes)),
            virtual_size: format!("{}MB", to_whole_mb(virtual_bytes)),
        },
        environment: state.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Renders seconds as `{d}d {h}h {m}m {s}s`, omitting zero units.
///
/// Seconds always appear, so zero uptime renders `"0s"` and interior
/// zeros drop out (`86404` renders `"1d 4s"`).
fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));

    parts.join(" ")
}

/// Reads resident and virtual memory for this process, in bytes.
fn process_memory() -> Option<(u64, u64)> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_memory(),
    );

    let process = system.process(pid)?;
    Some((process.memory(), process.virtual_memory()))
}

/// Rounds bytes to whole megabytes.
fn to_whole_mb(bytes: u64) -> u64 {
    (bytes + 512 * 1024) / (1024 * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_omits_zero_units_but_keeps_seconds() {
        assert_eq!(format_uptime(0), "0s");
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(60), "1m 0s");
        assert_eq!(format_uptime(61), "1m 1s");
        assert_eq!(format_uptime(300), "5m 0s");
        assert_eq!(format_uptime(3_600), "1h 0s");
        assert_eq!(format_uptime(3_661), "1h 1m 1s");
    }

    #[test]
    fn format_drops_interior_zero_units() {
        assert_eq!(format_uptime(86_400), "1d 0s");
        assert_eq!(format_uptime(86_404), "1d 4s");
        assert_eq!(format_uptime(86_460), "1d 1m 0s");
        assert_eq!(format_uptime(90_061), "1d 1h 1m 1s");
    }

    #[test]
    fn megabyte_rounding_is_to_nearest() {
        assert_eq!(to_whole_mb(0), 0);
        assert_eq!(to_whole_mb(1024 * 1024), 1);
        assert_eq!(to_whole_mb(1_500_000), 1);
        assert_eq!(to_whole_mb(1_600_000), 2);
    }

    #[test]
    fn process_memory_reports_this_process() {
        let (rss, virtual_size) = process_memory().expect("read own process metrics");

        assert!(rss > 0);
        assert!(virtual_size > 0);
    }
}
