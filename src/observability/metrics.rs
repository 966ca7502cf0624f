//! Metrics collection and exposition.
//!
//! # Metrics
//! - `daemon_commands_total` (counter): commands executed, by command and status.
//!   Paths that matched no command share the `unknown` label
//! - `daemon_command_duration_seconds` (histogram): command latency
//! - `daemon_shutdown_timeouts_total` (counter): api server drains that hit the bound

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Label used for unmatched command paths.
pub const UNKNOWN_COMMAND: &str = "unknown";

/// Metric label for a command path.
///
/// Unmatched paths come straight from the client, so they collapse into one series.
pub fn command_label(command: &str, status: u16) -> &str {
    if status == 404 {
        UNKNOWN_COMMAND
    } else {
        command
    }
}

/// Record one command execution.
pub fn record_command(command: &str, status: u16, start: Instant) {
    let labels = [
        ("command", command.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("daemon_commands_total", &labels).increment(1);
    metrics::histogram!("daemon_command_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record an api server drain that exceeded the shutdown bound.
pub fn record_shutdown_timeout() {
    metrics::counter!("daemon_shutdown_timeouts_total").increment(1);
}
