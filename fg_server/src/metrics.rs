//! Prometheus metrics for monitoring rooms and games.
//!
//! Metrics are exposed in Prometheus text format on a separate listener when
//! `METRICS_BIND` is set. Without an installed recorder every call here is a
//! no-op.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts by route and status
//! - **Room Metrics**: Rooms created and currently open
//! - **Game Metrics**: Actions by kind and outcome, finished games

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, route: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

// ============================================================================
// Room Metrics
// ============================================================================

/// Increment rooms created counter.
pub fn rooms_created_total(variant: &str) {
    metrics::counter!("rooms_created_total",
        "variant" => variant.to_string()
    )
    .increment(1);
}

/// Set current open rooms count.
pub fn rooms_active(count: usize) {
    metrics::gauge!("rooms_active").set(count as f64);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Record an action submission and how it ended.
pub fn actions_total(kind: &str, outcome: &str) {
    metrics::counter!("actions_total",
        "kind" => kind.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Increment finished games counter.
pub fn games_finished_total(variant: &str, winner: &str) {
    metrics::counter!("games_finished_total",
        "variant" => variant.to_string(),
        "winner" => winner.to_string()
    )
    .increment(1);
}
