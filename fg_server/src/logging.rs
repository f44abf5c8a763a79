//! Structured logging configuration.
//!
//! Library code logs through the `log` facade; the subscriber installed here
//! picks those records up alongside the server's own `tracing` events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info,hyper=warn,tower_http=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use fg_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a finished game with its outcome
///
/// # Arguments
///
/// * `code` - Room code
/// * `variant` - Scenario name
/// * `scores` - Final victory points by seat
/// * `winner` - Winner label ("Player 1", "Player 2" or "Draw")
pub fn log_game_finished(code: &str, variant: &str, scores: &[i64], winner: &str) {
    tracing::info!(
        room = code,
        variant = variant,
        scores = ?scores,
        winner = winner,
        "Game finished"
    );
}

/// Log a request that was refused by the room or the rules
pub fn log_refused_action(code: &str, action: &str, reason: &str) {
    tracing::debug!(room = code, action = action, reason = reason, "Action refused");
}
