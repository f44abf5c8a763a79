//! Forest game server using the async room actor model.
//!
//! Each room is a RoomActor owned by the RoomManager; the HTTP API forwards
//! requests to it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use fg_server::{
    api,
    config::{Overrides, ServerConfig},
    logging, metrics,
};
use forest_game::{RoomManager, Variant};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run a two-player forest game server

USAGE:
  fg_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --metrics-bind  IP:PORT  Prometheus listener         [default: env METRICS_BIND, disabled if unset]
  --variant       N        Default scenario 1-3        [default: env DEFAULT_VARIANT or 1]
  --seed          N        Fixed dice seed             [default: env DICE_SEED, random if unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  METRICS_BIND             Prometheus scrape address (e.g., 0.0.0.0:9090)
  DEFAULT_VARIANT          1 Overshoot & Collapse, 2 Hubbert Curve, 3 Sustainable Scenario
  ROOM_INBOX_CAPACITY      Queued requests per room  [default: 100]
  MAX_ROOMS                Open rooms at once        [default: 1000]
  ROOM_IDLE_TIMEOUT_SECS   Idle room shutdown        [default: 1800]
  DICE_SEED                Reproducible woodcutter dice
  RUST_LOG                 Log filter                [default: info]
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        bind: pargs.opt_value_from_str::<_, SocketAddr>("--bind")?,
        metrics_bind: pargs.opt_value_from_str::<_, SocketAddr>("--metrics-bind")?,
        variant: pargs
            .opt_value_from_str::<_, String>("--variant")?
            .map(|raw| Variant::parse_lenient(&raw)),
        dice_seed: pargs.opt_value_from_str::<_, u64>("--seed")?,
    };

    logging::init();

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(anyhow::Error::msg)?;
        info!("Prometheus metrics at http://{}/metrics", addr);
    }

    info!(
        "Default scenario: {}, room limit {}, inbox capacity {}",
        config.rooms.default_variant, config.rooms.max_rooms, config.rooms.inbox_capacity
    );
    if let Some(seed) = config.rooms.dice_seed {
        info!("Dice seeded with {}", seed);
    }

    let api_state = api::AppState {
        room_manager: Arc::new(RoomManager::new(config.rooms)),
    };
    let app = api::create_router(api_state);

    info!("Starting HTTP server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
