//! HTTP API for the forest game server.
//!
//! Each game lives in a room addressed by a short join code. The host
//! creates the room, shares the code, and the second participant joins with
//! it. Both then act through the seat tokens they received.
//!
//! # Modules
//!
//! - [`games`]: Room and game endpoints
//! - [`middleware`]: Seat token extraction for player endpoints
//! - [`request_id`]: Request correlation ids
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health                        - Health check (public)
//! POST   /api/v1/games                  - Create a room, take seat 0 (public)
//! POST   /api/v1/games/{code}/join      - Join a room, take seat 1 (public)
//! GET    /api/v1/games/{code}/status    - Readiness and turn polling (public)
//! GET    /api/v1/games/{code}           - Full state (token required)
//! POST   /api/v1/games/{code}/actions   - Take an action (token required)
//! POST   /api/v1/games/{code}/report    - CSV round history (token required)
//! DELETE /api/v1/games/{code}           - Close the room (token required)
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use fg_server::api::{AppState, create_router};
//! use forest_game::{RoomConfig, RoomManager};
//! use std::sync::Arc;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let state = AppState {
//!     room_manager: Arc::new(RoomManager::new(RoomConfig::default())),
//! };
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:6969").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod games;
pub mod middleware;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use forest_game::RoomManager;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub room_manager: Arc<RoomManager>,
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    let public_routes = Router::new()
        .route("/games", post(games::create_game))
        .route("/games/{code}/join", post(games::join_game))
        .route("/games/{code}/status", get(games::game_status));

    let player_routes = Router::new()
        .route("/games/{code}", get(games::get_game).delete(games::close_game))
        .route("/games/{code}/actions", post(games::take_action))
        .route("/games/{code}/report", post(games::export_report))
        .layer(axum::middleware::from_fn(middleware::token_middleware));

    Router::new().merge(public_routes).merge(player_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","version":"0.1.0","rooms":{"active_count":2},"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let room_count = state.room_manager.room_count().await;

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "rooms": {
            "active_count": room_count,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
