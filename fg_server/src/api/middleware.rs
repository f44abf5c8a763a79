//! Seat token middleware for player endpoints.
//!
//! Extracts the seat token handed out on create/join from the
//! `Authorization: Bearer <token>` header and injects it into request
//! extensions. Whether the token belongs to the addressed room is decided by
//! the room itself.
//!
//! # Extracting the token
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use forest_game::PlayerToken;
//!
//! async fn handler(Extension(token): Extension<PlayerToken>) -> String {
//!     format!("Acting as {}", token)
//! }
//! # let _ = handler;
//! ```

use axum::{
    Json,
    extract::Request,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use forest_game::PlayerToken;

use super::games::ErrorResponse;

/// Parse `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<PlayerToken> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(PlayerToken::parse)
}

/// Token middleware
///
/// # Behavior
///
/// - **Success**: Injects `PlayerToken` into request extensions
/// - **Missing or malformed header**: Returns `401 Unauthorized`
pub async fn token_middleware(mut request: Request, next: Next) -> Response {
    match bearer_token(request.headers()) {
        Some(token) => {
            request.extensions_mut().insert(token);
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Missing or invalid player token".to_string(),
            }),
        )
            .into_response(),
    }
}
