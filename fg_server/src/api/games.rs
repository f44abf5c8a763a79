//! Game room API handlers.
//!
//! This module provides HTTP REST endpoints for hosting a two-player game:
//! - Creating a room and taking seat 0
//! - Joining with the shared code and taking seat 1
//! - Polling readiness and turn status
//! - Reading the full game state and submitting actions
//! - Exporting the round history as CSV and closing the room
//!
//! Player endpoints require the seat token returned on create/join as a
//! bearer token.
//!
//! # Examples
//!
//! Create a room:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/games \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Ada", "variant": 2}'
//! ```
//!
//! Take an action:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/games/K3Q9ZD/actions \
//!   -H "Authorization: Bearer TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "replant", "amount": "2"}'
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use forest_game::{
    Action, ActionOutcome, GameError, GameReport, GameView, PlayerToken, RoomCode, RoomError,
    Variant,
    game::{FinalScores, PlayerIndex},
    room::{ParticipantInfo, RoomResponse, RoomStateResponse, RoomStatus},
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::{logging, metrics};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

type ApiResult<T> = Result<T, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a room error to a status code and client-safe message
fn room_error(err: RoomError) -> ApiError {
    let status = match &err {
        RoomError::NotFound(_) | RoomError::Closed => StatusCode::NOT_FOUND,
        RoomError::AlreadyFull(_) | RoomError::GameNotOver => StatusCode::CONFLICT,
        RoomError::CodeSpaceExhausted(_) | RoomError::CapacityReached(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    api_error(status, err.client_message())
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    #[serde(flatten)]
    pub participant: ParticipantInfo,
    /// Scenario code or name; unknown values fall back to variant 1
    #[serde(default)]
    pub variant: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct SeatResponse {
    pub code: RoomCode,
    pub seat: PlayerIndex,
    pub token: PlayerToken,
    pub variant: Variant,
    pub scenario: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub code: RoomCode,
    pub status: RoomStatus,
    /// Both seats filled
    pub ready: bool,
    pub current_player: Option<PlayerIndex>,
    pub game_over: bool,
    pub final_scores: Option<FinalScores>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub outcome: ActionOutcome,
    /// Feedback for a rejected amount or a refused exchange
    pub message: Option<String>,
    /// Game right after this action
    pub game: GameView,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub comment: String,
}

fn parse_variant(raw: Option<&serde_json::Value>) -> Option<Variant> {
    match raw? {
        serde_json::Value::Number(n) => Some(Variant::from_code(n.as_i64().unwrap_or(1))),
        serde_json::Value::String(s) => Some(Variant::parse_lenient(s)),
        _ => None,
    }
}

/// Create a room and take seat 0.
///
/// # Request Body
///
/// Participant details plus an optional scenario:
/// ```json
/// {"name": "Ada", "age": "31", "variant": 3}
/// ```
///
/// # Response
///
/// Returns `201 Created` with the join code and the host's seat token.
///
/// # Errors
///
/// - `503 Service Unavailable`: Room limit reached
pub async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> ApiResult<(StatusCode, Json<SeatResponse>)> {
    let variant = parse_variant(request.variant.as_ref());
    let created = state
        .room_manager
        .create_room(request.participant, variant)
        .await
        .map_err(room_error)?;

    metrics::rooms_created_total(created.variant.name());
    metrics::rooms_active(state.room_manager.room_count().await);

    Ok((
        StatusCode::CREATED,
        Json(SeatResponse {
            code: created.code,
            seat: created.seat,
            token: created.token,
            variant: created.variant,
            scenario: created.variant.name().to_string(),
        }),
    ))
}

/// Join a room with its code and take seat 1.
///
/// # Errors
///
/// - `404 Not Found`: Invalid game code
/// - `409 Conflict`: Both seats already taken
pub async fn join_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(participant): Json<ParticipantInfo>,
) -> ApiResult<Json<SeatResponse>> {
    let code = RoomCode::parse(&code);
    let (seat, token) = state
        .room_manager
        .join_room(&code, participant)
        .await
        .map_err(room_error)?;
    let room = state
        .room_manager
        .get_room_state(&code, Some(token))
        .await
        .map_err(room_error)?;

    Ok(Json(SeatResponse {
        code,
        seat,
        token,
        variant: room.variant,
        scenario: room.scenario,
    }))
}

/// Poll readiness and whose turn it is. Public.
///
/// # Response
///
/// ```json
/// {"code": "K3Q9ZD", "status": "playing", "ready": true, "current_player": 1, "game_over": false, "final_scores": null}
/// ```
pub async fn game_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let code = RoomCode::parse(&code);
    let status = state
        .room_manager
        .get_status(&code)
        .await
        .map_err(room_error)?;

    Ok(Json(StatusResponse {
        code,
        ready: status.status != RoomStatus::Waiting,
        status: status.status,
        current_player: status.current_player,
        game_over: status.game_over,
        final_scores: status.final_scores,
    }))
}

/// Full room and game state, including the caller's seat.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: Token does not belong to this room
/// - `404 Not Found`: Invalid game code
pub async fn get_game(
    State(state): State<AppState>,
    Extension(token): Extension<PlayerToken>,
    Path(code): Path<String>,
) -> ApiResult<Response> {
    let code = RoomCode::parse(&code);
    let room = state
        .room_manager
        .get_room_state(&code, Some(token))
        .await
        .map_err(room_error)?;

    if room.seat.is_none() {
        return Err(api_error(StatusCode::FORBIDDEN, "You are not in this game"));
    }
    Ok(Json(room).into_response())
}

/// Submit an action for the caller's seat.
///
/// # Request Body
///
/// ```json
/// {"type": "buy_vp", "amount": 2}
/// ```
///
/// `type` is one of `harvest`, `replant`, `buy_vp`, `buy_wc`,
/// `exchange_wc`, `end_turn`. Amounts may be numbers or strings; anything
/// unparseable counts as 0.
///
/// # Errors
///
/// - `400 Bad Request`: Unknown action type
/// - `403 Forbidden`: Token does not belong to this room
/// - `409 Conflict`: Not your turn, game not started, or game over
/// - `422 Unprocessable Entity`: Amount out of bounds or exchange refused
pub async fn take_action(
    State(state): State<AppState>,
    Extension(token): Extension<PlayerToken>,
    Path(code): Path<String>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse>> {
    let code = RoomCode::parse(&code);
    let Some(action) = Action::from_raw(&request.kind, request.amount.as_ref()) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Unknown action type: {}", request.kind),
        ));
    };

    let response = state
        .room_manager
        .take_action(&code, token, action)
        .await
        .map_err(room_error)?;

    let finished = response.finished_game();
    let (outcome, game) = match response {
        RoomResponse::ActionApplied { outcome, game } => (outcome, game),
        other => {
            let status = match &other {
                RoomResponse::NotInRoom => StatusCode::FORBIDDEN,
                RoomResponse::InvalidAction(GameError::InvalidPlayerIndex(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::CONFLICT,
            };
            let message = other
                .error_message()
                .unwrap_or_else(|| "Operation failed".to_string());
            metrics::actions_total(action.kind(), "refused");
            logging::log_refused_action(code.as_str(), action.kind(), &message);
            return Err(api_error(status, message));
        }
    };

    metrics::actions_total(action.kind(), outcome.label());

    let message = match outcome {
        ActionOutcome::Rejected => Some(action.rejection_message().to_string()),
        ActionOutcome::Exchange { outcome } => Some(outcome.to_string()),
        _ => None,
    };

    if !outcome.is_applied() {
        let message = message.unwrap_or_else(|| "Invalid action.".to_string());
        logging::log_refused_action(code.as_str(), action.kind(), &message);
        return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, message));
    }

    if let Some(result) = finished {
        record_game_finished(&code, game.variant, &result);
    }

    Ok(Json(ActionResponse {
        outcome,
        message,
        game: *game,
    }))
}

fn record_game_finished(code: &RoomCode, variant: Variant, result: &FinalScores) {
    let winner = result.winner.to_string();
    metrics::games_finished_total(variant.name(), &winner);
    logging::log_game_finished(code.as_str(), variant.name(), &result.scores, &winner);
}

/// Download the round history as CSV once the game is over.
///
/// # Request Body
///
/// Optional closing comment: `{"comment": "..."}`
///
/// # Errors
///
/// - `403 Forbidden`: Token does not belong to this room
/// - `409 Conflict`: Game is not over
pub async fn export_report(
    State(state): State<AppState>,
    Extension(token): Extension<PlayerToken>,
    Path(code): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let code = RoomCode::parse(&code);
    ensure_seated(&state, &code, token).await?;

    let request: ReportRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ReportRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}")))?
    };
    let report: GameReport = state
        .room_manager
        .export_report(&code, request.comment)
        .await
        .map_err(room_error)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        GameReport::filename(&chrono::Local::now())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.to_csv(),
    )
        .into_response())
}

/// Close the room. A game still in progress is finalized first.
pub async fn close_game(
    State(state): State<AppState>,
    Extension(token): Extension<PlayerToken>,
    Path(code): Path<String>,
) -> ApiResult<StatusCode> {
    let code = RoomCode::parse(&code);
    let room = ensure_seated(&state, &code, token).await?;

    let result = state
        .room_manager
        .close_room(&code)
        .await
        .map_err(room_error)?;
    if let Some(result) = result {
        record_game_finished(&code, room.variant, &result);
    }
    metrics::rooms_active(state.room_manager.room_count().await);

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_seated(
    state: &AppState,
    code: &RoomCode,
    token: PlayerToken,
) -> ApiResult<RoomStateResponse> {
    let room = state
        .room_manager
        .get_room_state(code, Some(token))
        .await
        .map_err(room_error)?;
    match room.seat {
        Some(_) => Ok(room),
        None => Err(api_error(StatusCode::FORBIDDEN, "You are not in this game")),
    }
}
