//! Room actor message types.

use serde::Serialize;
use tokio::sync::oneshot;

use super::models::{ParticipantInfo, PlayerToken, RoomCode, RoomStatus};
use crate::{
    game::{Action, ActionOutcome, FinalScores, GameError, GameView, PlayerIndex, Variant},
    report::GameReport,
};

/// Messages that can be sent to a RoomActor
#[derive(Debug)]
pub enum RoomMessage {
    /// Take the free seat and start the game
    Join {
        info: ParticipantInfo,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Player action on behalf of the token's seat
    TakeAction {
        token: PlayerToken,
        action: Action,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Full room state, with the caller's seat if the token matches
    GetState {
        token: Option<PlayerToken>,
        response: oneshot::Sender<RoomStateResponse>,
    },

    /// Lightweight readiness/turn polling
    GetStatus {
        response: oneshot::Sender<RoomStatusResponse>,
    },

    /// Round history export (game over only)
    ExportReport {
        comment: String,
        response: oneshot::Sender<Option<GameReport>>,
    },

    /// Finalize any running game and stop the actor. Replies with the result
    /// when closing ended a live game.
    Close {
        response: oneshot::Sender<Option<FinalScores>>,
    },
}

/// Response from room operations
#[derive(Debug, Clone, PartialEq)]
pub enum RoomResponse {
    /// Seat assigned
    Joined { seat: PlayerIndex, token: PlayerToken },

    /// Action went through the state machine. May still be a rejection.
    ActionApplied {
        outcome: ActionOutcome,
        /// Game right after the action, read in the same actor turn
        game: Box<GameView>,
    },

    /// Both seats taken
    RoomFull,

    /// Token doesn't belong to this room
    NotInRoom,

    /// Second participant hasn't joined yet
    GameNotStarted,

    /// Engine refused the action
    InvalidAction(GameError),
}

impl RoomResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        match self {
            RoomResponse::Joined { .. } => true,
            RoomResponse::ActionApplied { outcome, .. } => outcome.is_applied(),
            _ => false,
        }
    }

    /// User-facing message for anything that didn't apply
    pub fn error_message(&self) -> Option<String> {
        match self {
            RoomResponse::ActionApplied {
                outcome: ActionOutcome::Rejected,
                ..
            } => Some("Invalid amount".to_string()),
            RoomResponse::ActionApplied {
                outcome: ActionOutcome::Exchange { outcome },
                ..
            } if !outcome.is_exchanged() => Some(outcome.to_string()),
            RoomResponse::RoomFull => Some("This game already has two players".to_string()),
            RoomResponse::NotInRoom => Some("You are not in this game".to_string()),
            RoomResponse::GameNotStarted => Some("Game is not ready yet".to_string()),
            RoomResponse::InvalidAction(GameError::OutOfTurnAction) => {
                Some("Not your turn".to_string())
            }
            RoomResponse::InvalidAction(GameError::NotHarvested) => {
                Some("Action not allowed before harvesting".to_string())
            }
            RoomResponse::InvalidAction(err) => Some(format!("Action not allowed: {err}")),
            _ => None,
        }
    }

    /// Final result when this response is the action that ended the game.
    ///
    /// Actions after game over are refused, so exactly one applied action
    /// per game carries final scores.
    pub fn finished_game(&self) -> Option<FinalScores> {
        match self {
            RoomResponse::ActionApplied { game, .. } => game.final_scores,
            _ => None,
        }
    }
}

/// Room state response
#[derive(Debug, Clone, Serialize)]
pub struct RoomStateResponse {
    pub code: RoomCode,
    pub status: RoomStatus,
    pub variant: Variant,
    pub scenario: String,
    /// Seat of the requesting token, if it belongs to this room
    pub seat: Option<PlayerIndex>,
    pub participants: Vec<String>,
    pub game: Option<GameView>,
}

/// Room status response
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoomStatusResponse {
    pub status: RoomStatus,
    pub current_player: Option<PlayerIndex>,
    pub game_over: bool,
    pub final_scores: Option<FinalScores>,
}
