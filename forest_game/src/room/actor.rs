//! Room actor implementation with async message handling.
//!
//! Each room's game is owned by exactly one actor task, so submissions from
//! both clients are applied one at a time against the latest state.

use super::{
    config::RoomConfig,
    errors::{RoomError, RoomResult},
    messages::{RoomMessage, RoomResponse, RoomStateResponse, RoomStatusResponse},
    models::{ParticipantInfo, PlayerToken, RoomCode, RoomStatus},
};
use crate::{
    game::{Action, FinalScores, Game, GameError, PlayerIndex, Variant, constants::PLAYER_COUNT},
    report::GameReport,
};
use tokio::{
    sync::{mpsc, oneshot},
    time,
};

/// Room actor handle for sending messages
#[derive(Clone, Debug)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    code: RoomCode,
    serial: u64,
}

impl RoomHandle {
    /// Create a new room handle
    pub fn new(sender: mpsc::Sender<RoomMessage>, code: RoomCode, serial: u64) -> Self {
        Self {
            sender,
            code,
            serial,
        }
    }

    /// Get room code
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Creation order of the room; lower is older
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Whether the actor has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the room
    pub async fn send(&self, message: RoomMessage) -> RoomResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RoomError::Closed)
    }

    /// Send a message built around a fresh reply channel and wait for the
    /// reply.
    pub async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomMessage,
    ) -> RoomResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| RoomError::Closed)
    }
}

/// Room actor managing a single game
#[derive(Debug)]
pub struct RoomActor {
    /// Room code
    code: RoomCode,

    /// Room configuration
    config: RoomConfig,

    /// Scenario chosen by the host
    variant: Variant,

    /// Creation order, used to derive per-room dice seeds
    serial: u64,

    /// Game state machine, created when the second seat fills
    game: Option<Game>,

    /// Seat tokens and participant details, by seat index
    seats: [Option<(PlayerToken, ParticipantInfo)>; PLAYER_COUNT],

    /// Message inbox
    inbox: mpsc::Receiver<RoomMessage>,

    /// Is room closed
    is_closed: bool,
}

impl RoomActor {
    /// Create a new room actor with the host already seated
    ///
    /// # Returns
    ///
    /// * `(RoomActor, RoomHandle, PlayerToken)` - Actor, handle, and the
    ///   host's seat token
    pub fn new(
        code: RoomCode,
        config: RoomConfig,
        variant: Variant,
        serial: u64,
        host: ParticipantInfo,
    ) -> (Self, RoomHandle, PlayerToken) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity.max(1));
        let host_token = PlayerToken::generate();

        let actor = Self {
            code: code.clone(),
            config,
            variant,
            serial,
            game: None,
            seats: [Some((host_token, host)), None],
            inbox,
            is_closed: false,
        };

        (actor, RoomHandle::new(sender, code, serial), host_token)
    }

    /// Run the room actor event loop
    ///
    /// Stops on `Close`, when every handle is dropped, or after
    /// `idle_timeout` without messages. Dropping the inbox marks the handles
    /// closed so the manager can evict the room.
    pub async fn run(mut self) {
        log::info!("Room {} ({}) open", self.code, self.variant);

        loop {
            let message = match time::timeout(self.config.idle_timeout, self.inbox.recv()).await {
                Ok(Some(message)) => message,
                Ok(None) => break,
                Err(_) => {
                    log::info!(
                        "Room {} idle for {:?}, shutting down",
                        self.code,
                        self.config.idle_timeout
                    );
                    self.finish_live_game();
                    break;
                }
            };

            self.handle_message(message);
            if self.is_closed {
                break;
            }
        }

        log::info!("Room {} closed", self.code);
    }

    /// Handle a room message
    fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join { info, response } => {
                let _ = response.send(self.handle_join(info));
            }

            RoomMessage::TakeAction {
                token,
                action,
                response,
            } => {
                let _ = response.send(self.handle_action(token, action));
            }

            RoomMessage::GetState { token, response } => {
                let _ = response.send(self.state(token));
            }

            RoomMessage::GetStatus { response } => {
                let _ = response.send(self.status_response());
            }

            RoomMessage::ExportReport { comment, response } => {
                let _ = response.send(self.report(comment));
            }

            RoomMessage::Close { response } => {
                let result = self.finish_live_game();
                self.is_closed = true;
                let _ = response.send(result);
            }
        }
    }

    /// Ends a game still in progress. Returns the result only if this call
    /// finalized it.
    fn finish_live_game(&mut self) -> Option<FinalScores> {
        let game = self.game.as_mut().filter(|game| !game.is_game_over())?;
        let result = game.end_game();
        log::info!("Room {} ended mid-game, winner {}", self.code, result.winner);
        Some(result)
    }

    /// Seat the second participant and start the game
    fn handle_join(&mut self, info: ParticipantInfo) -> RoomResponse {
        let Some(free_seat) = self.seats.iter().position(Option::is_none) else {
            return RoomResponse::RoomFull;
        };

        let token = PlayerToken::generate();
        log::info!("{} joined room {} in seat {}", info.name, self.code, free_seat);
        self.seats[free_seat] = Some((token, info));

        if self.seats.iter().all(Option::is_some) && self.game.is_none() {
            self.game = Some(self.config.new_game(self.variant, self.serial));
            log::info!("Room {} game started", self.code);
        }

        RoomResponse::Joined {
            seat: free_seat,
            token,
        }
    }

    /// Handle player action
    fn handle_action(&mut self, token: PlayerToken, action: Action) -> RoomResponse {
        let Some(seat) = self.seat_of(token) else {
            return RoomResponse::NotInRoom;
        };
        let Some(game) = self.game.as_mut() else {
            return RoomResponse::GameNotStarted;
        };

        match game.apply(seat, action) {
            Ok(outcome) => RoomResponse::ActionApplied {
                outcome,
                game: Box::new(game.view()),
            },
            Err(err) => {
                if err != GameError::OutOfTurnAction {
                    log::warn!("Room {}: seat {} {} refused: {}", self.code, seat, action, err);
                }
                RoomResponse::InvalidAction(err)
            }
        }
    }

    fn seat_of(&self, token: PlayerToken) -> Option<PlayerIndex> {
        self.seats
            .iter()
            .position(|seat| matches!(seat, Some((t, _)) if *t == token))
    }

    fn status(&self) -> RoomStatus {
        match &self.game {
            None => RoomStatus::Waiting,
            Some(game) if game.is_game_over() => RoomStatus::Finished,
            Some(_) => RoomStatus::Playing,
        }
    }

    fn status_response(&self) -> RoomStatusResponse {
        RoomStatusResponse {
            status: self.status(),
            current_player: self
                .game
                .as_ref()
                .and_then(|game| game.phase().acting_player()),
            game_over: self.game.as_ref().is_some_and(Game::is_game_over),
            final_scores: self.game.as_ref().and_then(|game| game.final_scores().copied()),
        }
    }

    /// Get current room state
    fn state(&self, token: Option<PlayerToken>) -> RoomStateResponse {
        RoomStateResponse {
            code: self.code.clone(),
            status: self.status(),
            variant: self.variant,
            scenario: self.variant.name().to_string(),
            seat: token.and_then(|token| self.seat_of(token)),
            participants: self
                .seats
                .iter()
                .flatten()
                .map(|(_, info)| info.name.clone())
                .collect(),
            game: self.game.as_ref().map(Game::view),
        }
    }

    fn report(&self, comment: String) -> Option<GameReport> {
        let game = self.game.as_ref().filter(|game| game.is_game_over())?;
        let [first, second] = &self.seats;
        let participant = |seat: &Option<(PlayerToken, ParticipantInfo)>| {
            seat.as_ref().map(|(_, info)| info.clone()).unwrap_or_default()
        };

        Some(GameReport {
            participants: [participant(first), participant(second)],
            comment,
            rounds: game.round_history().to_vec(),
        })
    }
}
