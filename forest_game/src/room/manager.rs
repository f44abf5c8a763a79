//! Room manager for spawning and addressing room actors.

use super::{
    actor::{RoomActor, RoomHandle},
    config::RoomConfig,
    errors::{RoomError, RoomResult},
    messages::{RoomMessage, RoomResponse, RoomStateResponse, RoomStatusResponse},
    models::{ParticipantInfo, PlayerToken, RoomCode, RoomStatus},
    store::{InMemoryRoomStore, Insertion, RoomStore},
};
use crate::{
    game::{Action, FinalScores, PlayerIndex, Variant},
    report::GameReport,
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Attempts at drawing an unused join code before giving up
const MAX_CODE_ATTEMPTS: usize = 64;

/// A freshly created room and the host's credentials
#[derive(Debug, Clone)]
pub struct CreatedRoom {
    pub code: RoomCode,
    pub seat: PlayerIndex,
    pub token: PlayerToken,
    pub variant: Variant,
}

/// Room manager for managing multiple room instances
pub struct RoomManager {
    /// Room handles by code
    store: Arc<dyn RoomStore>,

    /// Defaults for new rooms
    config: RoomConfig,

    /// Rooms created so far
    created: AtomicU64,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl RoomManager {
    /// Create a manager backed by an in-memory store
    pub fn new(config: RoomConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryRoomStore::new()))
    }

    /// Create a manager over an injected store
    ///
    /// # Arguments
    ///
    /// * `config` - Room defaults
    /// * `store` - Room lookup backend
    pub fn with_store(config: RoomConfig, store: Arc<dyn RoomStore>) -> Self {
        Self {
            store,
            config,
            created: AtomicU64::new(0),
        }
    }

    /// Room defaults
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Create and spawn a new room with the host in seat 0
    ///
    /// # Arguments
    ///
    /// * `host` - Creating participant's details
    /// * `variant` - Scenario, or the configured default
    ///
    /// # Returns
    ///
    /// * `RoomResult<CreatedRoom>` - Join code and host token
    pub async fn create_room(
        &self,
        host: ParticipantInfo,
        variant: Option<Variant>,
    ) -> RoomResult<CreatedRoom> {
        let variant = variant.unwrap_or(self.config.default_variant);
        let serial = self.created.fetch_add(1, Ordering::Relaxed);
        let mut evicted = false;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = RoomCode::generate(&mut rand::rng());
            let (actor, handle, token) =
                RoomActor::new(code.clone(), self.config, variant, serial, host.clone());

            match self.store.insert(handle, self.config.max_rooms).await {
                Insertion::Inserted => {
                    tokio::spawn(async move {
                        actor.run().await;
                    });
                    log::info!("Created room {} ({})", code, variant);

                    return Ok(CreatedRoom {
                        code,
                        seat: 0,
                        token,
                        variant,
                    });
                }
                Insertion::CodeTaken => continue,
                Insertion::Full if !evicted => {
                    evicted = true;
                    self.evict_stale().await;
                }
                Insertion::Full => return Err(RoomError::CapacityReached(self.config.max_rooms)),
            }
        }
        Err(RoomError::CodeSpaceExhausted(MAX_CODE_ATTEMPTS))
    }

    /// Free capacity for one more room: drop rooms whose actor stopped, then
    /// close finished games, oldest first.
    async fn evict_stale(&self) {
        let pruned = self.store.prune_closed().await;
        if pruned > 0 {
            log::info!("Pruned {} stopped rooms", pruned);
        }

        let excess = (self.store.len().await + 1).saturating_sub(self.config.max_rooms);
        if excess == 0 {
            return;
        }

        let mut finished = Vec::new();
        for handle in self.store.handles().await {
            let status = handle
                .request(|response| RoomMessage::GetStatus { response })
                .await;
            if matches!(status, Ok(status) if status.status == RoomStatus::Finished) {
                finished.push(handle);
            }
        }
        finished.sort_by_key(RoomHandle::serial);

        for handle in finished.into_iter().take(excess) {
            if self.store.remove(handle.code()).await.is_some() {
                let _ = handle
                    .request(|response| RoomMessage::Close { response })
                    .await;
                log::info!("Evicted finished room {}", handle.code());
            }
        }
    }

    /// Get a room handle
    pub async fn get_room(&self, code: &RoomCode) -> RoomResult<RoomHandle> {
        match self.store.get(code).await {
            Some(handle) if handle.is_closed() => {
                self.store.remove(code).await;
                Err(RoomError::NotFound(code.clone()))
            }
            Some(handle) => Ok(handle),
            None => Err(RoomError::NotFound(code.clone())),
        }
    }

    /// Take the free seat of a room
    ///
    /// # Returns
    ///
    /// * `RoomResult<(PlayerIndex, PlayerToken)>` - Seat and token, or
    ///   `AlreadyFull` when both seats are taken
    pub async fn join_room(
        &self,
        code: &RoomCode,
        info: ParticipantInfo,
    ) -> RoomResult<(PlayerIndex, PlayerToken)> {
        let handle = self.get_room(code).await?;
        let response = handle
            .request(|response| RoomMessage::Join { info, response })
            .await?;

        match response {
            RoomResponse::Joined { seat, token } => Ok((seat, token)),
            _ => Err(RoomError::AlreadyFull(code.clone())),
        }
    }

    /// Submit an action on behalf of a seat token
    pub async fn take_action(
        &self,
        code: &RoomCode,
        token: PlayerToken,
        action: Action,
    ) -> RoomResult<RoomResponse> {
        let handle = self.get_room(code).await?;
        handle
            .request(|response| RoomMessage::TakeAction {
                token,
                action,
                response,
            })
            .await
    }

    /// Get room state, including the caller's seat when the token matches
    pub async fn get_room_state(
        &self,
        code: &RoomCode,
        token: Option<PlayerToken>,
    ) -> RoomResult<RoomStateResponse> {
        let handle = self.get_room(code).await?;
        handle
            .request(|response| RoomMessage::GetState { token, response })
            .await
    }

    /// Get the polling status of a room
    pub async fn get_status(&self, code: &RoomCode) -> RoomResult<RoomStatusResponse> {
        let handle = self.get_room(code).await?;
        handle
            .request(|response| RoomMessage::GetStatus { response })
            .await
    }

    /// Build the round-history report of a finished game
    pub async fn export_report(&self, code: &RoomCode, comment: String) -> RoomResult<GameReport> {
        let handle = self.get_room(code).await?;
        handle
            .request(|response| RoomMessage::ExportReport { comment, response })
            .await?
            .ok_or(RoomError::GameNotOver)
    }

    /// Close a room
    ///
    /// A game still in progress is finalized before the actor stops.
    ///
    /// # Returns
    ///
    /// * `RoomResult<Option<FinalScores>>` - The result if closing ended a
    ///   live game
    pub async fn close_room(&self, code: &RoomCode) -> RoomResult<Option<FinalScores>> {
        let handle = self
            .store
            .remove(code)
            .await
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        // Actor may already be gone; the room is unreachable either way.
        let result = match handle
            .request(|response| RoomMessage::Close { response })
            .await
        {
            Ok(result) => result,
            Err(err) => {
                log::warn!("Room {} did not acknowledge close: {}", code, err);
                None
            }
        };

        log::info!("Closed room {}", code);
        Ok(result)
    }

    /// Number of open rooms
    pub async fn room_count(&self) -> usize {
        self.store.prune_closed().await;
        self.store.len().await
    }
}
