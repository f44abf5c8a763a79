//! Room hosting - one actor per two-player game.
//!
//! This module provides:
//! - Join codes and seat tokens
//! - The per-room actor that serializes every mutation of its game
//! - A store trait for room lookup and the manager that spawns rooms

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod models;
pub mod store;

pub use actor::{RoomActor, RoomHandle};
pub use config::RoomConfig;
pub use errors::{RoomError, RoomResult};
pub use manager::{CreatedRoom, RoomManager};
pub use messages::{RoomMessage, RoomResponse, RoomStateResponse, RoomStatusResponse};
pub use models::{ParticipantInfo, PlayerToken, RoomCode, RoomStatus};
pub use store::{InMemoryRoomStore, Insertion, RoomStore};
