//! Room error types.

use thiserror::Error;

use super::models::RoomCode;

/// Room errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    /// No room under this code
    #[error("Room not found: {0}")]
    NotFound(RoomCode),

    /// Both seats taken
    #[error("Room {0} already has two players")]
    AlreadyFull(RoomCode),

    /// Room actor has shut down
    #[error("Room is closed")]
    Closed,

    /// Report requested before the game ended
    #[error("Game is not over or log not available")]
    GameNotOver,

    /// Could not find an unused join code
    #[error("Could not allocate a room code after {0} attempts")]
    CodeSpaceExhausted(usize),

    /// Store is at capacity
    #[error("Room limit reached: {0}")]
    CapacityReached(usize),
}

impl RoomError {
    /// Get a client-safe error message
    ///
    /// Room codes are left out so probing clients learn nothing about which
    /// codes exist.
    pub fn client_message(&self) -> String {
        match self {
            RoomError::NotFound(_) => "Invalid game code".to_string(),
            RoomError::AlreadyFull(_) => "That game already has two players".to_string(),
            RoomError::CodeSpaceExhausted(_) | RoomError::CapacityReached(_) => {
                "No rooms available, try again later".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for room operations
pub type RoomResult<T> = Result<T, RoomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_code() {
        let err = RoomError::NotFound(RoomCode::parse("ABC123"));
        assert!(err.to_string().contains("ABC123"));
        assert!(!err.client_message().contains("ABC123"));
    }

    #[test]
    fn test_client_message_passthrough() {
        assert_eq!(
            RoomError::GameNotOver.client_message(),
            "Game is not over or log not available"
        );
    }
}
