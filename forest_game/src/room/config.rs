//! Room configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::{DieSampler, Game, Variant};

/// Room configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Scenario used when a create request doesn't pick one
    pub default_variant: Variant,

    /// Bounded inbox size of each room actor
    pub inbox_capacity: usize,

    /// Maximum rooms held by the store at once
    pub max_rooms: usize,

    /// Fixed dice seed. Each room offsets it by its creation order so rooms
    /// don't share rolls.
    pub dice_seed: Option<u64>,

    /// A room with no messages for this long shuts down and is evicted
    pub idle_timeout: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            default_variant: Variant::OvershootAndCollapse,
            inbox_capacity: 100,
            max_rooms: 1_000,
            dice_seed: None,
            idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl RoomConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be greater than 0".to_string());
        }

        if self.max_rooms == 0 {
            return Err("Max rooms must be greater than 0".to_string());
        }

        if self.idle_timeout.is_zero() {
            return Err("Idle timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Builds the game for a room once both seats are filled.
    pub fn new_game(&self, variant: Variant, room_serial: u64) -> Game {
        match self.dice_seed {
            Some(seed) => Game::with_sampler(
                variant,
                DieSampler::seeded(seed.wrapping_add(room_serial)),
            ),
            None => Game::new(variant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RoomConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let config = RoomConfig {
            inbox_capacity: 0,
            ..RoomConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RoomConfig {
            max_rooms: 0,
            ..RoomConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RoomConfig {
            idle_timeout: Duration::ZERO,
            ..RoomConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_new_game_uses_variant() {
        let config = RoomConfig {
            dice_seed: Some(9),
            ..RoomConfig::default()
        };
        let game = config.new_game(Variant::Sustainable, 1);
        assert_eq!(game.variant(), Variant::Sustainable);
        assert_eq!(game.forest(), 100);
    }
}
