//! Rule constants shared by the engine and the hosting layer.

/// Number of seats in a game.
pub const PLAYER_COUNT: usize = 2;

/// Hard cap on the shared forest.
pub const FOREST_CAPACITY: u32 = 100;

/// The game ends once this many rounds have been completed.
pub const MAX_ROUNDS: u32 = 20;

/// Trees that regrow at round end for every replanted tree.
pub const REPLANT_YIELD: u32 = 3;

/// Harvested trees spent per victory point.
pub const VICTORY_POINT_COST: u32 = 2;

/// Harvested trees spent per woodcutter.
pub const WOODCUTTER_COST: u32 = 3;

/// Victory points gained by exchanging one woodcutter.
pub const EXCHANGE_VALUE: i64 = 1;

/// Woodcutter exchanges allowed per player per round.
pub const MAX_EXCHANGES_PER_ROUND: u8 = 2;

/// Woodcutters a player starts with, and the floor an exchange can't cross.
pub const STARTING_WOODCUTTERS: u32 = 1;

/// The sustainable scenario pays its bonus every this many completed rounds.
pub const SUSTAINABLE_BONUS_INTERVAL: u32 = 5;

/// Sustainable bonus is `forest / SUSTAINABLE_BONUS_DIVISOR`.
pub const SUSTAINABLE_BONUS_DIVISOR: u32 = 10;
