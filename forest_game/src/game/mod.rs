//! Forest game engine - rules, state machine, and harvest sampling.
//!
//! This module provides:
//! - The `Game` aggregate and its turn/round transitions
//! - Player inventories, scenario variants, and round snapshots
//! - Injectable woodcutter dice

pub mod constants;
pub mod entities;
pub mod harvest;
pub mod state_machine;

pub use entities::{
    Action, ActionOutcome, ExchangeOutcome, FinalScores, GameOverCause, Phase, PlayerIndex,
    PlayerRoundStats, PlayerState, RoundSnapshot, Trees, Variant, VictoryPoints, Winner,
    parse_amount,
};
pub use harvest::{DieSampler, HarvestSampler, ScriptedSampler};
pub use state_machine::{Game, GameError, GameEvent, GameView};
