//! # Forest Game
//!
//! A two-player, turn-based resource-management game about harvesting a
//! shared forest, implemented as an explicit state machine.
//!
//! Each turn a player harvests first (woodcutter dice decide the yield),
//! then may replant, buy victory points, buy woodcutters, or trade a
//! woodcutter for a point before ending the turn. After both players act the
//! forest regrows from the replant buffer. The game ends when the forest is
//! empty or after 20 rounds, and leftover trees are cashed out for points.
//!
//! ## Scenarios
//!
//! - **Overshoot & Collapse**: the base rules
//! - **Hubbert Curve**: leftover woodcutters cost points at the end
//! - **Sustainable Scenario**: every fifth round pays a bonus from the
//!   standing forest
//!
//! ## Core Modules
//!
//! - [`game`]: Rules, state machine, and harvest sampling
//! - [`room`]: Join codes, per-room actors, and the room manager
//! - [`report`]: CSV export of a finished game's round history
//!
//! ## Example
//!
//! ```
//! use forest_game::{Action, Game, ScriptedSampler, Variant};
//!
//! let mut game = Game::with_sampler(Variant::OvershootAndCollapse, ScriptedSampler::constant(2));
//! game.apply(0, Action::Harvest).unwrap();
//! assert_eq!(game.forest(), 98);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    Action, ActionOutcome, DieSampler, ExchangeOutcome, FinalScores, Game, GameError, GameEvent,
    GameView, HarvestSampler, Phase, ScriptedSampler, Variant, Winner, constants,
};

/// Room hosting over tokio actors.
pub mod room;
pub use room::{PlayerToken, RoomCode, RoomConfig, RoomError, RoomManager};

/// Round-history export.
pub mod report;
pub use report::GameReport;
