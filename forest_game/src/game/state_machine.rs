//! Forest game state machine.
//!
//! A turn is `AwaitingHarvest -> PostHarvest -> (any post-harvest actions) ->
//! end turn`. Two turns make a round. Finalization runs exactly once, on the
//! transition into game over, whichever path triggers it.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{
    constants::{
        EXCHANGE_VALUE, FOREST_CAPACITY, MAX_ROUNDS, PLAYER_COUNT, REPLANT_YIELD,
        SUSTAINABLE_BONUS_DIVISOR, SUSTAINABLE_BONUS_INTERVAL, VICTORY_POINT_COST,
        WOODCUTTER_COST,
    },
    entities::{
        Action, ActionOutcome, ExchangeOutcome, FinalScores, GameOverCause, Phase, PlayerIndex,
        PlayerState, RoundSnapshot, Trees, Variant, VictoryPoints, regrowth_for, seat_label,
    },
    harvest::{DieSampler, HarvestSampler},
};

/// Refusals that indicate a caller bug rather than a player probing limits.
///
/// State is never modified when one of these is returned.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("game is over")]
    GameOver,
    #[error("harvest before taking any other action")]
    NotHarvested,
    #[error("already harvested this turn")]
    AlreadyHarvested,
    #[error("not your turn")]
    OutOfTurnAction,
    #[error("invalid game state: player index {0} out of bounds")]
    InvalidPlayerIndex(usize),
}

/// Events appended to the game log as actions apply.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    Harvested {
        player: PlayerIndex,
        amount: Trees,
        total: Trees,
    },
    Replanted {
        player: PlayerIndex,
        amount: Trees,
    },
    BoughtVictoryPoints {
        player: PlayerIndex,
        amount: u32,
    },
    BoughtWoodcutters {
        player: PlayerIndex,
        amount: u32,
    },
    ExchangedWoodcutter {
        player: PlayerIndex,
        exchanges_this_round: u8,
    },
    RoundEnded(u32),
    ForestRegrown(Trees),
    SustainableBonus(VictoryPoints),
    GameOver(GameOverCause),
    FinalScores([VictoryPoints; PLAYER_COUNT]),
    HubbertPenaltyApplied,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Harvested {
                player,
                amount,
                total,
            } => format!(
                "{} harvested {amount} trees (Total harvested: {total})",
                seat_label(*player)
            ),
            Self::Replanted { amount, .. } => format!(
                "Scheduled to replant {amount} tree(s) (+{} trees next round)",
                regrowth_for(*amount)
            ),
            Self::BoughtVictoryPoints { amount, .. } => {
                format!("Bought {amount} Victory Point(s)")
            }
            Self::BoughtWoodcutters { amount, .. } => format!("Bought {amount} Woodcutter(s)"),
            Self::ExchangedWoodcutter {
                exchanges_this_round,
                ..
            } => format!(
                "Exchanged 1 Woodcutter for {EXCHANGE_VALUE} VP (Exchanges this round: {exchanges_this_round})"
            ),
            Self::RoundEnded(round) => format!("=== End of Round {round} ==="),
            Self::ForestRegrown(forest) => format!("Forest now has {forest} trees"),
            Self::SustainableBonus(bonus) => {
                format!("Sustainable bonus: each player gains {bonus} VP")
            }
            Self::GameOver(GameOverCause::ForestDepleted) => {
                "Forest depleted! Game over.".to_string()
            }
            Self::GameOver(GameOverCause::FinalRound) => {
                "Game reached final round or forest is depleted. Game over.".to_string()
            }
            Self::GameOver(GameOverCause::Concluded) => "Game ended early. Game over.".to_string(),
            Self::FinalScores([first, second]) => {
                format!("Final Scores -> Player 1: {first}, Player 2: {second}")
            }
            Self::HubbertPenaltyApplied => {
                "Hubbert variant: woodcutter penalty applied to final scores.".to_string()
            }
        };
        write!(f, "{repr}")
    }
}

/// Read-only snapshot of a game for rendering.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameView {
    pub forest: Trees,
    pub replant_buffer: Trees,
    pub current_round: u32,
    pub current_player: PlayerIndex,
    pub variant: Variant,
    pub scenario: String,
    pub game_over: bool,
    pub phase: Phase,
    pub players: [PlayerState; PLAYER_COUNT],
    pub max_replant: Trees,
    pub max_victory_points: u32,
    pub max_woodcutters: u32,
    pub round_history: Vec<RoundSnapshot>,
    pub event_log: Vec<String>,
    pub final_scores: Option<FinalScores>,
}

/// The authoritative two-player game.
#[derive(Debug)]
pub struct Game {
    forest: Trees,
    /// Trees pending regrowth, applied at round end.
    replant_buffer: Trees,
    current_round: u32,
    current_player: PlayerIndex,
    variant: Variant,
    game_over: bool,
    players: [PlayerState; PLAYER_COUNT],
    round_history: Vec<RoundSnapshot>,
    events: Vec<GameEvent>,
    /// Set exactly once, when finalization runs.
    final_scores: Option<FinalScores>,
    sampler: Box<dyn HarvestSampler>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

impl Game {
    /// New game with real dice.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self::with_sampler(variant, DieSampler::from_entropy())
    }

    #[must_use]
    pub fn with_sampler(variant: Variant, sampler: impl HarvestSampler + 'static) -> Self {
        Self {
            forest: FOREST_CAPACITY,
            replant_buffer: 0,
            current_round: 0,
            current_player: 0,
            variant,
            game_over: false,
            players: [PlayerState::new(), PlayerState::new()],
            round_history: Vec::with_capacity(MAX_ROUNDS as usize),
            events: Vec::new(),
            final_scores: None,
            sampler: Box::new(sampler),
        }
    }

    #[must_use]
    pub const fn forest(&self) -> Trees {
        self.forest
    }

    #[must_use]
    pub const fn replant_buffer(&self) -> Trees {
        self.replant_buffer
    }

    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.current_round
    }

    #[must_use]
    pub const fn current_player(&self) -> PlayerIndex {
        self.current_player
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub const fn players(&self) -> &[PlayerState; PLAYER_COUNT] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, player: PlayerIndex) -> Option<&PlayerState> {
        self.players.get(player)
    }

    #[must_use]
    pub fn round_history(&self) -> &[RoundSnapshot] {
        &self.round_history
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// The event log rendered as display lines.
    #[must_use]
    pub fn event_log(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub const fn final_scores(&self) -> Option<&FinalScores> {
        self.final_scores.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.final_scores {
            Some(result) => Phase::GameOver { result },
            None if self.players[self.current_player].has_harvested_this_turn => {
                Phase::PostHarvest {
                    player: self.current_player,
                }
            }
            None => Phase::AwaitingHarvest {
                player: self.current_player,
            },
        }
    }

    /// Largest replant the current player could make right now.
    #[must_use]
    pub fn max_replant(&self) -> Trees {
        let player = &self.players[self.current_player];
        if self.game_over || !player.has_harvested_this_turn {
            return 0;
        }
        self.replant_room().min(player.harvested_trees)
    }

    #[must_use]
    pub fn max_victory_points(&self) -> u32 {
        self.post_harvest_player()
            .map_or(0, PlayerState::max_victory_points)
    }

    #[must_use]
    pub fn max_woodcutters(&self) -> u32 {
        self.post_harvest_player()
            .map_or(0, PlayerState::max_woodcutters)
    }

    #[must_use]
    pub fn view(&self) -> GameView {
        GameView {
            forest: self.forest,
            replant_buffer: self.replant_buffer,
            current_round: self.current_round,
            current_player: self.current_player,
            variant: self.variant,
            scenario: self.variant.name().to_string(),
            game_over: self.game_over,
            phase: self.phase(),
            players: self.players.clone(),
            max_replant: self.max_replant(),
            max_victory_points: self.max_victory_points(),
            max_woodcutters: self.max_woodcutters(),
            round_history: self.round_history.clone(),
            event_log: self.event_log(),
            final_scores: self.final_scores,
        }
    }

    /// Applies `action` on behalf of `player`, re-checking that it's their
    /// turn.
    pub fn apply(
        &mut self,
        player: PlayerIndex,
        action: Action,
    ) -> Result<ActionOutcome, GameError> {
        if player >= PLAYER_COUNT {
            return Err(GameError::InvalidPlayerIndex(player));
        }
        if self.game_over {
            return Err(GameError::GameOver);
        }
        if player != self.current_player {
            return Err(GameError::OutOfTurnAction);
        }

        let outcome = match action {
            Action::Harvest => ActionOutcome::Harvested {
                amount: self.harvest()?,
            },
            Action::Replant(amount) => accepted(self.replant(amount)?),
            Action::BuyVictoryPoints(amount) => accepted(self.buy_victory_points(amount)?),
            Action::BuyWoodcutters(amount) => accepted(self.buy_woodcutters(amount)?),
            Action::ExchangeWoodcutter => ActionOutcome::Exchange {
                outcome: self.exchange_woodcutter()?,
            },
            Action::EndTurn => ActionOutcome::TurnEnded {
                round_completed: self.end_turn()?,
            },
        };
        debug!("{} {action}: {}", seat_label(player), outcome.label());
        Ok(outcome)
    }

    /// Rolls for every woodcutter and takes the (clamped) total from the
    /// forest. Taking the last tree ends the game on the spot.
    pub fn harvest(&mut self) -> Result<Trees, GameError> {
        let player = self.active_player()?;
        if player.has_harvested_this_turn {
            return Err(GameError::AlreadyHarvested);
        }

        let woodcutters = player.woodcutters;
        let rolled: Trees = (0..woodcutters).map(|_| self.sampler.sample()).sum();
        let amount = rolled.min(self.forest);

        self.forest -= amount;
        let player = &mut self.players[self.current_player];
        player.harvested_trees += amount;
        player.has_harvested_this_turn = true;
        let total = player.harvested_trees;
        self.events.push(GameEvent::Harvested {
            player: self.current_player,
            amount,
            total,
        });

        if self.forest == 0 {
            self.game_over = true;
            self.check_and_finalize(GameOverCause::ForestDepleted);
        }
        Ok(amount)
    }

    /// Schedules `amount` harvested trees for regrowth at round end.
    ///
    /// Returns `Ok(false)` when `amount` exceeds what the player holds or
    /// what the forest has room for.
    pub fn replant(&mut self, amount: Trees) -> Result<bool, GameError> {
        self.post_harvest_check()?;
        if amount > self.max_replant() {
            return Ok(false);
        }

        let player = &mut self.players[self.current_player];
        player.harvested_trees -= amount;
        player.replanted_this_round += amount;
        self.replant_buffer += amount * REPLANT_YIELD;
        self.events.push(GameEvent::Replanted {
            player: self.current_player,
            amount,
        });
        Ok(true)
    }

    /// Converts harvested trees to victory points at 2:1.
    pub fn buy_victory_points(&mut self, amount: u32) -> Result<bool, GameError> {
        let player = self.post_harvest_check()?;
        if amount > player.max_victory_points() {
            return Ok(false);
        }

        let player = &mut self.players[self.current_player];
        player.award(VictoryPoints::from(amount));
        player.harvested_trees -= amount * VICTORY_POINT_COST;
        self.events.push(GameEvent::BoughtVictoryPoints {
            player: self.current_player,
            amount,
        });
        Ok(true)
    }

    /// Buys woodcutters at 3 harvested trees each.
    pub fn buy_woodcutters(&mut self, amount: u32) -> Result<bool, GameError> {
        let player = self.post_harvest_check()?;
        if amount > player.max_woodcutters() {
            return Ok(false);
        }

        let player = &mut self.players[self.current_player];
        player.woodcutters += amount;
        player.harvested_trees -= amount * WOODCUTTER_COST;
        self.events.push(GameEvent::BoughtWoodcutters {
            player: self.current_player,
            amount,
        });
        Ok(true)
    }

    /// Trades one woodcutter for one victory point, at most twice a round and
    /// never below one woodcutter.
    pub fn exchange_woodcutter(&mut self) -> Result<ExchangeOutcome, GameError> {
        let outcome = self.post_harvest_check()?.exchange_check();
        if !outcome.is_exchanged() {
            return Ok(outcome);
        }

        let player = &mut self.players[self.current_player];
        player.woodcutters -= 1;
        player.award(EXCHANGE_VALUE);
        player.exchanges_this_round += 1;
        let exchanges_this_round = player.exchanges_this_round;
        self.events.push(GameEvent::ExchangedWoodcutter {
            player: self.current_player,
            exchanges_this_round,
        });
        Ok(outcome)
    }

    /// Passes the turn. Returns whether this completed a round.
    pub fn end_turn(&mut self) -> Result<bool, GameError> {
        self.post_harvest_check()?;

        self.players[self.current_player].has_harvested_this_turn = false;
        self.current_player = 1 - self.current_player;
        if self.current_player != 0 {
            return Ok(false);
        }

        self.current_round += 1;
        self.end_round();
        if self.game_over {
            self.check_and_finalize(GameOverCause::FinalRound);
        }
        Ok(true)
    }

    /// Finalizes the game and returns the result.
    ///
    /// Ends a live game early. Once finalized, further calls return the same
    /// result and change nothing.
    pub fn end_game(&mut self) -> FinalScores {
        if !self.game_over {
            self.game_over = true;
            self.check_and_finalize(GameOverCause::Concluded);
        }
        match self.final_scores {
            Some(result) => result,
            None => self.check_and_finalize(GameOverCause::Concluded),
        }
    }

    fn end_round(&mut self) {
        self.forest = (self.forest + self.replant_buffer).min(FOREST_CAPACITY);
        self.round_history.push(RoundSnapshot {
            round: self.current_round,
            trees: self.forest,
            players: [self.players[0].round_stats(), self.players[1].round_stats()],
        });
        self.events.push(GameEvent::RoundEnded(self.current_round));
        self.events.push(GameEvent::ForestRegrown(self.forest));

        self.replant_buffer = 0;
        for player in &mut self.players {
            player.reset_round();
        }

        if self.variant == Variant::Sustainable
            && self.current_round % SUSTAINABLE_BONUS_INTERVAL == 0
        {
            let bonus = VictoryPoints::from(self.forest / SUSTAINABLE_BONUS_DIVISOR);
            for player in &mut self.players {
                player.award(bonus);
            }
            self.events.push(GameEvent::SustainableBonus(bonus));
        }

        debug!(
            "round {} ended with {} trees",
            self.current_round, self.forest
        );
        if self.forest == 0 || self.current_round >= MAX_ROUNDS {
            self.game_over = true;
        }
    }

    /// Applies end-of-game scoring once. Must only run after `game_over` is
    /// set.
    fn check_and_finalize(&mut self, cause: GameOverCause) -> FinalScores {
        if let Some(result) = self.final_scores {
            return result;
        }

        for player in &mut self.players {
            player.cash_out();
        }
        if self.variant == Variant::HubbertCurve {
            for player in &mut self.players {
                player.victory_points -= player.hubbert_penalty();
            }
        }

        let result = FinalScores::new([self.players[0].victory_points, self.players[1].victory_points]);
        self.final_scores = Some(result);
        self.events.push(GameEvent::GameOver(cause));
        self.events.push(GameEvent::FinalScores(result.scores));
        if self.variant == Variant::HubbertCurve {
            self.events.push(GameEvent::HubbertPenaltyApplied);
        }
        info!(
            "game over ({cause:?}) after round {}: {:?}, winner {}",
            self.current_round, result.scores, result.winner
        );
        result
    }

    /// Room left in the forest for scheduled regrowth, in replantable trees.
    fn replant_room(&self) -> Trees {
        FOREST_CAPACITY
            .saturating_sub(self.forest)
            .saturating_sub(self.replant_buffer)
            / REPLANT_YIELD
    }

    fn active_player(&self) -> Result<&PlayerState, GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        Ok(&self.players[self.current_player])
    }

    fn post_harvest_check(&self) -> Result<&PlayerState, GameError> {
        let player = self.active_player()?;
        if !player.has_harvested_this_turn {
            return Err(GameError::NotHarvested);
        }
        Ok(player)
    }

    fn post_harvest_player(&self) -> Option<&PlayerState> {
        self.post_harvest_check().ok()
    }
}

const fn accepted(applied: bool) -> ActionOutcome {
    if applied {
        ActionOutcome::Accepted
    } else {
        ActionOutcome::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::harvest::ScriptedSampler;

    fn game_with(variant: Variant, yields: impl IntoIterator<Item = Trees>) -> Game {
        Game::with_sampler(variant, ScriptedSampler::new(yields))
    }

    #[test]
    fn test_new_game_defaults() {
        let game = Game::default();
        assert_eq!(game.forest(), 100);
        assert_eq!(game.current_round(), 0);
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.variant(), Variant::OvershootAndCollapse);
        assert!(!game.is_game_over());
        assert_eq!(game.phase(), Phase::AwaitingHarvest { player: 0 });
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_harvest_sums_yields() {
        let mut game = game_with(Variant::default(), [2]);
        assert_eq!(game.harvest(), Ok(2));
        assert_eq!(game.forest(), 98);
        assert_eq!(game.players()[0].harvested_trees, 2);
        assert_eq!(game.phase(), Phase::PostHarvest { player: 0 });
        assert_eq!(
            game.event_log(),
            vec!["Player 1 harvested 2 trees (Total harvested: 2)".to_string()]
        );
    }

    #[test]
    fn test_harvest_twice_is_refused() {
        let mut game = game_with(Variant::default(), [1, 2]);
        game.harvest().unwrap();
        assert_eq!(game.harvest(), Err(GameError::AlreadyHarvested));
        assert_eq!(game.forest(), 99);
        assert_eq!(game.events().len(), 1);
    }

    #[test]
    fn test_post_harvest_actions_require_harvest() {
        let mut game = Game::default();
        assert_eq!(game.replant(0), Err(GameError::NotHarvested));
        assert_eq!(game.buy_victory_points(0), Err(GameError::NotHarvested));
        assert_eq!(game.buy_woodcutters(0), Err(GameError::NotHarvested));
        assert_eq!(game.exchange_woodcutter(), Err(GameError::NotHarvested));
        assert_eq!(game.end_turn(), Err(GameError::NotHarvested));
        assert_eq!(game.max_replant(), 0);
    }

    #[test]
    fn test_replant_bounded_by_forest_room() {
        let mut game = game_with(Variant::default(), [2, 2, 2]);
        game.players[0].woodcutters = 3;
        game.harvest().unwrap();
        assert_eq!(game.forest(), 94);
        // (100 - 94 - 0) / 3 = 2
        assert_eq!(game.max_replant(), 2);
        assert_eq!(game.replant(3), Ok(false));
        assert_eq!(game.players()[0].harvested_trees, 6);
        assert_eq!(game.replant(2), Ok(true));
        assert_eq!(game.replant_buffer(), 6);
        assert_eq!(game.players()[0].harvested_trees, 4);
        assert_eq!(game.players()[0].replanted_this_round, 2);
        assert_eq!(game.max_replant(), 0);
    }

    #[test]
    fn test_buy_victory_points() {
        let mut game = game_with(Variant::default(), [2, 2]);
        game.players[0].woodcutters = 2;
        game.harvest().unwrap();
        assert_eq!(game.buy_victory_points(3), Ok(false));
        assert_eq!(game.buy_victory_points(2), Ok(true));
        let player = &game.players()[0];
        assert_eq!(player.victory_points, 2);
        assert_eq!(player.total_victory_points_gained, 2);
        assert_eq!(player.harvested_trees, 0);
    }

    #[test]
    fn test_buy_woodcutters() {
        let mut game = game_with(Variant::default(), [2, 2]);
        game.players[0].woodcutters = 2;
        game.harvest().unwrap();
        assert_eq!(game.buy_woodcutters(2), Ok(false));
        assert_eq!(game.buy_woodcutters(1), Ok(true));
        assert_eq!(game.players()[0].woodcutters, 3);
        assert_eq!(game.players()[0].harvested_trees, 1);
    }

    #[test]
    fn test_zero_amounts_are_accepted() {
        let mut game = game_with(Variant::default(), [0]);
        game.harvest().unwrap();
        assert_eq!(game.replant(0), Ok(true));
        assert_eq!(game.buy_victory_points(0), Ok(true));
        assert_eq!(game.buy_woodcutters(0), Ok(true));
    }

    #[test]
    fn test_post_harvest_log_lines() {
        let mut game = game_with(Variant::default(), [2, 2, 2]);
        game.players[0].woodcutters = 3;
        game.harvest().unwrap();
        assert_eq!(game.replant(1), Ok(true));
        assert_eq!(game.buy_victory_points(1), Ok(true));
        assert_eq!(game.buy_woodcutters(1), Ok(true));
        assert_eq!(game.exchange_woodcutter(), Ok(ExchangeOutcome::Exchanged));

        assert_eq!(
            game.event_log(),
            vec![
                "Player 1 harvested 6 trees (Total harvested: 6)".to_string(),
                "Scheduled to replant 1 tree(s) (+3 trees next round)".to_string(),
                "Bought 1 Victory Point(s)".to_string(),
                "Bought 1 Woodcutter(s)".to_string(),
                "Exchanged 1 Woodcutter for 1 VP (Exchanges this round: 1)".to_string(),
            ]
        );
    }

    #[test]
    fn test_exchange_limit_and_floor() {
        let mut game = game_with(Variant::default(), []);
        game.players[0].woodcutters = 4;
        game.harvest().unwrap();
        assert_eq!(game.exchange_woodcutter(), Ok(ExchangeOutcome::Exchanged));
        assert_eq!(game.exchange_woodcutter(), Ok(ExchangeOutcome::Exchanged));
        assert_eq!(game.exchange_woodcutter(), Ok(ExchangeOutcome::Limit));
        let player = &game.players()[0];
        assert_eq!(player.woodcutters, 2);
        assert_eq!(player.victory_points, 2);
        assert_eq!(player.exchanges_this_round, 2);
    }

    #[test]
    fn test_exchange_keeps_one_woodcutter() {
        let mut game = game_with(Variant::default(), []);
        game.harvest().unwrap();
        assert_eq!(game.exchange_woodcutter(), Ok(ExchangeOutcome::MinCapacity));
        assert_eq!(game.players()[0].woodcutters, 1);
        assert_eq!(game.players()[0].victory_points, 0);
    }

    #[test]
    fn test_end_turn_alternates_and_completes_round() {
        let mut game = game_with(Variant::default(), []);
        game.harvest().unwrap();
        assert_eq!(game.end_turn(), Ok(false));
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.current_round(), 0);
        assert!(!game.players()[0].has_harvested_this_turn);

        game.harvest().unwrap();
        assert_eq!(game.end_turn(), Ok(true));
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.current_round(), 1);
        assert_eq!(game.round_history().len(), 1);
        assert_eq!(game.round_history()[0].round, 1);
    }

    #[test]
    fn test_round_end_applies_regrowth_and_resets_counters() {
        let mut game = game_with(Variant::default(), [2, 2, 2]);
        game.players[0].woodcutters = 3;
        game.harvest().unwrap();
        game.replant(2).unwrap();
        game.end_turn().unwrap();
        game.harvest().unwrap();
        game.end_turn().unwrap();

        assert_eq!(game.forest(), 100);
        assert_eq!(game.replant_buffer(), 0);
        assert_eq!(game.players()[0].replanted_this_round, 0);
        let snapshot = &game.round_history()[0];
        assert_eq!(snapshot.trees, 100);
        assert_eq!(snapshot.players[0].replanted, 2);
        assert_eq!(snapshot.players[0].harvested, 4);
    }

    #[test]
    fn test_apply_rejects_wrong_player() {
        let mut game = game_with(Variant::default(), []);
        assert_eq!(
            game.apply(1, Action::Harvest),
            Err(GameError::OutOfTurnAction)
        );
        assert_eq!(
            game.apply(2, Action::Harvest),
            Err(GameError::InvalidPlayerIndex(2))
        );
        assert_eq!(
            game.apply(0, Action::Harvest),
            Ok(ActionOutcome::Harvested { amount: 0 })
        );
    }

    #[test]
    fn test_apply_reports_rejection() {
        let mut game = game_with(Variant::default(), [1]);
        game.apply(0, Action::Harvest).unwrap();
        assert_eq!(
            game.apply(0, Action::BuyVictoryPoints(1)),
            Ok(ActionOutcome::Rejected)
        );
        assert_eq!(
            game.apply(0, Action::ExchangeWoodcutter),
            Ok(ActionOutcome::Exchange {
                outcome: ExchangeOutcome::MinCapacity
            })
        );
        assert_eq!(game.events().len(), 1);
    }

    #[test]
    fn test_depleting_harvest_ends_game_immediately() {
        let mut game = game_with(Variant::default(), [2, 2]);
        game.forest = 3;
        game.players[0].woodcutters = 2;
        assert_eq!(game.harvest(), Ok(3));
        assert_eq!(game.forest(), 0);
        assert!(game.is_game_over());
        // 3 harvested -> 1 VP at 2:1, leftover tree discarded
        let result = game.final_scores().copied().unwrap();
        assert_eq!(result.scores, [1, 0]);
        assert_eq!(game.players()[0].harvested_trees, 0);
        assert_eq!(game.end_turn(), Err(GameError::GameOver));
        assert_eq!(
            game.event_log().last().map(String::as_str),
            Some("Final Scores -> Player 1: 1, Player 2: 0")
        );
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let mut game = game_with(Variant::HubbertCurve, []);
        game.players[0].woodcutters = 3;
        game.players[0].harvested_trees = 5;
        let first = game.end_game();
        let log_len = game.events().len();
        let second = game.end_game();
        assert_eq!(first, second);
        assert_eq!(first.scores, [0, 0]);
        assert_eq!(game.events().len(), log_len);
        assert_eq!(game.players()[0].total_victory_points_gained, 2);
    }
}
