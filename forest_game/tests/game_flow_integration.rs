//! Integration tests for full game flows
//!
//! These tests drive complete games through the public `apply` interface
//! with scripted dice and check scoring at the end of each scenario.

use forest_game::{
    Action, ActionOutcome, Game, GameError, GameEvent, ScriptedSampler, Variant, Winner,
    game::{GameOverCause, Phase},
};

/// Harvest then end the turn for whoever is to act.
fn harvest_and_pass(game: &mut Game) {
    let player = game.current_player();
    game.apply(player, Action::Harvest).unwrap();
    if !game.is_game_over() {
        game.apply(player, Action::EndTurn).unwrap();
    }
}

fn play_out(game: &mut Game) {
    // 20 rounds of 2 turns is the most a game can last
    for _ in 0..40 {
        if game.is_game_over() {
            break;
        }
        harvest_and_pass(game);
    }
    assert!(game.is_game_over());
}

fn game_over_events(game: &Game) -> usize {
    game.events()
        .iter()
        .filter(|event| matches!(event, GameEvent::GameOver(_)))
        .count()
}

#[test]
fn test_empty_harvests_run_to_final_round_draw() {
    let mut game = Game::with_sampler(Variant::OvershootAndCollapse, ScriptedSampler::constant(0));
    play_out(&mut game);

    assert_eq!(game.current_round(), 20);
    assert_eq!(game.forest(), 100);
    assert_eq!(game.round_history().len(), 20);

    let result = game.final_scores().copied().unwrap();
    assert_eq!(result.scores, [0, 0]);
    assert_eq!(result.winner, Winner::Draw);
    assert!(
        game.events()
            .contains(&GameEvent::GameOver(GameOverCause::FinalRound))
    );
    assert_eq!(
        game.event_log().last().map(String::as_str),
        Some("Final Scores -> Player 1: 0, Player 2: 0")
    );
}

#[test]
fn test_replant_regrows_at_round_end() {
    let mut game = Game::with_sampler(Variant::OvershootAndCollapse, ScriptedSampler::constant(2));
    harvest_and_pass(&mut game);
    harvest_and_pass(&mut game);
    assert_eq!(game.forest(), 96);

    // Round 2: player 1 replants into the only free space
    game.apply(0, Action::Harvest).unwrap();
    assert_eq!(game.max_replant(), 2);
    assert_eq!(game.apply(0, Action::Replant(2)), Ok(ActionOutcome::Accepted));
    assert_eq!(game.replant_buffer(), 6);
    game.apply(0, Action::EndTurn).unwrap();

    // Forest 92 with 6 already scheduled leaves no room
    game.apply(1, Action::Harvest).unwrap();
    assert_eq!(game.max_replant(), 0);
    assert_eq!(game.apply(1, Action::Replant(1)), Ok(ActionOutcome::Rejected));
    assert_eq!(
        game.apply(1, Action::EndTurn),
        Ok(ActionOutcome::TurnEnded {
            round_completed: true
        })
    );

    assert_eq!(game.forest(), 98);
    assert_eq!(game.replant_buffer(), 0);
    let snapshot = &game.round_history()[1];
    assert_eq!(snapshot.round, 2);
    assert_eq!(snapshot.trees, 98);
    assert_eq!(snapshot.players[0].replanted, 2);
    assert_eq!(snapshot.players[0].harvested, 2);
    assert_eq!(snapshot.players[1].replanted, 0);
    assert_eq!(snapshot.players[1].harvested, 4);
}

#[test]
fn test_hubbert_penalty_applies_to_final_score_only() {
    // Player 1 grows to four woodcutters over six rounds; player 2 never
    // harvests anything.
    let script = [
        2, 0, // round 1
        2, 0, // round 2
        2, 2, 0, // round 3
        2, 2, 2, 0, // round 4
        2, 2, 2, 2, 0, // round 5
        2, 2, 2, 2, 0, // round 6
    ];
    let mut game = Game::with_sampler(Variant::HubbertCurve, ScriptedSampler::new(script));

    for round in 1..=6 {
        game.apply(0, Action::Harvest).unwrap();
        if (2..=4).contains(&round) {
            assert_eq!(
                game.apply(0, Action::BuyWoodcutters(1)),
                Ok(ActionOutcome::Accepted)
            );
        }
        game.apply(0, Action::EndTurn).unwrap();
        harvest_and_pass(&mut game);
    }
    assert_eq!(game.players()[0].woodcutters, 4);
    assert_eq!(game.players()[0].harvested_trees, 21);

    play_out(&mut game);

    let player = &game.players()[0];
    assert_eq!(player.victory_points, 7);
    assert_eq!(player.total_victory_points_gained, 10);
    assert_eq!(player.harvested_trees, 0);

    let result = game.final_scores().copied().unwrap();
    assert_eq!(result.scores, [7, 0]);
    assert_eq!(result.winner, Winner::Player(0));
    assert!(game.events().contains(&GameEvent::HubbertPenaltyApplied));
}

#[test]
fn test_sustainable_bonus_every_fifth_round() {
    // Each player takes 2 trees a round for five rounds, leaving 80.
    let mut game = Game::with_sampler(Variant::Sustainable, ScriptedSampler::new([2; 10]));

    for _ in 0..8 {
        harvest_and_pass(&mut game);
    }
    assert_eq!(game.players()[0].victory_points, 0);

    harvest_and_pass(&mut game);
    harvest_and_pass(&mut game);
    assert_eq!(game.current_round(), 5);
    assert_eq!(game.forest(), 80);
    assert_eq!(game.players()[0].victory_points, 8);
    assert_eq!(game.players()[1].victory_points, 8);
    assert!(game.events().contains(&GameEvent::SustainableBonus(8)));

    play_out(&mut game);

    // Bonuses at rounds 5, 10, 15, 20 plus 10 leftover trees cashed out
    let result = game.final_scores().copied().unwrap();
    assert_eq!(result.scores, [37, 37]);
    assert_eq!(result.winner, Winner::Draw);
}

#[test]
fn test_forest_depletion_finalizes_once() {
    let mut game = Game::with_sampler(Variant::OvershootAndCollapse, ScriptedSampler::constant(2));

    for _ in 0..40 {
        let player = game.current_player();
        game.apply(player, Action::Harvest).unwrap();
        if game.is_game_over() {
            break;
        }
        let affordable = game.max_woodcutters();
        game.apply(player, Action::BuyWoodcutters(affordable)).unwrap();
        game.apply(player, Action::EndTurn).unwrap();
    }

    assert!(game.is_game_over());
    assert_eq!(game.forest(), 0);
    assert!(game.current_round() < 20);
    assert_eq!(game_over_events(&game), 1);
    assert!(
        game.events()
            .contains(&GameEvent::GameOver(GameOverCause::ForestDepleted))
    );

    let result = game.final_scores().copied().unwrap();
    assert!(matches!(game.phase(), Phase::GameOver { .. }));
    assert_eq!(game.apply(0, Action::EndTurn), Err(GameError::GameOver));
    assert_eq!(game.apply(1, Action::Harvest), Err(GameError::GameOver));

    // Finalizing again changes nothing
    assert_eq!(game.end_game(), result);
    assert_eq!(game_over_events(&game), 1);
    assert!(game.players().iter().all(|p| p.harvested_trees == 0));
}

#[test]
fn test_end_game_concludes_live_game() {
    let mut game = Game::with_sampler(Variant::OvershootAndCollapse, ScriptedSampler::constant(2));
    game.apply(0, Action::Harvest).unwrap();
    game.apply(0, Action::EndTurn).unwrap();
    game.apply(1, Action::Harvest).unwrap();
    game.apply(1, Action::BuyVictoryPoints(1)).unwrap();

    let first = game.end_game();
    // Player 1's two trees cash out; player 2 already converted theirs
    assert_eq!(first.scores, [1, 1]);
    assert_eq!(first.winner, Winner::Draw);
    assert!(
        game.events()
            .contains(&GameEvent::GameOver(GameOverCause::Concluded))
    );

    let second = game.end_game();
    assert_eq!(first, second);
    assert_eq!(game_over_events(&game), 1);
}

#[test]
fn test_exchange_limits_within_round() {
    let mut game = Game::with_sampler(Variant::OvershootAndCollapse, ScriptedSampler::constant(2));
    // Rounds 1 and 2: player 1 saves up for a woodcutter
    harvest_and_pass(&mut game);
    harvest_and_pass(&mut game);
    game.apply(0, Action::Harvest).unwrap();
    game.apply(0, Action::BuyWoodcutters(1)).unwrap();
    game.apply(0, Action::EndTurn).unwrap();
    harvest_and_pass(&mut game);

    // Round 3: two woodcutters bring the stock to 5, enough for a third
    game.apply(0, Action::Harvest).unwrap();
    assert_eq!(game.players()[0].harvested_trees, 5);
    game.apply(0, Action::BuyWoodcutters(1)).unwrap();
    assert_eq!(game.players()[0].woodcutters, 3);

    let exchange = |game: &mut Game| game.apply(0, Action::ExchangeWoodcutter);
    assert!(exchange(&mut game).unwrap().is_applied());
    assert!(exchange(&mut game).unwrap().is_applied());
    assert_eq!(
        exchange(&mut game).unwrap().label(),
        "limit",
        "third exchange in a round is refused"
    );
    assert_eq!(game.players()[0].woodcutters, 1);
    assert_eq!(game.players()[0].victory_points, 2);
}
