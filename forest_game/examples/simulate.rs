//! Headless Game Example
//!
//! Plays one game per scenario with two simple policies and prints the log.
//!
//! Run with `cargo run --example simulate -- [seed]`.

use forest_game::{Action, DieSampler, Game, Variant};

/// Player 1 expands aggressively, player 2 replants and banks points.
fn take_turn(game: &mut Game) {
    let player = game.current_player();
    if game.apply(player, Action::Harvest).is_err() || game.is_game_over() {
        return;
    }

    if player == 0 {
        let affordable = game.max_woodcutters();
        let _ = game.apply(player, Action::BuyWoodcutters(affordable));
    } else {
        let replant = game.max_replant();
        let _ = game.apply(player, Action::Replant(replant));
        let points = game.max_victory_points();
        let _ = game.apply(player, Action::BuyVictoryPoints(points));
        while game.apply(player, Action::ExchangeWoodcutter).is_ok_and(|o| o.is_applied()) {}
    }

    let _ = game.apply(player, Action::EndTurn);
}

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(2024);

    for variant in Variant::ALL {
        println!("=== {variant} (seed {seed}) ===\n");

        let mut game = Game::with_sampler(variant, DieSampler::seeded(seed));
        while !game.is_game_over() {
            take_turn(&mut game);
        }

        for line in game.event_log() {
            println!("{line}");
        }

        if let Some(result) = game.final_scores() {
            println!("\nWinner: {}\n", result.winner);
        }
    }
}
