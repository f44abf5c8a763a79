use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use forest_game::{Action, DieSampler, Game, Variant};

/// Greedy policy: harvest, buy every affordable woodcutter, pass.
fn play_greedy(mut game: Game) -> Game {
    while !game.is_game_over() {
        let player = game.current_player();
        if game.apply(player, Action::Harvest).is_err() || game.is_game_over() {
            break;
        }
        let affordable = game.max_woodcutters();
        let _ = game.apply(player, Action::BuyWoodcutters(affordable));
        let _ = game.apply(player, Action::EndTurn);
    }
    game
}

/// Cautious policy: harvest, replant what fits, bank the rest as points.
fn play_cautious(mut game: Game) -> Game {
    while !game.is_game_over() {
        let player = game.current_player();
        if game.apply(player, Action::Harvest).is_err() || game.is_game_over() {
            break;
        }
        let replant = game.max_replant();
        let _ = game.apply(player, Action::Replant(replant));
        let points = game.max_victory_points();
        let _ = game.apply(player, Action::BuyVictoryPoints(points));
        let _ = game.apply(player, Action::EndTurn);
    }
    game
}

/// Benchmark complete games for each scenario
fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");

    for variant in Variant::ALL.iter() {
        group.bench_with_input(
            BenchmarkId::new("greedy", variant.code()),
            variant,
            |b, &variant| {
                b.iter_batched(
                    || Game::with_sampler(variant, DieSampler::seeded(7)),
                    play_greedy,
                    criterion::BatchSize::SmallInput,
                );
            },
        );
        group.bench_with_input(
            BenchmarkId::new("cautious", variant.code()),
            variant,
            |b, &variant| {
                b.iter_batched(
                    || Game::with_sampler(variant, DieSampler::seeded(7)),
                    play_cautious,
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark view generation on a finished game (largest history)
fn bench_view_generation(c: &mut Criterion) {
    let game = play_cautious(Game::with_sampler(Variant::Sustainable, DieSampler::seeded(7)));
    c.bench_function("view_finished_game", |b| {
        b.iter(|| game.view());
    });
}

/// Benchmark CSV rendering of a full 20-round report
fn bench_report(c: &mut Criterion) {
    use forest_game::{GameReport, room::ParticipantInfo};

    let game = play_cautious(Game::with_sampler(Variant::default(), DieSampler::seeded(7)));
    let report = GameReport {
        participants: [ParticipantInfo::named("Ada"), ParticipantInfo::named("Linus")],
        comment: "benchmark".to_string(),
        rounds: game.round_history().to_vec(),
    };
    c.bench_function("report_to_csv", |b| {
        b.iter(|| report.to_csv());
    });
}

criterion_group!(game_operations, bench_full_game, bench_view_generation);

criterion_group!(export, bench_report);

criterion_main!(game_operations, export);
