use skirmish_minimax::{
    alpha_beta::{MinimaxSquad, MoveOrdering, SearchOptions},
    eval::{Heuristic, HeuristicWeights},
    GameState,
};
use skirmish_rs::Skirmish;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};

fn create_squad(json: &str, options: SearchOptions) -> MinimaxSquad<Heuristic> {
    let skirmish = Skirmish::from_json(json).unwrap();
    let root = GameState::from_view(&skirmish).unwrap();

    MinimaxSquad::with_heuristic(root, HeuristicWeights::default(), "bench", options)
}

fn bench_search_to_depth(c: &mut Criterion, depth: usize) {
    let game_json = include_str!("../fixtures/walled_field.json");

    let mut group = c.benchmark_group(format!("Alpha-Beta: Depth {}", depth));

    group.bench_function("best first", |b| {
        b.iter(|| {
            let squad = create_squad(black_box(game_json), SearchOptions::diagnostic(depth));
            squad.search().unwrap()
        })
    });

    group.bench_function("unordered", |b| {
        b.iter(|| {
            let options = SearchOptions {
                move_ordering: MoveOrdering::Unordered,
                ..SearchOptions::diagnostic(depth)
            };
            let squad = create_squad(black_box(game_json), options);
            squad.search().unwrap()
        })
    });

    group.bench_function("iterative deepened", |b| {
        b.iter(|| {
            let squad = create_squad(black_box(game_json), SearchOptions::diagnostic(depth));
            squad.deepened_search().unwrap()
        })
    });

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_search_to_depth(c, 2);
    bench_search_to_depth(c, 3);
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}
criterion_main!(benches);
