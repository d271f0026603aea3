use std::{path::PathBuf, time::Duration};

use color_eyre::eyre::Result;
use itertools::Itertools;
use skirmish_minimax::{
    alpha_beta::{MinMaxReturn, MinimaxSquad, SearchOptions, DEFAULT_DEPTH},
    eval::HeuristicWeights,
    GameState,
};
use skirmish_rs::TurnOrders;

use super::load_fixture;

#[derive(clap::Args, Debug)]
pub(crate) struct Solve {
    /// Path to a saved turn
    #[clap(short, long, value_parser)]
    fixture: PathBuf,

    /// How many plies to search
    #[clap(short, long, value_parser, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// Stop expanding nodes after this many
    #[clap(long, value_parser)]
    node_budget: Option<usize>,

    /// Stop expanding nodes after this many milliseconds
    #[clap(long, value_parser)]
    time_budget_ms: Option<u64>,

    /// Break ties with random jitter, the way live play does
    #[clap(long, value_parser, default_value_t = false)]
    live: bool,

    /// Print the whole searched tree
    #[clap(long, value_parser, default_value_t = false)]
    tree: bool,
}

impl Solve {
    pub(crate) fn run(self) -> Result<()> {
        let skirmish = load_fixture(&self.fixture)?;
        let root = GameState::from_view(&skirmish)?;

        let preset = if self.live {
            SearchOptions::live(self.depth)
        } else {
            SearchOptions::diagnostic(self.depth)
        };
        let options = SearchOptions {
            node_budget: self.node_budget,
            time_budget: self.time_budget_ms.map(Duration::from_millis),
            ..preset
        };
        let deepened = options.node_budget.is_some() || options.time_budget.is_some();

        let squad = MinimaxSquad::with_heuristic(root, HeuristicWeights::default(), "cli", options);

        println!("Turn {}", skirmish.turn());
        println!("{}", squad.root);

        let outcome = if deepened {
            squad.deepened_search()?
        } else {
            squad.search()?
        };

        let orders = match outcome.best_action() {
            Some(joint) => TurnOrders::from_joint_action(&squad.root, joint)
                .map_err(|e| color_eyre::eyre::eyre!("{e:#}"))?,
            None => TurnOrders::pass(),
        };

        println!("Orders: {orders}");
        println!(
            "Score {} at depth {}, {} nodes expanded{}",
            outcome.result.score().into_inner(),
            outcome.depth,
            outcome.nodes,
            if outcome.truncated { ", truncated" } else { "" }
        );

        print_route(&outcome.result);

        if self.tree {
            if let Some(tree) = outcome.result.to_text_tree() {
                println!("{tree}");
            }
        }

        Ok(())
    }
}

fn print_route(result: &MinMaxReturn) {
    let route = result.chosen_route();
    if route.is_empty() {
        return;
    }

    println!("Expected line:");
    for (ply, (side, joint)) in route.iter().enumerate() {
        println!("  {ply}. {side}: {joint}");
    }

    let sides = route.iter().map(|(side, _)| side).unique().count();
    println!("{} plies across {} sides", route.len(), sides);
}
