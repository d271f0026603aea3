use std::path::PathBuf;

use color_eyre::eyre::Result;
use skirmish_minimax::{
    eval::{containment_count, Evaluation, Heuristic, HeuristicWeights, TieBreak},
    GameState,
};

use super::load_fixture;

#[derive(clap::Args, Debug)]
pub(crate) struct Evaluate {
    /// Path to a saved turn
    #[clap(short, long, value_parser)]
    fixture: PathBuf,
}

impl Evaluate {
    pub(crate) fn run(self) -> Result<()> {
        let skirmish = load_fixture(&self.fixture)?;
        let root = GameState::from_view(&skirmish)?;

        let heuristic = Heuristic::new(HeuristicWeights::default(), TieBreak::Disabled);

        println!("Turn {}", skirmish.turn());
        println!("{root}");

        match heuristic.evaluate(&root) {
            Evaluation::Scored(breakdown) => {
                println!("living       {:>10.2}", breakdown.living);
                println!("health       {:>10.2}", breakdown.health);
                println!("engagement   {:>10.2}", breakdown.engagement);
                println!("closing      {:>10.2}", breakdown.closing);
                println!(
                    "containment  {:>10.2} ({} pinned)",
                    breakdown.containment,
                    containment_count(&root)
                );
                println!("total        {:>10.2}", breakdown.total());
            }
            terminal => println!("{terminal:?} ({})", terminal.value()),
        }

        Ok(())
    }
}
