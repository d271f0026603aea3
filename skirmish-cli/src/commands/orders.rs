use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use itertools::Itertools;
use skirmish_rs::{all_factories, factory_named};

use super::load_fixture;

#[derive(clap::Args, Debug)]
pub(crate) struct Orders {
    /// Path to a saved turn
    #[clap(short, long, value_parser)]
    fixture: PathBuf,

    /// Which registered agent should play the turn
    #[clap(short, long, value_parser, default_value = "tactical-tess")]
    agent: String,
}

impl Orders {
    pub(crate) fn run(self) -> Result<()> {
        let skirmish = load_fixture(&self.fixture)?;

        let factory = factory_named(&self.agent).ok_or_else(|| {
            let known = all_factories().iter().map(|f| f.name()).join(", ");
            eyre!("No agent named {}, try one of: {known}", self.agent)
        })?;

        let orders = factory.create_agent().take_turn(&skirmish);

        println!("{}", serde_json::to_string_pretty(&orders)?);

        Ok(())
    }
}
