pub mod evaluate;
pub mod orders;
pub mod solve;

use std::{fs, path::Path};

use clap::Subcommand;
use color_eyre::eyre::{eyre, Result, WrapErr};
use skirmish_rs::Skirmish;

use evaluate::Evaluate;
use orders::Orders;
use solve::Solve;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    Solve(Solve),
    Evaluate(Evaluate),
    Orders(Orders),
}

impl Command {
    pub fn run(self) -> Result<()> {
        match self {
            Command::Solve(s) => s.run()?,
            Command::Evaluate(e) => e.run()?,
            Command::Orders(o) => o.run()?,
        }

        Ok(())
    }
}

pub(crate) fn load_fixture(path: &Path) -> Result<Skirmish> {
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("Could not read fixture {}", path.display()))?;

    Skirmish::from_json(&json).map_err(|e| eyre!("{e:#}"))
}
