#[macro_use]
extern crate serde_derive;

use std::fmt::Display;

use anyhow::{anyhow, Result};
use itertools::Itertools;
use skirmish_minimax::{Action, Direction, EngineView, GameState, JointAction, Position, UnitId};

pub use skirmish_minimax;

pub mod tactical_tess;
pub mod wire;

pub use wire::Skirmish;

use crate::tactical_tess::{CautiousTessFactory, TacticalTessFactory};

/// A single engine command for one unit
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum UnitCommand {
    Move {
        unit: UnitId,
        direction: Direction,
        /// The cell the unit ends up on, so the engine doesn't have to redo the arithmetic
        to: Position,
    },
    Attack {
        unit: UnitId,
        target: UnitId,
    },
}

impl Display for UnitCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitCommand::Move { unit, to, .. } => write!(f, "{unit} -> {to}"),
            UnitCommand::Attack { unit, target } => write!(f, "{unit} x {target}"),
        }
    }
}

/// Everything our squad does this turn. No commands means pass
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOrders {
    pub commands: Vec<UnitCommand>,
}

impl TurnOrders {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn is_pass(&self) -> bool {
        self.commands.is_empty()
    }

    /// Translate a joint action chosen at `root` into engine commands
    pub fn from_joint_action(root: &GameState, joint: &JointAction) -> Result<Self> {
        let commands = joint
            .iter()
            .map(|(unit, action)| {
                let (_, snapshot) = root
                    .unit(*unit)
                    .ok_or_else(|| anyhow!("Unit {unit} is not in the searched position"))?;

                Ok(match action {
                    Action::Move(direction) => UnitCommand::Move {
                        unit: *unit,
                        direction: *direction,
                        to: snapshot.position.step(*direction),
                    },
                    Action::Attack(target) => UnitCommand::Attack {
                        unit: *unit,
                        target: *target,
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { commands })
    }
}

impl Display for TurnOrders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_pass() {
            return write!(f, "pass");
        }

        write!(f, "{}", self.commands.iter().join(", "))
    }
}

pub type BoxedAgent = Box<dyn TacticalAgent + Send + Sync>;
pub type BoxedFactory = Box<dyn AgentFactory + Send + Sync>;

pub trait TacticalAgent {
    /// Decide this turn's orders. Failures are logged and turn into a pass, the next turn
    /// starts over from a fresh view
    fn take_turn(&self, view: &dyn EngineView) -> TurnOrders;
}

pub trait AgentFactory {
    fn name(&self) -> String;
    fn create_agent(&self) -> BoxedAgent;
}

pub fn all_factories() -> Vec<BoxedFactory> {
    vec![
        Box::new(TacticalTessFactory {}),
        Box::new(CautiousTessFactory {}),
    ]
}

pub fn factory_named(name: &str) -> Option<BoxedFactory> {
    all_factories().into_iter().find(|f| f.name() == name)
}
