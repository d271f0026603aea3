#![warn(missing_docs, missing_debug_implementations)]
//! This crate picks actions for a squad of units in a turn based, grid based skirmish. It runs a
//! two player minimax with alpha-beta pruning: our squad maximizes a heuristic utility, the
//! opposing squad is assumed to minimize it.
//!
//! The search never touches the live game. A [GameState] is snapshotted from an [EngineView]
//! once, and every position after that is a fresh, immutable copy. You get back a
//! [JointAction], one [Action] per unit, for the host to turn into engine commands.
//!
//! The main entry point is [alpha_beta::MinimaxSquad].

mod position;
pub use position::{Direction, Position};

mod unit;
pub use unit::{UnitId, UnitSnapshot};

mod arena;
pub use arena::Arena;

mod error;
pub use error::SearchError;

mod snapshot;
pub use snapshot::{EngineView, LiveUnit, UnitTemplate};

mod game_state;
pub use game_state::{GameState, Side};

mod actions;
pub use actions::{Action, UnitActions};

mod joint;
pub use joint::{JointAction, JointActionSpace};

mod transition;

pub mod eval;

pub mod alpha_beta;
