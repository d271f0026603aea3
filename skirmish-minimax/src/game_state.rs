use std::{cell::OnceCell, fmt::Display, sync::Arc};

use decorum::N64;
use derivative::Derivative;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    eval::{reachability::Reachability, Scorable},
    Arena, EngineView, JointAction, Position, SearchError, UnitId, UnitSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Which squad is choosing actions
pub enum Side {
    /// The squad we control. Utilities are always from this side's point of view
    Max,
    /// The opposing squad
    Min,
}

impl Side {
    /// The other side
    pub fn opponent(&self) -> Side {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }

    #[allow(missing_docs)]
    pub fn is_maximizing(&self) -> bool {
        matches!(self, Side::Max)
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Max => write!(f, "max"),
            Side::Min => write!(f, "min"),
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
/// A single position in the search tree
///
/// A `GameState` owns both squads outright. Transitions never edit a state, they build a new
/// one, so the memoized utility and reachability map cached on an instance can never leak to a
/// different position.
pub struct GameState {
    #[derivative(Debug = "ignore")]
    arena: Arc<Arena>,
    controlled: Vec<UnitSnapshot>,
    opposing: Vec<UnitSnapshot>,
    side_to_move: Side,
    last_action: Option<JointAction>,
    #[derivative(Debug = "ignore")]
    utility: OnceCell<N64>,
    #[derivative(Debug = "ignore")]
    reachability: OnceCell<Reachability>,
}

impl GameState {
    /// Build a root position
    ///
    /// Units at or below zero health are dropped. Duplicate ids, units standing outside the
    /// arena and negative attack stats are rejected.
    pub fn new(
        arena: Arc<Arena>,
        controlled: Vec<UnitSnapshot>,
        opposing: Vec<UnitSnapshot>,
        side_to_move: Side,
    ) -> Result<Self, SearchError> {
        let mut seen = FxHashSet::default();
        for unit in controlled.iter().chain(opposing.iter()) {
            if !seen.insert(unit.id) {
                return Err(SearchError::InvalidSnapshot(format!(
                    "unit {} appears more than once",
                    unit.id
                )));
            }

            if !arena.in_bounds(&unit.position) {
                return Err(SearchError::InvalidSnapshot(format!(
                    "unit {} is outside the map at {}",
                    unit.id, unit.position
                )));
            }

            if unit.attack_power < 0 || unit.attack_range < 0 {
                return Err(SearchError::InvalidSnapshot(format!(
                    "unit {} has negative attack stats (power {}, range {})",
                    unit.id, unit.attack_power, unit.attack_range
                )));
            }
        }

        Ok(Self::successor(
            arena,
            controlled.into_iter().filter(|u| u.is_alive()).collect(),
            opposing.into_iter().filter(|u| u.is_alive()).collect(),
            side_to_move,
            None,
        ))
    }

    /// Snapshot the live engine state. The controlled squad moves first
    pub fn from_view(view: &(impl EngineView + ?Sized)) -> Result<Self, SearchError> {
        let arena = Arena::from_fn(view.width(), view.height(), |x, y| view.is_blocked(x, y))?;

        let snapshot = |side: Side| -> Vec<UnitSnapshot> {
            view.live_units(side)
                .into_iter()
                .map(|u| {
                    UnitSnapshot::new(
                        u.id,
                        u.position,
                        u.health,
                        u.template.attack_power,
                        u.template.attack_range,
                    )
                })
                .collect()
        };

        Self::new(
            Arc::new(arena),
            snapshot(Side::Max),
            snapshot(Side::Min),
            Side::Max,
        )
    }

    /// Squads passed in here must already be filtered of dead units
    pub(crate) fn successor(
        arena: Arc<Arena>,
        controlled: Vec<UnitSnapshot>,
        opposing: Vec<UnitSnapshot>,
        side_to_move: Side,
        last_action: Option<JointAction>,
    ) -> Self {
        debug_assert!(controlled.iter().chain(opposing.iter()).all(|u| u.is_alive()));

        Self {
            arena,
            controlled,
            opposing,
            side_to_move,
            last_action,
            utility: OnceCell::new(),
            reachability: OnceCell::new(),
        }
    }

    #[allow(missing_docs)]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub(crate) fn shared_arena(&self) -> Arc<Arena> {
        self.arena.clone()
    }

    /// The squad on the [Side::Max] side
    pub fn controlled(&self) -> &[UnitSnapshot] {
        &self.controlled
    }

    /// The squad on the [Side::Min] side
    pub fn opposing(&self) -> &[UnitSnapshot] {
        &self.opposing
    }

    #[allow(missing_docs)]
    pub fn squad(&self, side: Side) -> &[UnitSnapshot] {
        match side {
            Side::Max => &self.controlled,
            Side::Min => &self.opposing,
        }
    }

    #[allow(missing_docs)]
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// The joint action that produced this position, `None` for a root
    pub fn last_action(&self) -> Option<&JointAction> {
        self.last_action.as_ref()
    }

    /// One of the squads has been wiped out
    pub fn is_terminal(&self) -> bool {
        self.controlled.is_empty() || self.opposing.is_empty()
    }

    /// Find a unit on either squad
    pub fn unit(&self, id: UnitId) -> Option<(Side, &UnitSnapshot)> {
        self.controlled
            .iter()
            .find(|u| u.id == id)
            .map(|u| (Side::Max, u))
            .or_else(|| {
                self.opposing
                    .iter()
                    .find(|u| u.id == id)
                    .map(|u| (Side::Min, u))
            })
    }

    /// Is there a unit from `side` standing on `p`
    pub fn is_occupied_by(&self, side: Side, p: &Position) -> bool {
        self.squad(side).iter().any(|u| u.position == *p)
    }

    /// The utility of this position, computed once and then served from the memo
    ///
    /// A state is only ever scored by the heuristic of the search that built it, so the memo is
    /// not keyed by the scorer.
    pub fn utility_with<ScorableType: Scorable + ?Sized>(&self, scorer: &ScorableType) -> N64 {
        *self.utility.get_or_init(|| scorer.score(self))
    }

    /// Has [GameState::utility_with] already been computed for this instance
    pub fn is_scored(&self) -> bool {
        self.utility.get().is_some()
    }

    /// Breadth first distance fields from each squad, computed on first use
    pub fn reachability(&self) -> &Reachability {
        self.reachability.get_or_init(|| Reachability::new(self))
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "to move: {}", self.side_to_move)?;
        for y in (0..self.arena.height()).rev() {
            for x in 0..self.arena.width() {
                let p = Position::new(x, y);
                let c = if self.is_occupied_by(Side::Max, &p) {
                    'M'
                } else if self.is_occupied_by(Side::Min, &p) {
                    'm'
                } else if self.arena.is_blocked(&p) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
