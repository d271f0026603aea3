use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque identifier handed to us by the engine. It is stable for a unit across the whole search
/// tree, and is how attack targets and movers are tracked between plies
pub struct UnitId(pub u32);

impl Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The combat relevant facts about a single unit, captured once per search
///
/// Snapshots are never edited in place. Transitions build new snapshots with
/// [UnitSnapshot::moved_to] and [UnitSnapshot::damaged_by]
pub struct UnitSnapshot {
    #[allow(missing_docs)]
    pub id: UnitId,
    #[allow(missing_docs)]
    pub position: Position,
    /// Remaining health. Units at or below zero are removed from their squad
    pub health: i32,
    /// Damage dealt to the target of a single attack
    pub attack_power: i32,
    /// Maximum manhattan distance at which this unit can attack
    pub attack_range: i32,
}

impl UnitSnapshot {
    #[allow(missing_docs)]
    pub fn new(
        id: UnitId,
        position: Position,
        health: i32,
        attack_power: i32,
        attack_range: i32,
    ) -> Self {
        Self {
            id,
            position,
            health,
            attack_power,
            attack_range,
        }
    }

    #[allow(missing_docs)]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Can this unit attack `target` from where it stands
    pub fn can_attack(&self, target: &UnitSnapshot) -> bool {
        self.position.manhattan_distance(&target.position) <= self.attack_range
    }

    /// A copy of this unit standing somewhere else
    pub fn moved_to(&self, position: Position) -> Self {
        Self { position, ..*self }
    }

    /// A copy of this unit after taking `damage`. Health is allowed to go negative, the squad
    /// filter in the transition removes it afterwards
    pub fn damaged_by(&self, damage: i32) -> Self {
        Self {
            health: self.health - damage,
            ..*self
        }
    }
}
