use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Direction, GameState, Side, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// The smallest thing a unit can do in one ply
pub enum Action {
    /// Step one cell in a cardinal direction
    Move(Direction),
    /// Hit the given enemy unit for the attacker's full attack power
    Attack(UnitId),
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move(d) => write!(f, "move {d}"),
            Action::Attack(target) => write!(f, "attack {target}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Every legal action for a single unit, in the order they were enumerated
pub struct UnitActions {
    #[allow(missing_docs)]
    pub unit: UnitId,
    #[allow(missing_docs)]
    pub actions: Vec<Action>,
}

impl GameState {
    /// Enumerate the legal actions of every living unit on `side`
    ///
    /// Attacks come first, one per enemy in manhattan range, in the enemy squad's order. Moves
    /// follow in [Direction::all] order, one per neighbor that is on the map, not terrain, and not
    /// occupied by an enemy. Allies do not block each other, so two allied units may end up
    /// sharing a cell.
    ///
    /// A unit with nothing to do still gets an entry with an empty action list.
    pub fn legal_actions(&self, side: Side) -> Vec<UnitActions> {
        let enemies = self.squad(side.opponent());

        self.squad(side)
            .iter()
            .map(|unit| {
                let attacks = enemies
                    .iter()
                    .filter(|enemy| unit.can_attack(enemy))
                    .map(|enemy| Action::Attack(enemy.id));

                let moves = unit
                    .position
                    .neighbors()
                    .filter(|(_, to)| {
                        self.arena().is_walkable(to) && !enemies.iter().any(|e| e.position == *to)
                    })
                    .map(|(d, _)| Action::Move(d));

                UnitActions {
                    unit: unit.id,
                    actions: attacks.chain(moves).collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Arena, Position, UnitSnapshot};

    fn unit(id: u32, x: i32, y: i32, range: i32) -> UnitSnapshot {
        UnitSnapshot::new(UnitId(id), Position::new(x, y), 20, 5, range)
    }

    #[test]
    fn test_corner_unit_in_open_field() {
        let arena = Arc::new(Arena::open(3, 3).unwrap());
        let state = GameState::new(
            arena,
            vec![unit(1, 0, 0, 1)],
            vec![unit(9, 2, 2, 1)],
            Side::Max,
        )
        .unwrap();

        let actions = state.legal_actions(Side::Max);

        assert_eq!(
            actions,
            vec![UnitActions {
                unit: UnitId(1),
                actions: vec![
                    Action::Move(Direction::Up),
                    Action::Move(Direction::Right)
                ],
            }]
        );
    }

    #[test]
    fn test_attacks_listed_before_moves_and_enemies_block() {
        let arena = Arc::new(Arena::with_obstacles(3, 3, [Position::new(0, 1)]).unwrap());
        let state = GameState::new(
            arena,
            vec![unit(1, 1, 1, 1)],
            vec![unit(7, 1, 2, 1), unit(8, 2, 2, 1), unit(9, 2, 1, 1)],
            Side::Max,
        )
        .unwrap();

        let actions = state.legal_actions(Side::Max);

        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].actions,
            vec![
                Action::Attack(UnitId(7)),
                Action::Attack(UnitId(9)),
                Action::Move(Direction::Down),
            ]
        );
    }

    #[test]
    fn test_allies_may_share_cells() {
        let arena = Arc::new(Arena::open(2, 1).unwrap());
        let state = GameState::new(
            arena,
            vec![unit(1, 0, 0, 0), unit(2, 1, 0, 0)],
            vec![],
            Side::Max,
        )
        .unwrap();

        let actions = state.legal_actions(Side::Max);

        assert_eq!(actions[0].actions, vec![Action::Move(Direction::Right)]);
        assert_eq!(actions[1].actions, vec![Action::Move(Direction::Left)]);
    }

    #[test]
    fn test_trapped_unit_keeps_an_empty_entry() {
        let arena = Arc::new(Arena::with_obstacles(2, 2, [Position::new(1, 0)]).unwrap());
        let state = GameState::new(
            arena,
            vec![unit(5, 0, 1, 1), unit(6, 1, 1, 1)],
            vec![unit(1, 0, 0, 0)],
            Side::Min,
        )
        .unwrap();

        let actions = state.legal_actions(Side::Min);

        // Terrain to the east, an enemy to the north and no reach to attack it
        assert_eq!(
            actions,
            vec![UnitActions {
                unit: UnitId(1),
                actions: vec![],
            }]
        );
    }

    #[test]
    fn test_ranged_unit_sees_far_targets() {
        let arena = Arc::new(Arena::open(6, 1).unwrap());
        let state = GameState::new(
            arena,
            vec![unit(1, 0, 0, 4)],
            vec![unit(2, 4, 0, 1), unit(3, 5, 0, 1)],
            Side::Max,
        )
        .unwrap();

        let actions = state.legal_actions(Side::Max);

        assert_eq!(
            actions[0].actions,
            vec![Action::Attack(UnitId(2)), Action::Move(Direction::Right)]
        );
    }
}
