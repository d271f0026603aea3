use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Action, GameState, JointAction, JointActionSpace, SearchError, Side, UnitSnapshot};

impl GameState {
    /// Resolve a joint action for the side to move, producing the next position
    ///
    /// Every reference is checked before anything is applied, so a stale id or a unit ordered
    /// twice leaves no partial damage behind. Damage from every attack is summed per target first and the dead are
    /// removed afterwards, which makes the outcome independent of attack order. The child has
    /// the other side to move and remembers `joint` as its [GameState::last_action].
    ///
    /// Moves are trusted to come from [GameState::legal_actions]; they are not re-validated
    /// against terrain here.
    pub fn apply(&self, joint: &JointAction) -> Result<GameState, SearchError> {
        let acting_side = self.side_to_move();
        let acting = self.squad(acting_side);
        let defending = self.squad(acting_side.opponent());

        let mut ordered = FxHashSet::default();
        let mut damage: FxHashMap<_, i32> = FxHashMap::default();
        for (unit_id, action) in joint.iter() {
            if !ordered.insert(*unit_id) {
                return Err(SearchError::DuplicateOrder { unit: *unit_id });
            }

            let unit = acting
                .iter()
                .find(|u| u.id == *unit_id)
                .ok_or(SearchError::StaleReference { unit: *unit_id })?;

            if let Action::Attack(target) = action {
                if !defending.iter().any(|u| u.id == *target) {
                    return Err(SearchError::StaleReference { unit: *target });
                }

                *damage.entry(*target).or_default() += unit.attack_power;
            }
        }

        let acting_next: Vec<UnitSnapshot> = acting
            .iter()
            .map(|unit| match joint.get(unit.id) {
                Some(Action::Move(direction)) => unit.moved_to(unit.position.step(direction)),
                _ => *unit,
            })
            .filter(|u| u.is_alive())
            .collect();

        let defending_next: Vec<UnitSnapshot> = defending
            .iter()
            .map(|unit| match damage.get(&unit.id) {
                Some(d) => unit.damaged_by(*d),
                None => *unit,
            })
            .filter(|u| u.is_alive())
            .collect();

        let (controlled, opposing) = match acting_side {
            Side::Max => (acting_next, defending_next),
            Side::Min => (defending_next, acting_next),
        };

        Ok(GameState::successor(
            self.shared_arena(),
            controlled,
            opposing,
            acting_side.opponent(),
            Some(joint.clone()),
        ))
    }

    /// Every successor of this position, in joint action generation order
    pub fn children(&self) -> Result<Vec<GameState>, SearchError> {
        Ok(self
            .successors()?
            .into_iter()
            .map(|(_, child)| child)
            .collect())
    }

    /// Like [GameState::children], paired with the joint action that leads to each child
    pub fn successors(&self) -> Result<Vec<(JointAction, GameState)>, SearchError> {
        let space = JointActionSpace::new(self.legal_actions(self.side_to_move()));

        space
            .iter()
            .map(|joint| {
                let child = self.apply(&joint)?;
                Ok((joint, child))
            })
            .collect()
    }
}
