use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Action, UnitActions, UnitId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// One action for each acting unit, all resolved in the same ply
///
/// Units are referenced by id only. Entries keep the order of the squad they came from.
pub struct JointAction(Vec<(UnitId, Action)>);

impl JointAction {
    /// Build a joint action from `(unit, action)` pairs
    pub fn new(actions: Vec<(UnitId, Action)>) -> Self {
        Self(actions)
    }

    /// The action chosen for `unit`, if it is acting in this ply
    pub fn get(&self, unit: UnitId) -> Option<Action> {
        self.0.iter().find(|(id, _)| *id == unit).map(|(_, a)| *a)
    }

    #[allow(missing_docs)]
    pub fn iter(&self) -> impl Iterator<Item = &(UnitId, Action)> + '_ {
        self.0.iter()
    }

    /// Number of units acting
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for JointAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|(unit, action)| format!("{unit} {action}"))
            .join(", ");

        write!(f, "[{parts}]")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Every way of picking one action per acting unit, generated lazily
///
/// The space only stores the per-unit lists. Each call to [JointActionSpace::iter] starts a fresh
/// walk over the cartesian product, so the sequence can be replayed as often as needed without
/// ever materializing it.
pub struct JointActionSpace {
    units: Vec<UnitActions>,
}

impl JointActionSpace {
    /// Units with no legal action are left out entirely: they hold position and add no branching
    pub fn new(per_unit: Vec<UnitActions>) -> Self {
        Self {
            units: per_unit
                .into_iter()
                .filter(|u| !u.actions.is_empty())
                .collect(),
        }
    }

    /// The units that get an entry in every joint action
    pub fn acting_units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().map(|u| u.unit)
    }

    /// How many joint actions [JointActionSpace::iter] will yield
    ///
    /// With no acting units there are no joint actions at all, rather than a single empty one
    pub fn len(&self) -> usize {
        if self.units.is_empty() {
            return 0;
        }

        self.units.iter().map(|u| u.actions.len()).product()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk the product in a fixed order: the last unit's action varies fastest
    pub fn iter(&self) -> impl Iterator<Item = JointAction> + '_ {
        let product = if self.units.is_empty() {
            None
        } else {
            Some(
                self.units
                    .iter()
                    .map(|u| u.actions.iter().copied())
                    .multi_cartesian_product(),
            )
        };

        product.into_iter().flatten().map(move |actions| {
            JointAction(self.acting_units().zip(actions).collect())
        })
    }
}
