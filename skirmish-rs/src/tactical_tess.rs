use std::time::Duration;

use anyhow::{Context, Result};
use skirmish_minimax::{
    alpha_beta::{MinimaxSquad, SearchOptions},
    eval::HeuristicWeights,
    EngineView, GameState,
};
use tracing::{info, warn};

use super::*;

/// Plays whatever the alpha-beta search picks
pub struct TacticalTess {
    name: &'static str,
    options: SearchOptions,
    weights: HeuristicWeights,
}

impl TacticalTess {
    pub fn new(name: &'static str, options: SearchOptions, weights: HeuristicWeights) -> Self {
        Self {
            name,
            options,
            weights,
        }
    }

    /// Search the current view and translate the result into orders
    pub fn plan(&self, view: &dyn EngineView) -> Result<TurnOrders> {
        let root = GameState::from_view(view).context("Could not snapshot the engine view")?;
        let squad = MinimaxSquad::with_heuristic(root, self.weights, self.name, self.options);

        let chosen = squad.choose_action().context("Search failed")?;

        match chosen {
            Some(joint) => TurnOrders::from_joint_action(&squad.root, &joint),
            None => Ok(TurnOrders::pass()),
        }
    }
}

impl TacticalAgent for TacticalTess {
    fn take_turn(&self, view: &dyn EngineView) -> TurnOrders {
        match self.plan(view) {
            Ok(orders) => {
                info!(agent = self.name, %orders, "orders ready");
                orders
            }
            Err(e) => {
                warn!(agent = self.name, error = ?e, "skipping turn");
                TurnOrders::pass()
            }
        }
    }
}

pub struct TacticalTessFactory;

impl AgentFactory for TacticalTessFactory {
    fn name(&self) -> String {
        "tactical-tess".to_owned()
    }

    fn create_agent(&self) -> BoxedAgent {
        Box::new(TacticalTess::new(
            "tactical-tess",
            SearchOptions::live(4),
            HeuristicWeights::default(),
        ))
    }
}

/// A shallower, deterministic Tess that never spends more than a fixed time budget per turn
pub struct CautiousTessFactory;

impl AgentFactory for CautiousTessFactory {
    fn name(&self) -> String {
        "cautious-tess".to_owned()
    }

    fn create_agent(&self) -> BoxedAgent {
        let options = SearchOptions {
            time_budget: Some(Duration::from_millis(200)),
            ..SearchOptions::diagnostic(3)
        };

        Box::new(TacticalTess::new(
            "cautious-tess",
            options,
            HeuristicWeights::default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use skirmish_minimax::{eval::containment_count, UnitId};

    use super::*;

    fn tess(depth: usize) -> TacticalTess {
        TacticalTess::new(
            "test-tess",
            SearchOptions::diagnostic(depth),
            HeuristicWeights::default(),
        )
    }

    #[test]
    fn test_attacks_the_adjacent_enemy() {
        let skirmish = Skirmish::from_json(include_str!("../fixtures/adjacent_enemy.json")).unwrap();

        let orders = tess(2).take_turn(&skirmish);

        assert!(orders.commands.contains(&UnitCommand::Attack {
            unit: UnitId(2),
            target: UnitId(9),
        }));
        assert_eq!(orders.commands.len(), 2);
    }

    #[test]
    fn test_east_edge_pin_is_recognized() {
        let skirmish = Skirmish::from_json(include_str!("../fixtures/east_edge_pin.json")).unwrap();

        let root = GameState::from_view(&skirmish).unwrap();

        assert_eq!(containment_count(&root), 1);
    }

    #[test]
    fn test_every_order_is_for_our_squad() {
        let skirmish = Skirmish::from_json(include_str!("../fixtures/walled_field.json")).unwrap();

        let orders = tess(2).take_turn(&skirmish);

        assert!(!orders.is_pass());
        for command in orders.commands {
            let unit = match command {
                UnitCommand::Move { unit, .. } => unit,
                UnitCommand::Attack { unit, .. } => unit,
            };
            assert!([UnitId(1), UnitId(2), UnitId(3)].contains(&unit));
        }
    }

    #[test]
    fn test_broken_view_passes() {
        let json = r#"{
            "map": { "width": 3, "height": 3 },
            "templates": { "footman": { "attack_power": 1, "attack_range": 1 } },
            "controlled": [
                { "id": 1, "position": { "x": 0, "y": 0 }, "health": 5, "template": "footman" }
            ],
            "opposing": [
                { "id": 1, "position": { "x": 2, "y": 2 }, "health": 5, "template": "footman" }
            ]
        }"#;
        let skirmish = Skirmish::from_json(json).unwrap();

        assert!(tess(2).plan(&skirmish).is_err());
        assert_eq!(tess(2).take_turn(&skirmish), TurnOrders::pass());
    }

    #[test]
    fn test_invalid_depth_passes() {
        let skirmish = Skirmish::from_json(include_str!("../fixtures/adjacent_enemy.json")).unwrap();

        assert!(tess(0).take_turn(&skirmish).is_pass());
    }

    #[test]
    fn test_factories_build_working_agents() {
        let skirmish = Skirmish::from_json(include_str!("../fixtures/adjacent_enemy.json")).unwrap();

        for factory in all_factories() {
            let agent = factory.create_agent();
            assert!(!agent.take_turn(&skirmish).is_pass(), "{}", factory.name());
        }
    }
}
