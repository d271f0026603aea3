//! The JSON shape the engine reports a turn in, and a validated view over it

use std::{collections::HashMap, convert::TryFrom};

use anyhow::{anyhow, bail, Context, Result};
use rustc_hash::FxHashSet;
use skirmish_minimax::{EngineView, LiveUnit, Position, Side, UnitId, UnitTemplate};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WireMap {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub obstacles: Vec<Position>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireTemplate {
    pub attack_power: i32,
    pub attack_range: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WireUnit {
    pub id: UnitId,
    pub position: Position,
    pub health: i32,
    /// Key into [WireSkirmish::templates]
    pub template: String,
}

/// A turn exactly as the engine serializes it
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WireSkirmish {
    #[serde(default)]
    pub turn: u32,
    pub map: WireMap,
    pub templates: HashMap<String, WireTemplate>,
    pub controlled: Vec<WireUnit>,
    pub opposing: Vec<WireUnit>,
}

/// A turn with every template resolved, ready to be searched
#[derive(Debug, Clone)]
pub struct Skirmish {
    turn: u32,
    width: i32,
    height: i32,
    obstacles: FxHashSet<Position>,
    controlled: Vec<LiveUnit>,
    opposing: Vec<LiveUnit>,
}

impl Skirmish {
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: WireSkirmish = serde_json::from_str(json).context("Could not parse skirmish")?;

        Self::try_from(wire)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }
}

impl TryFrom<WireSkirmish> for Skirmish {
    type Error = anyhow::Error;

    fn try_from(wire: WireSkirmish) -> Result<Self> {
        for (name, template) in wire.templates.iter() {
            if template.attack_power < 0 || template.attack_range < 0 {
                bail!("Template {name} has negative stats: {template:?}");
            }
        }

        let resolve = |units: Vec<WireUnit>| -> Result<Vec<LiveUnit>> {
            units
                .into_iter()
                .map(|u| {
                    let template = wire.templates.get(&u.template).ok_or_else(|| {
                        anyhow!("Unit {} uses unknown template {:?}", u.id, u.template)
                    })?;

                    Ok(LiveUnit {
                        id: u.id,
                        position: u.position,
                        health: u.health,
                        template: UnitTemplate {
                            attack_power: template.attack_power,
                            attack_range: template.attack_range,
                        },
                    })
                })
                .collect()
        };

        let controlled = resolve(wire.controlled).context("Resolving the controlled squad")?;
        let opposing = resolve(wire.opposing).context("Resolving the opposing squad")?;

        Ok(Self {
            turn: wire.turn,
            width: wire.map.width,
            height: wire.map.height,
            obstacles: wire.map.obstacles.into_iter().collect(),
            controlled,
            opposing,
        })
    }
}

impl EngineView for Skirmish {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.obstacles.contains(&Position::new(x, y))
    }

    fn live_units(&self, side: Side) -> Vec<LiveUnit> {
        let squad = match side {
            Side::Max => &self.controlled,
            Side::Min => &self.opposing,
        };

        squad.iter().filter(|u| u.health > 0).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_fixture() {
        let skirmish = Skirmish::from_json(include_str!("../fixtures/walled_field.json")).unwrap();

        assert_eq!(skirmish.turn(), 23);
        assert_eq!(skirmish.width(), 8);
        assert!(skirmish.is_blocked(3, 3));
        assert!(!skirmish.is_blocked(0, 0));

        let controlled = skirmish.live_units(Side::Max);
        assert_eq!(controlled.len(), 3);
        assert_eq!(controlled[1].id, UnitId(2));
        assert_eq!(
            controlled[1].template,
            UnitTemplate {
                attack_power: 4,
                attack_range: 2
            }
        );
        assert_eq!(skirmish.live_units(Side::Min)[0].id, UnitId(11));
    }

    #[test]
    fn test_unknown_template() {
        let json = r#"{
            "map": { "width": 3, "height": 3 },
            "templates": {},
            "controlled": [
                { "id": 1, "position": { "x": 0, "y": 0 }, "health": 10, "template": "wizard" }
            ],
            "opposing": []
        }"#;

        let err = Skirmish::from_json(json).unwrap_err();

        assert!(format!("{err:#}").contains("unknown template \"wizard\""));
    }

    #[test]
    fn test_negative_stats_are_rejected() {
        let json = r#"{
            "map": { "width": 3, "height": 3 },
            "templates": { "cursed": { "attack_power": -1, "attack_range": 1 } },
            "controlled": [],
            "opposing": []
        }"#;

        assert!(Skirmish::from_json(json).is_err());
    }

    #[test]
    fn test_dead_units_are_not_live() {
        let json = r#"{
            "map": { "width": 3, "height": 3 },
            "templates": { "footman": { "attack_power": 1, "attack_range": 1 } },
            "controlled": [
                { "id": 1, "position": { "x": 0, "y": 0 }, "health": 0, "template": "footman" },
                { "id": 2, "position": { "x": 1, "y": 0 }, "health": 3, "template": "footman" }
            ],
            "opposing": []
        }"#;

        let skirmish = Skirmish::from_json(json).unwrap();

        let live = skirmish.live_units(Side::Max);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, UnitId(2));
    }
}
