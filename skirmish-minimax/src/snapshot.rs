use crate::{Position, Side, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Static stats shared by every unit built from the same template
pub struct UnitTemplate {
    #[allow(missing_docs)]
    pub attack_power: i32,
    #[allow(missing_docs)]
    pub attack_range: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A living unit as reported by the engine
pub struct LiveUnit {
    #[allow(missing_docs)]
    pub id: UnitId,
    #[allow(missing_docs)]
    pub position: Position,
    #[allow(missing_docs)]
    pub health: i32,
    #[allow(missing_docs)]
    pub template: UnitTemplate,
}

/// The read only view of live engine state that a search starts from
///
/// The core never writes through this. [GameState::from_view](crate::GameState::from_view) copies
/// everything it needs out of it once, at the start of the search
pub trait EngineView {
    /// Number of columns on the map
    fn width(&self) -> i32;

    /// Number of rows on the map
    fn height(&self) -> i32;

    /// Is the cell occupied by terrain (trees, walls, buildings...)
    fn is_blocked(&self, x: i32, y: i32) -> bool;

    /// Every living unit on `side`. [Side::Max] is the squad we control
    fn live_units(&self, side: Side) -> Vec<LiveUnit>;
}
