//! Breadth first walking distances over the arena, used by the evaluator's distance terms

use crate::{Arena, GameState, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Walking distance from the nearest of a set of source cells to every cell of the arena
///
/// Terrain blocks the fill, units do not. Cells the fill never reaches are `None`
pub struct DistanceField {
    width: i32,
    height: i32,
    distances: Vec<Option<u32>>,
}

impl DistanceField {
    /// Flood outwards from every source at once, one ring per cycle
    pub fn from_sources(arena: &Arena, sources: impl IntoIterator<Item = Position>) -> Self {
        let mut distances = vec![None; arena.cell_count()];
        let mut todos = Vec::with_capacity(16);

        for source in sources {
            if let Some(i) = arena.index_of(&source) {
                if distances[i].is_none() {
                    distances[i] = Some(0);
                    todos.push(source);
                }
            }
        }

        let mut cycle = 0;
        while !todos.is_empty() {
            cycle += 1;
            let mut new_todos = Vec::with_capacity(todos.len() + 4);

            for pos in todos {
                for (_, neighbor) in pos.neighbors() {
                    if !arena.is_walkable(&neighbor) {
                        continue;
                    }

                    if let Some(i) = arena.index_of(&neighbor) {
                        if distances[i].is_none() {
                            distances[i] = Some(cycle);
                            new_todos.push(neighbor);
                        }
                    }
                }
            }

            todos = new_todos;
        }

        Self {
            width: arena.width(),
            height: arena.height(),
            distances,
        }
    }

    /// Steps from the nearest source to `p`, `None` if `p` can't be reached or is off the map
    pub fn distance(&self, p: &Position) -> Option<u32> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }

        self.distances[(p.y * self.width + p.x) as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A [DistanceField] for each squad of a position
///
/// Built lazily and cached on the [GameState] it describes, see [GameState::reachability]
pub struct Reachability {
    from_controlled: DistanceField,
    from_opposing: DistanceField,
}

impl Reachability {
    #[allow(missing_docs)]
    pub fn new(state: &GameState) -> Self {
        let arena = state.arena();

        Self {
            from_controlled: DistanceField::from_sources(
                arena,
                state.controlled().iter().map(|u| u.position),
            ),
            from_opposing: DistanceField::from_sources(
                arena,
                state.opposing().iter().map(|u| u.position),
            ),
        }
    }

    /// Walking distance from `p` to the closest controlled unit
    pub fn to_controlled(&self, p: &Position) -> Option<u32> {
        self.from_controlled.distance(p)
    }

    /// Walking distance from `p` to the closest opposing unit
    pub fn to_opposing(&self, p: &Position) -> Option<u32> {
        self.from_opposing.distance(p)
    }
}
