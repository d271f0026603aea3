use std::fmt::Display;

use crate::{Position, SearchError};

#[derive(Debug, Clone, PartialEq, Eq)]
/// The static part of the map: its bounds and which cells are blocked by terrain
///
/// An arena is built once per search and shared read only between every
/// [GameState](crate::GameState) of that search
pub struct Arena {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
}

impl Arena {
    /// An arena with no obstacles
    pub fn open(width: i32, height: i32) -> Result<Self, SearchError> {
        Self::from_fn(width, height, |_, _| false)
    }

    /// Build an arena by asking `is_blocked` about every cell
    pub fn from_fn(
        width: i32,
        height: i32,
        is_blocked: impl Fn(i32, i32) -> bool,
    ) -> Result<Self, SearchError> {
        if width <= 0 || height <= 0 {
            return Err(SearchError::InvalidSnapshot(format!(
                "map dimensions must be positive, got {width}x{height}"
            )));
        }

        let cells = width.checked_mul(height).ok_or_else(|| {
            SearchError::InvalidSnapshot(format!("map of {width}x{height} cells is too large"))
        })?;

        let mut blocked = Vec::with_capacity(cells as usize);
        for y in 0..height {
            for x in 0..width {
                blocked.push(is_blocked(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            blocked,
        })
    }

    /// An open arena with the listed cells blocked. Cells outside the bounds are ignored
    pub fn with_obstacles(
        width: i32,
        height: i32,
        obstacles: impl IntoIterator<Item = Position>,
    ) -> Result<Self, SearchError> {
        let mut arena = Self::open(width, height)?;
        for p in obstacles {
            if let Some(i) = arena.index_of(&p) {
                arena.blocked[i] = true;
            }
        }

        Ok(arena)
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells in the arena, blocked or not
    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    #[allow(missing_docs)]
    pub fn in_bounds(&self, p: &Position) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Out of bounds cells count as blocked
    pub fn is_blocked(&self, p: &Position) -> bool {
        self.index_of(p).map(|i| self.blocked[i]).unwrap_or(true)
    }

    /// In bounds and free of terrain. Units are not considered here
    pub fn is_walkable(&self, p: &Position) -> bool {
        !self.is_blocked(p)
    }

    /// Row-major index of an in-bounds cell
    pub fn index_of(&self, p: &Position) -> Option<usize> {
        if self.in_bounds(p) {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// Inverse of [Arena::index_of]
    pub fn position_of(&self, index: usize) -> Position {
        let index = index as i32;
        Position::new(index % self.width, index / self.width)
    }
}

impl Display for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let c = if self.is_blocked(&Position::new(x, y)) {
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
