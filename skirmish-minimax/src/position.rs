use std::{fmt::Display, ops::Add};

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
/// A cell on the grid. `x` grows to the east (right) and `y` grows to the north (up)
pub struct Position {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Position {
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Taxicab distance between two cells. This is the metric used for attack ranges and as the
    /// fallback for the evaluator's distance terms
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The cell one step away in the given direction. This does NOT check map bounds
    pub fn step(&self, direction: Direction) -> Position {
        *self + direction
    }

    /// All four cardinal neighbors paired with the direction that reaches them, in
    /// [Direction::all] order
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, Position)> {
        let here = *self;
        Direction::all()
            .into_iter()
            .map(move |d| (d, here.step(d)))
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, rhs: Direction) -> Self::Output {
        let (dx, dy) = rhs.offset();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// One of the four cardinal directions. Diagonal movement is not part of the game
pub enum Direction {
    /// Towards larger `y`
    Up,
    /// Towards smaller `y`
    Down,
    /// Towards smaller `x`
    Left,
    /// Towards larger `x`
    Right,
}

impl Direction {
    /// Every direction, in the order the action enumerator emits moves
    pub const fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// `(dx, dy)` for a single step in this direction
    pub const fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The direction pointing the other way
    pub const fn reverse(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };

        write!(f, "{s}")
    }
}
