use thiserror::Error;

use crate::UnitId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Everything that can go wrong while setting up or running a search
///
/// None of these are fatal to the host. The engine adapter logs them and skips the turn; a fresh
/// snapshot next turn is the retry
pub enum SearchError {
    /// The configured ply depth can't be searched
    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(usize),
    /// A joint action referenced a unit that isn't on the expected squad
    #[error("unit {unit} is not present in this position")]
    StaleReference {
        /// The id that could not be resolved
        unit: UnitId,
    },
    /// A joint action gave the same unit more than one order
    #[error("unit {unit} was given more than one order")]
    DuplicateOrder {
        /// The unit that was ordered twice
        unit: UnitId,
    },
    /// The engine handed us a snapshot that doesn't make sense
    #[error("inconsistent snapshot: {0}")]
    InvalidSnapshot(String),
}
