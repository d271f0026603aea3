use std::time::{Duration, Instant};

use crate::eval::TieBreak;

use super::move_ordering::MoveOrdering;

/// Depth used by [SearchOptions::default]
pub const DEFAULT_DEPTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Optional properties that can be defined for a [MinimaxSquad](super::MinimaxSquad)
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use skirmish_minimax::{alpha_beta::{MoveOrdering, SearchOptions}, eval::TieBreak};
///
/// let defaults: SearchOptions = Default::default();
///
/// assert_eq!(defaults.depth, 2);
/// assert_eq!(defaults.move_ordering, MoveOrdering::BestFirst);
/// assert_eq!(defaults.tie_break, TieBreak::Disabled);
/// assert_eq!(defaults.node_budget, None);
/// assert_eq!(defaults.time_budget, None);
/// ```
pub struct SearchOptions {
    /// How many plies to look ahead. Each ply is one side's joint action, so a depth of 2 is one
    /// move for us and one reply from the opposing squad
    pub depth: usize,
    /// How children are ordered before they are searched
    pub move_ordering: MoveOrdering,
    /// Whether the heuristic adds tie break jitter
    pub tie_break: TieBreak,
    /// Stop expanding nodes after this many have been expanded
    pub node_budget: Option<usize>,
    /// Stop expanding new nodes once this much wall clock time has passed
    pub time_budget: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            move_ordering: MoveOrdering::BestFirst,
            tie_break: TieBreak::Disabled,
            node_budget: None,
            time_budget: None,
        }
    }
}

impl SearchOptions {
    /// Deterministic settings for tooling and tests. Tie breaking is off
    pub fn diagnostic(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Settings for live play. Ties are split with a freshly seeded jitter
    pub fn live(depth: usize) -> Self {
        Self {
            depth,
            tie_break: TieBreak::random(),
            ..Default::default()
        }
    }
}

/// Tracks how much of the node and time budget a search has used
#[derive(Debug)]
pub(crate) struct Budget {
    node_budget: Option<usize>,
    deadline: Option<Instant>,
    pub(crate) nodes: usize,
    pub(crate) truncated: bool,
}

impl Budget {
    pub(crate) fn new(options: &SearchOptions) -> Self {
        Self {
            node_budget: options.node_budget,
            deadline: options.time_budget.map(|d| Instant::now() + d),
            nodes: 0,
            truncated: false,
        }
    }

    /// Count an expansion. Returns false, and marks the search truncated, once the budget is
    /// spent. The first expansion is always allowed so a search can at least look at its root
    pub(crate) fn visit(&mut self) -> bool {
        if self.nodes > 0 {
            let out_of_nodes = self.node_budget.map_or(false, |n| self.nodes >= n);
            let out_of_time = self.deadline.map_or(false, |d| Instant::now() >= d);

            if out_of_nodes || out_of_time {
                self.truncated = true;
                return false;
            }
        }

        self.nodes += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_budget() {
        let options = SearchOptions {
            node_budget: Some(3),
            ..Default::default()
        };
        let mut budget = Budget::new(&options);

        assert!(budget.visit());
        assert!(budget.visit());
        assert!(budget.visit());
        assert!(!budget.truncated);
        assert!(!budget.visit());
        assert!(budget.truncated);
        assert_eq!(budget.nodes, 3);
    }

    #[test]
    fn test_root_survives_an_empty_budget() {
        let options = SearchOptions {
            node_budget: Some(0),
            time_budget: Some(Duration::ZERO),
            ..Default::default()
        };
        let mut budget = Budget::new(&options);

        assert!(budget.visit());
        assert!(!budget.visit());
    }

    #[test]
    fn test_no_budget_never_truncates() {
        let mut budget = Budget::new(&SearchOptions::default());

        for _ in 0..10_000 {
            assert!(budget.visit());
        }
        assert!(!budget.truncated);
    }

    #[test]
    fn test_presets() {
        assert_eq!(SearchOptions::diagnostic(4).depth, 4);
        assert_eq!(SearchOptions::diagnostic(4).tie_break, TieBreak::Disabled);
        assert!(matches!(
            SearchOptions::live(3).tie_break,
            TieBreak::Seeded(_)
        ));
    }
}
