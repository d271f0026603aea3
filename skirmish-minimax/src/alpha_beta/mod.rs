//! Two player minimax with alpha-beta pruning over squad positions
//!
//! The controlled squad is the maximizing side and the opposing squad the minimizing one. Every
//! node is scored from the controlled squad's point of view. Roles are read off each node's
//! [GameState::side_to_move], which flips on every transition, so they alternate one-for-one with
//! depth and the root plays whichever side the search was started for.
//!
//! ```rust
//! use std::sync::Arc;
//! use skirmish_minimax::{
//!     alpha_beta::{MinimaxSquad, SearchOptions},
//!     eval::HeuristicWeights,
//!     Action, Arena, GameState, Position, Side, UnitId, UnitSnapshot,
//! };
//!
//! let arena = Arc::new(Arena::open(3, 3).unwrap());
//! let root = GameState::new(
//!     arena,
//!     vec![UnitSnapshot::new(UnitId(1), Position::new(1, 0), 10, 10, 1)],
//!     vec![UnitSnapshot::new(UnitId(2), Position::new(1, 1), 10, 10, 1)],
//!     Side::Max,
//! )
//! .unwrap();
//!
//! let squad = MinimaxSquad::with_heuristic(
//!     root,
//!     HeuristicWeights::default(),
//!     "doc_squad",
//!     SearchOptions::diagnostic(2),
//! );
//!
//! let chosen = squad.choose_action().unwrap().unwrap();
//! assert_eq!(chosen.get(UnitId(1)), Some(Action::Attack(UnitId(2))));
//! ```

use std::cmp::{max, min, Reverse};

use decorum::{Infinite, N64};
use derivative::Derivative;
use tracing::{debug, info, info_span};

use crate::{
    eval::{Heuristic, HeuristicWeights, Scorable},
    GameState, JointAction, SearchError, Side,
};

mod minimax_return;
pub use minimax_return::MinMaxReturn;

mod move_ordering;
pub use move_ordering::MoveOrdering;

mod options;
use options::Budget;
pub use options::{SearchOptions, DEFAULT_DEPTH};

#[derive(Debug, Clone)]
/// Everything a finished search reports back
pub struct SearchOutcome {
    /// The searched tree. Its first option is the chosen joint action
    pub result: MinMaxReturn,
    /// Depth the returned tree was searched to
    pub depth: usize,
    /// How many nodes were expanded, across every iteration for a deepened search
    pub nodes: usize,
    /// Whether the node or time budget cut the search short
    pub truncated: bool,
}

impl SearchOutcome {
    /// The joint action to play, `None` when the root had nothing to choose from
    pub fn best_action(&self) -> Option<&JointAction> {
        self.result.best_action()
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
/// This is the struct that wraps a root position and a scoring function and can be used to run
/// the search
///
/// It also outputs traces using the [tracing] crate.
pub struct MinimaxSquad<ScorableType: Scorable> {
    /// The position the search starts from
    pub root: GameState,
    #[derivative(Debug = "ignore")]
    score_function: ScorableType,
    /// Shows up in the tracing spans, handy when several squads are searching
    pub name: &'static str,
    options: SearchOptions,
}

impl MinimaxSquad<Heuristic> {
    /// Construct a squad scored by the standard [Heuristic], with the tie breaking taken from
    /// `options`
    pub fn with_heuristic(
        root: GameState,
        weights: HeuristicWeights,
        name: &'static str,
        options: SearchOptions,
    ) -> Self {
        let heuristic = Heuristic::new(weights, options.tie_break);

        Self::new(root, heuristic, name, options)
    }
}

impl<ScorableType: Scorable> MinimaxSquad<ScorableType> {
    #[allow(missing_docs)]
    pub fn new(
        root: GameState,
        score_function: ScorableType,
        name: &'static str,
        options: SearchOptions,
    ) -> Self {
        Self {
            root,
            score_function,
            name,
            options,
        }
    }

    #[allow(missing_docs)]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Pick the joint action for the root's side to move
    ///
    /// Uses [MinimaxSquad::deepened_search] when a budget is configured, so running out of
    /// budget still leaves a complete shallower answer, and a single [MinimaxSquad::search]
    /// otherwise. `None` means there is nothing to do this turn.
    pub fn choose_action(&self) -> Result<Option<JointAction>, SearchError> {
        let has_budget = self.options.node_budget.is_some() || self.options.time_budget.is_some();

        let outcome = if has_budget {
            self.deepened_search()?
        } else {
            self.search()?
        };

        info!(
            squad = self.name,
            depth = outcome.depth,
            nodes = outcome.nodes,
            truncated = outcome.truncated,
            "chose action"
        );

        Ok(outcome.best_action().cloned())
    }

    /// Run a single alpha-beta search from the root to the configured depth
    pub fn search(&self) -> Result<SearchOutcome, SearchError> {
        self.check_depth()?;

        info_span!(
            "alpha_beta",
            squad = self.name,
            depth = self.options.depth,
            chosen_score = tracing::field::Empty,
            nodes = tracing::field::Empty,
            truncated = tracing::field::Empty,
        )
        .in_scope(|| {
            let mut budget = Budget::new(&self.options);
            let result = self.alpha_beta_inner(
                &self.root,
                self.options.depth,
                N64::NEG_INFINITY,
                N64::INFINITY,
                None,
                &mut budget,
            )?;

            let current_span = tracing::Span::current();
            current_span.record("chosen_score", result.score().into_inner());
            current_span.record("nodes", budget.nodes);
            current_span.record("truncated", budget.truncated);

            Ok(SearchOutcome {
                result,
                depth: self.options.depth,
                nodes: budget.nodes,
                truncated: budget.truncated,
            })
        })
    }

    /// Search depth 1, then 2, up to the configured depth
    ///
    /// Each iteration hands its tree to the next as a move ordering hint, so the children that
    /// looked best last time are searched first. The node and time budget are shared by every
    /// iteration. When an iteration is cut short it is thrown away and the deepest complete one
    /// is returned instead, unless even the first iteration was cut short.
    pub fn deepened_search(&self) -> Result<SearchOutcome, SearchError> {
        self.check_depth()?;

        info_span!(
            "deepened_alpha_beta",
            squad = self.name,
            max_depth = self.options.depth,
            chosen_score = tracing::field::Empty,
            depth = tracing::field::Empty,
            nodes = tracing::field::Empty,
            truncated = tracing::field::Empty,
        )
        .in_scope(|| {
            let mut budget = Budget::new(&self.options);
            let mut best: Option<(usize, MinMaxReturn)> = None;
            let mut previous_return = None;

            for depth in 1..=self.options.depth {
                let result = self.alpha_beta_inner(
                    &self.root,
                    depth,
                    N64::NEG_INFINITY,
                    N64::INFINITY,
                    previous_return.take(),
                    &mut budget,
                )?;

                if budget.truncated {
                    debug!(depth, nodes = budget.nodes, "budget ran out mid iteration");
                    if best.is_none() {
                        best = Some((depth, result));
                    }
                    break;
                }

                previous_return = Some(result.clone());
                best = Some((depth, result));
            }

            let (depth, result) = best.ok_or(SearchError::InvalidDepth(self.options.depth))?;

            let current_span = tracing::Span::current();
            current_span.record("chosen_score", result.score().into_inner());
            current_span.record("depth", depth);
            current_span.record("nodes", budget.nodes);
            current_span.record("truncated", budget.truncated);

            Ok(SearchOutcome {
                result,
                depth,
                nodes: budget.nodes,
                truncated: budget.truncated,
            })
        })
    }

    /// One alpha-beta pass from `node`, with `alpha` and `beta` as the starting window
    ///
    /// At `depth_remaining == 0` the node itself comes back as a leaf. Nodes with no joint
    /// action to choose from, and positions where a squad has been wiped out, are treated the
    /// same way.
    pub fn alpha_beta(
        &self,
        node: &GameState,
        depth_remaining: usize,
        alpha: N64,
        beta: N64,
    ) -> Result<MinMaxReturn, SearchError> {
        let mut budget = Budget::new(&self.options);

        self.alpha_beta_inner(node, depth_remaining, alpha, beta, None, &mut budget)
    }

    fn alpha_beta_inner(
        &self,
        node: &GameState,
        depth_remaining: usize,
        mut alpha: N64,
        mut beta: N64,
        previous_return: Option<MinMaxReturn>,
        budget: &mut Budget,
    ) -> Result<MinMaxReturn, SearchError> {
        if depth_remaining == 0 || node.is_terminal() || !budget.visit() {
            return Ok(self.leaf(node));
        }

        let successors = node.successors()?;
        if successors.is_empty() {
            return Ok(self.leaf(node));
        }

        let side = node.side_to_move();
        let ordered = self.options.move_ordering.order_children(
            side,
            successors,
            &self.score_function,
            previous_return,
        );

        let total = ordered.len();
        let mut options: Vec<(JointAction, MinMaxReturn)> = Vec::with_capacity(total);
        let mut alpha_beta_cutoff = false;

        for (action, child, previous) in ordered {
            let result =
                self.alpha_beta_inner(&child, depth_remaining - 1, alpha, beta, previous, budget)?;
            let value = *result.score();
            options.push((action, result));

            if side.is_maximizing() {
                alpha = max(alpha, value);
            } else {
                beta = min(beta, value);
            }

            if beta <= alpha {
                alpha_beta_cutoff = options.len() < total;
                break;
            }
        }

        Ok(self.node(node, side, options, alpha_beta_cutoff))
    }

    /// Plain minimax to `depth`, with no pruning, no budget and children in generation order
    ///
    /// Far slower than [MinimaxSquad::search], it exists to check the pruned search against
    pub fn full_minimax(&self, depth: usize) -> Result<MinMaxReturn, SearchError> {
        self.full_minimax_inner(&self.root, depth)
    }

    fn full_minimax_inner(
        &self,
        node: &GameState,
        depth_remaining: usize,
    ) -> Result<MinMaxReturn, SearchError> {
        if depth_remaining == 0 || node.is_terminal() {
            return Ok(self.leaf(node));
        }

        let successors = node.successors()?;
        if successors.is_empty() {
            return Ok(self.leaf(node));
        }

        let options = successors
            .into_iter()
            .map(|(action, child)| {
                let result = self.full_minimax_inner(&child, depth_remaining - 1)?;
                Ok((action, result))
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        Ok(self.node(node, node.side_to_move(), options, false))
    }

    fn leaf(&self, node: &GameState) -> MinMaxReturn {
        MinMaxReturn::Leaf {
            score: node.utility_with(&self.score_function),
        }
    }

    /// Sort the searched options best first for `side` and wrap them up. The sort is stable so
    /// equal scores keep the order they were searched in
    fn node(
        &self,
        node: &GameState,
        side: Side,
        mut options: Vec<(JointAction, MinMaxReturn)>,
        alpha_beta_cutoff: bool,
    ) -> MinMaxReturn {
        if side.is_maximizing() {
            options.sort_by_key(|(_, result)| Reverse(*result.score()));
        } else {
            options.sort_by_key(|(_, result)| *result.score());
        }

        let score = match options.first() {
            Some((_, result)) => *result.score(),
            None => node.utility_with(&self.score_function),
        };

        MinMaxReturn::Node {
            side,
            options,
            score,
            alpha_beta_cutoff,
        }
    }

    fn check_depth(&self) -> Result<(), SearchError> {
        if self.options.depth == 0 {
            return Err(SearchError::InvalidDepth(self.options.depth));
        }

        Ok(())
    }
}
