use std::cmp::Reverse;

use crate::{eval::Scorable, GameState, JointAction, Side};

use super::MinMaxReturn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How the children of a node are ordered before the search descends into them
pub enum MoveOrdering {
    /// Most promising child first for the side to move: highest heuristic utility at max nodes,
    /// lowest at min nodes. Children that were searched in a previous, shallower iteration go
    /// first, ordered by the score they got then
    BestFirst,
    /// Children are searched in the order the joint actions were generated
    Unordered,
}

impl MoveOrdering {
    pub(crate) fn order_children<ScorableType: Scorable + ?Sized>(
        &self,
        side: Side,
        children: Vec<(JointAction, GameState)>,
        score_function: &ScorableType,
        previous_return: Option<MinMaxReturn>,
    ) -> Vec<(JointAction, GameState, Option<MinMaxReturn>)> {
        let mut zipped = match previous_return {
            Some(MinMaxReturn::Node { mut options, .. }) => children
                .into_iter()
                .map(|(action, child)| {
                    let previous = options
                        .iter()
                        .position(|(a, _)| *a == action)
                        .map(|i| options.remove(i).1);
                    (action, child, previous)
                })
                .collect::<Vec<_>>(),
            _ => children
                .into_iter()
                .map(|(action, child)| (action, child, None))
                .collect(),
        };

        if matches!(self, MoveOrdering::Unordered) {
            return zipped;
        }

        // Both sorts are stable, so previous results take priority and the heuristic breaks
        // ties between children without one
        if side.is_maximizing() {
            zipped.sort_by_cached_key(|(_, child, _)| Reverse(child.utility_with(score_function)));
            zipped.sort_by_cached_key(|(_, _, previous)| {
                Reverse(previous.as_ref().map(|p| *p.score()))
            });
        } else {
            zipped.sort_by_cached_key(|(_, child, _)| child.utility_with(score_function));
            zipped.sort_by_cached_key(|(_, _, previous)| {
                (previous.is_none(), previous.as_ref().map(|p| *p.score()))
            });
        }

        zipped
    }
}
