use decorum::N64;
use text_trees::StringTreeNode;

use crate::{JointAction, Side};

#[derive(Debug, Clone, PartialEq)]
/// This is returned from a run of the alpha-beta search
/// It contains all the information we generated about the game tree
pub enum MinMaxReturn {
    /// A node whose children were searched
    Node {
        /// Which side chose the joint action at this node
        side: Side,
        /// Every child we looked at, keyed by the joint action leading to it
        ///
        /// Sorted best first for `side`, so the first element is always the chosen one and its
        /// [MinMaxReturn::score] equals the score of this node. Ties keep search order.
        options: Vec<(JointAction, Self)>,
        /// The chosen score
        score: N64,
        /// Whether the remaining children were skipped by an alpha-beta cutoff
        alpha_beta_cutoff: bool,
    },
    /// A position that was scored directly
    /// This happens at the depth limit, on positions with no joint actions, and when the search
    /// budget ran out before the node could be expanded
    Leaf {
        #[allow(missing_docs)]
        score: N64,
    },
}

impl MinMaxReturn {
    /// Returns the score for this node
    pub fn score(&self) -> &N64 {
        match self {
            MinMaxReturn::Node { score, .. } => score,
            MinMaxReturn::Leaf { score } => score,
        }
    }

    /// The joint action chosen at this node, `None` for a leaf
    pub fn best_action(&self) -> Option<&JointAction> {
        match self {
            MinMaxReturn::Leaf { .. } => None,
            MinMaxReturn::Node { options, .. } => options.first().map(|(action, _)| action),
        }
    }

    /// Every joint action on the principal line, with the side that chose it
    ///
    /// Useful for debugging, it shows what the search expects both squads to do
    pub fn chosen_route(&self) -> Vec<(Side, JointAction)> {
        let mut route = vec![];
        let mut current = self;

        while let MinMaxReturn::Node { side, options, .. } = current {
            match options.first() {
                Some((action, next)) => {
                    route.push((*side, action.clone()));
                    current = next;
                }
                None => break,
            }
        }

        route
    }

    /// How many nodes, leaves included, are in this tree
    pub fn node_count(&self) -> usize {
        match self {
            MinMaxReturn::Leaf { .. } => 1,
            MinMaxReturn::Node { options, .. } => {
                1 + options.iter().map(|(_, r)| r.node_count()).sum::<usize>()
            }
        }
    }

    /// This returns a visual representation of the game tree the search generated
    /// It shows the chosen score, the moving side and the joint action at each level
    pub fn to_text_tree(&self) -> Option<String> {
        let tree_node = self.to_text_tree_node("".to_owned())?;
        Some(format!("{}", tree_node))
    }

    fn to_text_tree_node(&self, label: String) -> Option<StringTreeNode> {
        match self {
            MinMaxReturn::Leaf { .. } => None,
            MinMaxReturn::Node {
                side,
                options,
                score,
                alpha_beta_cutoff,
            } => {
                let cutoff = if *alpha_beta_cutoff { " (cutoff)" } else { "" };
                let mut node =
                    StringTreeNode::new(format!("{label} {}{cutoff}", score.into_inner()));
                for (action, result) in options {
                    match result.to_text_tree_node(format!("{side} {action}")) {
                        Some(next_node) => node.push_node(next_node),
                        None => {
                            node.push(format!("{side} {action} {}", result.score().into_inner()))
                        }
                    }
                }

                Some(node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Direction, UnitId};

    fn leaf(score: f64) -> MinMaxReturn {
        MinMaxReturn::Leaf {
            score: N64::from(score),
        }
    }

    fn action(unit: u32, direction: Direction) -> JointAction {
        JointAction::new(vec![(UnitId(unit), Action::Move(direction))])
    }

    fn sample() -> MinMaxReturn {
        MinMaxReturn::Node {
            side: Side::Max,
            options: vec![
                (
                    action(1, Direction::Up),
                    MinMaxReturn::Node {
                        side: Side::Min,
                        options: vec![(action(9, Direction::Left), leaf(3.0))],
                        score: N64::from(3.0),
                        alpha_beta_cutoff: false,
                    },
                ),
                (action(1, Direction::Down), leaf(-2.0)),
            ],
            score: N64::from(3.0),
            alpha_beta_cutoff: false,
        }
    }

    #[test]
    fn test_best_action_and_route() {
        let tree = sample();

        assert_eq!(tree.best_action(), Some(&action(1, Direction::Up)));
        assert_eq!(
            tree.chosen_route(),
            vec![
                (Side::Max, action(1, Direction::Up)),
                (Side::Min, action(9, Direction::Left)),
            ]
        );
        assert_eq!(tree.node_count(), 4);
        assert_eq!(leaf(1.0).best_action(), None);
        assert!(leaf(1.0).chosen_route().is_empty());
    }

    #[test]
    fn test_text_tree_mentions_every_option() {
        let text = sample().to_text_tree().unwrap();

        assert!(text.contains("max [#1 move up]"));
        assert!(text.contains("min [#9 move left]"));
        assert!(text.contains("max [#1 move down] -2"));
        assert_eq!(leaf(0.0).to_text_tree(), None);
    }
}
