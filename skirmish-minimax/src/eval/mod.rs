//! Scoring positions when the search runs out of depth
//!
//! Every position is scored from the controlled ([Side::Max](crate::Side::Max)) squad's point of
//! view. Wiped out squads short circuit to [LOSS_UTILITY] / [WIN_UTILITY]; everything else is a
//! weighted sum of independent terms, see [UtilityBreakdown].

use std::hash::{Hash, Hasher};

use decorum::N64;
use rustc_hash::FxHasher;

use crate::{Direction, GameState, Position, Side};

pub mod reachability;

/// Utility of a position where the controlled squad has been wiped out
pub const LOSS_UTILITY: f64 = -1_000_000.0;
/// Utility of a position where the opposing squad has been wiped out
pub const WIN_UTILITY: f64 = 1_000_000.0;

/// Default for [HeuristicWeights::controlled_unit]
pub const CONTROLLED_UNIT_WEIGHT: f64 = 100.0;
/// Default for [HeuristicWeights::opposing_unit]
pub const OPPOSING_UNIT_WEIGHT: f64 = -100.0;
/// Default for [HeuristicWeights::health]
pub const HEALTH_WEIGHT: f64 = 1.0;
/// Default for [HeuristicWeights::engaged_bonus]
pub const ENGAGED_BONUS: f64 = 20.0;
/// Default for [HeuristicWeights::chase_penalty]
pub const CHASE_PENALTY: f64 = -4.0;
/// Default for [HeuristicWeights::closing_penalty]
pub const CLOSING_PENALTY: f64 = -1.0;
/// Default for [HeuristicWeights::containment_bonus]
pub const CONTAINMENT_BONUS: f64 = 25.0;
/// Default for [HeuristicWeights::tie_break_scale]
pub const TIE_BREAK_SCALE: f64 = 0.01;

/// This trait is used to control something that can return a score from a position
///
/// Plain functions and closures of the right shape are scorable, which keeps custom scoring in
/// tests and tools cheap to write
pub trait Scorable {
    /// Score the given position, higher is better for the controlled squad
    fn score(&self, state: &GameState) -> N64;
}

impl<FnLike: Fn(&GameState) -> N64> Scorable for FnLike {
    fn score(&self, state: &GameState) -> N64 {
        (self)(state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// How much each term of the heuristic counts
///
/// Penalties are stored as negative numbers and are multiplied by a distance, so a weight of
/// `-4.0` costs four points per cell.
///
/// ```
/// use skirmish_minimax::eval::HeuristicWeights;
///
/// let weights = HeuristicWeights::default();
///
/// assert_eq!(weights.controlled_unit, 100.0);
/// assert_eq!(weights.opposing_unit, -100.0);
/// assert_eq!(weights.chase_penalty, -4.0);
/// ```
pub struct HeuristicWeights {
    /// Per living controlled unit
    pub controlled_unit: f64,
    /// Per living opposing unit
    pub opposing_unit: f64,
    /// Times the total controlled health minus the total opposing health
    pub health: f64,
    /// Per opposing unit that has a controlled unit right next to it
    pub engaged_bonus: f64,
    /// Per cell between an opposing unit and its nearest controlled unit, when not in contact
    pub chase_penalty: f64,
    /// Per cell between a controlled unit and its nearest opposing unit
    pub closing_penalty: f64,
    /// Per opposing unit pinned against a map edge, see [containment_count]
    pub containment_bonus: f64,
    /// Upper bound of the tie break jitter
    pub tie_break_scale: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            controlled_unit: CONTROLLED_UNIT_WEIGHT,
            opposing_unit: OPPOSING_UNIT_WEIGHT,
            health: HEALTH_WEIGHT,
            engaged_bonus: ENGAGED_BONUS,
            chase_penalty: CHASE_PENALTY,
            closing_penalty: CLOSING_PENALTY,
            containment_bonus: CONTAINMENT_BONUS,
            tie_break_scale: TIE_BREAK_SCALE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Whether equal positions are split by a small pseudo random jitter
pub enum TieBreak {
    /// No jitter. Utilities are exactly the sum of their terms, which is what tests want
    #[default]
    Disabled,
    /// Jitter derived from the seed and the contents of the position, so the same position
    /// always gets the same jitter within a search
    Seeded(u64),
}

impl TieBreak {
    /// A fresh random seed, for live play
    pub fn random() -> Self {
        TieBreak::Seeded(rand::random())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Each weighted term of a non terminal position, already multiplied by its weight
pub struct UtilityBreakdown {
    /// Living unit counts
    pub living: f64,
    /// Health difference between the squads
    pub health: f64,
    /// Opposing units in contact, or being chased
    pub engagement: f64,
    /// Controlled units closing the gap
    pub closing: f64,
    /// Opposing units pinned to an edge
    pub containment: f64,
}

impl UtilityBreakdown {
    /// Sum of every term
    pub fn total(&self) -> f64 {
        self.living + self.health + self.engagement + self.closing + self.containment
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// What the heuristic thinks of a position, before tie breaking
pub enum Evaluation {
    /// The controlled squad is gone
    Loss,
    /// The opposing squad is gone
    Win,
    /// Nobody has been wiped out yet
    Scored(UtilityBreakdown),
}

impl Evaluation {
    #[allow(missing_docs)]
    pub fn value(&self) -> f64 {
        match self {
            Evaluation::Loss => LOSS_UTILITY,
            Evaluation::Win => WIN_UTILITY,
            Evaluation::Scored(breakdown) => breakdown.total(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// The standard multi term heuristic
pub struct Heuristic {
    #[allow(missing_docs)]
    pub weights: HeuristicWeights,
    #[allow(missing_docs)]
    pub tie_break: TieBreak,
}

impl Heuristic {
    #[allow(missing_docs)]
    pub fn new(weights: HeuristicWeights, tie_break: TieBreak) -> Self {
        Self { weights, tie_break }
    }

    /// Score every term of `state` separately
    pub fn evaluate(&self, state: &GameState) -> Evaluation {
        if state.controlled().is_empty() {
            return Evaluation::Loss;
        }
        if state.opposing().is_empty() {
            return Evaluation::Win;
        }

        let w = &self.weights;
        let reachability = state.reachability();

        let living = w.controlled_unit * state.controlled().len() as f64
            + w.opposing_unit * state.opposing().len() as f64;

        let controlled_health: i32 = state.controlled().iter().map(|u| u.health).sum();
        let opposing_health: i32 = state.opposing().iter().map(|u| u.health).sum();
        let health = w.health * (controlled_health - opposing_health) as f64;

        let engagement: f64 = state
            .opposing()
            .iter()
            .map(|enemy| {
                let distance = reachability
                    .to_controlled(&enemy.position)
                    .map(|d| d as i32)
                    .unwrap_or_else(|| nearest_manhattan(&enemy.position, state, Side::Max));

                if distance <= 1 {
                    w.engaged_bonus
                } else {
                    w.chase_penalty * distance as f64
                }
            })
            .sum();

        let closing: f64 = state
            .controlled()
            .iter()
            .map(|unit| {
                let distance = reachability
                    .to_opposing(&unit.position)
                    .map(|d| d as i32)
                    .unwrap_or_else(|| nearest_manhattan(&unit.position, state, Side::Min));

                w.closing_penalty * distance as f64
            })
            .sum();

        let containment = w.containment_bonus * containment_count(state) as f64;

        Evaluation::Scored(UtilityBreakdown {
            living,
            health,
            engagement,
            closing,
            containment,
        })
    }

    /// Jitter in `[0, tie_break_scale)` for `state`, zero when tie breaking is disabled
    pub fn jitter(&self, state: &GameState) -> f64 {
        let seed = match self.tie_break {
            TieBreak::Disabled => return 0.0,
            TieBreak::Seeded(seed) => seed,
        };

        let mut hasher = FxHasher::default();
        seed.hash(&mut hasher);
        state.side_to_move().hash(&mut hasher);
        for unit in state.controlled().iter().chain(state.opposing()) {
            unit.hash(&mut hasher);
        }

        let unit_interval = (hasher.finish() >> 11) as f64 / (1u64 << 53) as f64;
        unit_interval * self.weights.tie_break_scale
    }
}

impl Scorable for Heuristic {
    fn score(&self, state: &GameState) -> N64 {
        let value = match self.evaluate(state) {
            Evaluation::Scored(breakdown) => breakdown.total() + self.jitter(state),
            terminal => terminal.value(),
        };

        N64::from(value)
    }
}

/// Manhattan distance from `p` to the closest unit of `side`. Only used for cells the
/// reachability fill could not reach, and only called on squads that are not empty
fn nearest_manhattan(p: &Position, state: &GameState, side: Side) -> i32 {
    state
        .squad(side)
        .iter()
        .map(|u| u.position.manhattan_distance(p))
        .min()
        .unwrap_or(0)
}

/// Count the opposing units pinned against a map edge
///
/// An opposing unit on an edge is pinned when the controlled squad holds a cell next to it
/// along that edge, and a cell on the second rank in from that edge, within one step of it
/// along the edge. A unit in a corner sits on two edges and can be pinned against each.
pub fn containment_count(state: &GameState) -> usize {
    let arena = state.arena();
    let held = |p: Position| state.is_occupied_by(Side::Max, &p);

    state
        .opposing()
        .iter()
        .map(|enemy| {
            let p = enemy.position;

            let edges = [
                (p.x == 0, Direction::Right),
                (p.x == arena.width() - 1, Direction::Left),
                (p.y == 0, Direction::Up),
                (p.y == arena.height() - 1, Direction::Down),
            ];

            edges
                .into_iter()
                .filter(|(on_edge, _)| *on_edge)
                .filter(|(_, inward)| {
                    let along = match inward {
                        Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
                        Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
                    };

                    let edge_rank = along.iter().any(|d| held(p.step(*d)));

                    let inner = p.step(*inward);
                    let second_rank =
                        held(inner) || along.iter().any(|d| held(inner.step(*d)));

                    edge_rank && second_rank
                })
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Arena, UnitId, UnitSnapshot};

    fn unit(id: u32, x: i32, y: i32, health: i32) -> UnitSnapshot {
        UnitSnapshot::new(UnitId(id), Position::new(x, y), health, 5, 1)
    }

    fn state(
        width: i32,
        height: i32,
        controlled: Vec<UnitSnapshot>,
        opposing: Vec<UnitSnapshot>,
    ) -> GameState {
        let arena = Arc::new(Arena::open(width, height).unwrap());
        GameState::new(arena, controlled, opposing, Side::Max).unwrap()
    }

    #[test]
    fn test_wiped_out_squads_short_circuit() {
        let heuristic = Heuristic::default();

        let lost = state(5, 5, vec![], vec![unit(9, 2, 2, 100)]);
        assert_eq!(heuristic.score(&lost), N64::from(LOSS_UTILITY));

        let won = state(5, 5, vec![unit(1, 2, 2, 1)], vec![]);
        assert_eq!(heuristic.score(&won), N64::from(WIN_UTILITY));

        // Even with jitter turned on
        let jittery = Heuristic::new(HeuristicWeights::default(), TieBreak::Seeded(7));
        assert_eq!(jittery.score(&won), N64::from(WIN_UTILITY));
        assert_eq!(jittery.score(&lost), N64::from(LOSS_UTILITY));
    }

    #[test]
    fn test_loss_wins_when_both_squads_are_empty() {
        let empty = state(3, 3, vec![], vec![]);

        assert_eq!(Heuristic::default().evaluate(&empty), Evaluation::Loss);
    }

    #[test]
    fn test_breakdown_of_open_field() {
        // Controlled at (0,0) and (4,0), opposing at (1,0) and (4,4)
        let s = state(
            5,
            5,
            vec![unit(1, 0, 0, 30), unit(2, 4, 0, 20)],
            vec![unit(8, 1, 0, 10), unit(9, 4, 4, 15)],
        );

        let Evaluation::Scored(breakdown) = Heuristic::default().evaluate(&s) else {
            panic!("expected a scored position");
        };

        assert_eq!(breakdown.living, 0.0);
        assert_eq!(breakdown.health, 25.0);
        // Unit 8 is in contact, unit 9 is four cells from unit 2
        assert_eq!(breakdown.engagement, ENGAGED_BONUS + CHASE_PENALTY * 4.0);
        // Unit 1 is one cell from 8, unit 2 is three cells from 8
        assert_eq!(breakdown.closing, CLOSING_PENALTY * 4.0);
        assert_eq!(breakdown.containment, 0.0);

        assert_eq!(
            Heuristic::default().score(&s),
            N64::from(breakdown.total())
        );
    }

    #[test]
    fn test_walls_lengthen_the_chase() {
        // ..m
        // ###.  <- a wall with a gap on the east side
        // M...
        let arena = Arc::new(
            Arena::with_obstacles(
                4,
                3,
                [Position::new(0, 1), Position::new(1, 1), Position::new(2, 1)],
            )
            .unwrap(),
        );
        let s = GameState::new(
            arena,
            vec![unit(1, 0, 0, 10)],
            vec![unit(9, 2, 2, 10)],
            Side::Max,
        )
        .unwrap();

        let Evaluation::Scored(breakdown) = Heuristic::default().evaluate(&s) else {
            panic!("expected a scored position");
        };

        // Manhattan says 4, walking around the wall takes 6
        assert_eq!(breakdown.engagement, CHASE_PENALTY * 6.0);
        assert_eq!(breakdown.closing, CLOSING_PENALTY * 6.0);
    }

    #[test]
    fn test_unreachable_units_fall_back_to_manhattan() {
        let arena = Arc::new(Arena::with_obstacles(3, 1, [Position::new(1, 0)]).unwrap());
        let s = GameState::new(
            arena,
            vec![unit(1, 0, 0, 10)],
            vec![unit(9, 2, 0, 10)],
            Side::Max,
        )
        .unwrap();

        let Evaluation::Scored(breakdown) = Heuristic::default().evaluate(&s) else {
            panic!("expected a scored position");
        };

        assert_eq!(breakdown.engagement, CHASE_PENALTY * 2.0);
    }

    #[test]
    fn test_east_edge_pin_counts_once() {
        // Opposing unit against the east edge of a 5x5 map, with one controlled unit beside it
        // on the edge and one directly inward on the second to last column
        let pinned = state(
            5,
            5,
            vec![unit(1, 4, 3, 10), unit(2, 3, 2, 10)],
            vec![unit(9, 4, 2, 10)],
        );

        assert_eq!(containment_count(&pinned), 1);

        let Evaluation::Scored(breakdown) = Heuristic::default().evaluate(&pinned) else {
            panic!("expected a scored position");
        };
        assert_eq!(breakdown.containment, CONTAINMENT_BONUS);
    }

    #[test]
    fn test_half_a_pin_is_not_a_pin() {
        let edge_only = state(5, 5, vec![unit(1, 4, 3, 10)], vec![unit(9, 4, 2, 10)]);
        assert_eq!(containment_count(&edge_only), 0);

        let inward_only = state(5, 5, vec![unit(2, 3, 2, 10)], vec![unit(9, 4, 2, 10)]);
        assert_eq!(containment_count(&inward_only), 0);

        let away_from_edge = state(
            5,
            5,
            vec![unit(1, 3, 3, 10), unit(2, 2, 2, 10)],
            vec![unit(9, 3, 2, 10)],
        );
        assert_eq!(containment_count(&away_from_edge), 0);
    }

    #[test]
    fn test_corner_can_be_pinned_on_both_edges() {
        // Opposing unit in the south-west corner. (1,0) sits on the south edge beside it and is
        // the inward cell for the west edge; (0,1) is the reverse
        let cornered = state(
            4,
            4,
            vec![unit(1, 1, 0, 10), unit(2, 0, 1, 10)],
            vec![unit(9, 0, 0, 10)],
        );

        assert_eq!(containment_count(&cornered), 2);
    }

    #[test]
    fn test_jitter_is_bounded_and_stable() {
        let s = state(5, 5, vec![unit(1, 0, 0, 30)], vec![unit(9, 4, 4, 30)]);

        assert_eq!(Heuristic::default().jitter(&s), 0.0);

        let seeded = Heuristic::new(HeuristicWeights::default(), TieBreak::Seeded(42));
        let j = seeded.jitter(&s);
        assert!((0.0..TIE_BREAK_SCALE).contains(&j));
        assert_eq!(j, seeded.jitter(&s));

        let base = Heuristic::default().score(&s);
        let jittered = seeded.score(&s);
        assert!(jittered >= base);
        assert!(jittered < base + N64::from(TIE_BREAK_SCALE));
    }
}
