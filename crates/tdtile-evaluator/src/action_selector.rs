//! One-ply move selection.
//!
//! For each direction in [`Direction::ALL`] order (up, right, down, left), the selector slides a
//! copy of the board, skips the direction if nothing moved, and scores the result as
//!
//! ```text
//! score = evaluate(after) + reward
//! ```
//!
//! The first legal direction initializes the best candidate and a later direction replaces it
//! only with a strictly greater score, so ties go to the direction listed first.
//!
//! The selector is greedy: it never looks past the board produced by the player's own slide,
//! and the random tile that follows is accounted for only through the learned value.

use tdtile_engine::{Board, Direction};

use crate::tuple_network::BoardEvaluator;

/// The chosen slide together with the board and reward it produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSelection {
    direction: Direction,
    after: Board,
    reward: u32,
    score: f32,
}

impl MoveSelection {
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Board right after the slide, before any new tile appears.
    #[must_use]
    pub fn after(&self) -> &Board {
        &self.after
    }

    #[must_use]
    pub fn reward(&self) -> u32 {
        self.reward
    }

    /// `evaluate(after) + reward`.
    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }
}

/// Picks the slide with the best one-ply score.
///
/// # Example
///
/// ```
/// use tdtile_engine::{Board, Direction};
/// use tdtile_evaluator::{action_selector::ActionSelector, tuple_network::TupleNetwork};
///
/// let network = TupleNetwork::new(4);
/// let board = Board::from_rows([
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
///     [1, 1, 0, 0],
/// ]);
/// let selection = ActionSelector::new(&network).select(&board).unwrap();
/// // With an untrained network only the reward matters: merging pays 4.
/// assert_eq!(selection.direction(), Direction::Right);
/// assert_eq!(selection.reward(), 4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ActionSelector<'a> {
    evaluator: &'a dyn BoardEvaluator,
}

impl<'a> ActionSelector<'a> {
    #[must_use]
    pub fn new(evaluator: &'a dyn BoardEvaluator) -> Self {
        Self { evaluator }
    }

    /// Selects the best slide for `board`.
    ///
    /// Returns `None` if no slide changes the board, i.e. the episode is over.
    #[must_use]
    pub fn select(&self, board: &Board) -> Option<MoveSelection> {
        let mut best: Option<MoveSelection> = None;
        for direction in Direction::ALL {
            let Ok((after, reward)) = board.slided(direction) else {
                continue;
            };
            #[expect(clippy::cast_precision_loss)]
            let score = self.evaluator.evaluate(&after) + reward as f32;
            if best.is_none_or(|best| score > best.score) {
                best = Some(MoveSelection {
                    direction,
                    after,
                    reward,
                    score,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::tuple_network::TupleNetwork;

    /// Evaluator with fixed values for some boards and `default` for the rest.
    #[derive(Debug, Default)]
    struct FixedEvaluator {
        values: HashMap<Board, f32>,
        default: f32,
    }

    impl BoardEvaluator for FixedEvaluator {
        fn evaluate(&self, board: &Board) -> f32 {
            self.values.get(board).copied().unwrap_or(self.default)
        }
    }

    fn single_tile_board() -> Board {
        Board::from_rows([[0, 0, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])
    }

    #[test]
    fn test_ties_go_to_first_direction() {
        let evaluator = FixedEvaluator::default();
        let selection = ActionSelector::new(&evaluator)
            .select(&single_tile_board())
            .unwrap();
        assert_eq!(selection.direction(), Direction::Up);
        assert_eq!(selection.reward(), 0);
    }

    #[test]
    fn test_tie_between_later_directions() {
        let board = single_tile_board();
        let mut evaluator = FixedEvaluator {
            default: -5.0,
            ..FixedEvaluator::default()
        };
        for dir in [Direction::Down, Direction::Left] {
            evaluator.values.insert(board.slided(dir).unwrap().0, 3.0);
        }
        let selection = ActionSelector::new(&evaluator).select(&board).unwrap();
        assert_eq!(selection.direction(), Direction::Down);
        assert_eq!(selection.score(), 3.0);
    }

    #[test]
    fn test_highest_score_wins() {
        let board = single_tile_board();
        let mut evaluator = FixedEvaluator::default();
        let (left, _) = board.slided(Direction::Left).unwrap();
        evaluator.values.insert(left, 10.0);
        let selection = ActionSelector::new(&evaluator).select(&board).unwrap();
        assert_eq!(selection.direction(), Direction::Left);
        assert_eq!(selection.after(), &left);
        assert_eq!(selection.score(), 10.0);
    }

    #[test]
    fn test_reward_is_added_to_value() {
        let board = Board::from_rows([[1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let mut evaluator = FixedEvaluator::default();
        // Down keeps the pair and is valued 3.5. Merging right pays 4 and comes before left.
        evaluator
            .values
            .insert(board.slided(Direction::Down).unwrap().0, 3.5);
        let selection = ActionSelector::new(&evaluator).select(&board).unwrap();
        assert_eq!(selection.direction(), Direction::Right);
        assert_eq!(selection.reward(), 4);
        assert_eq!(selection.score(), 4.0);
    }

    #[test]
    fn test_single_legal_move_is_chosen_regardless_of_score() {
        let board = Board::from_rows([[0, 1, 2, 1], [0, 2, 1, 2], [0, 1, 2, 1], [0, 2, 1, 2]]);
        let evaluator = FixedEvaluator {
            default: -1.0e9,
            ..FixedEvaluator::default()
        };
        let selection = ActionSelector::new(&evaluator).select(&board).unwrap();
        assert_eq!(selection.direction(), Direction::Left);
        assert_eq!(selection.reward(), 0);
        assert_eq!(selection.after().rank(0, 0), 1);
    }

    #[test]
    fn test_no_legal_move() {
        let board = Board::from_rows([[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]]);
        let network = TupleNetwork::new(3);
        assert!(ActionSelector::new(&network).select(&board).is_none());
    }

    #[test]
    fn test_selection_with_network() {
        let board = single_tile_board();
        let mut network = TupleNetwork::new(3);
        let (down, _) = board.slided(Direction::Down).unwrap();
        let features = network.features(&down);
        network.update(&features, 1.0);
        let selection = ActionSelector::new(&network).select(&board).unwrap();
        assert_eq!(selection.direction(), Direction::Down);
        assert_eq!(selection.score(), network.value(&down));
    }
}
