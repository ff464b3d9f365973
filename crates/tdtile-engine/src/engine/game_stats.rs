use serde::{Deserialize, Serialize};

use crate::core::board::Board;

/// Statistics of one episode.
///
/// - **Score**: sum of all slide rewards (merged tile values)
/// - **Moves**: number of legal slides made by the player
/// - **Max rank**: highest tile rank seen on the board
///
/// # Example
///
/// ```
/// use tdtile_engine::{Board, Direction, GameStats};
///
/// let mut board = Board::from_rows([
///     [1, 1, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
/// ]);
/// let mut stats = GameStats::new();
/// let reward = board.slide(Direction::Left).unwrap();
/// stats.record_slide(reward, &board);
///
/// assert_eq!(stats.score(), 4);
/// assert_eq!(stats.moves(), 1);
/// assert_eq!(stats.max_rank(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    moves: usize,
    max_rank: u8,
}

impl GameStats {
    /// Creates a new statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            moves: 0,
            max_rank: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub const fn max_rank(&self) -> u8 {
        self.max_rank
    }

    /// Updates the statistics after a legal slide.
    ///
    /// # Arguments
    ///
    /// * `reward` - Reward returned by the slide
    /// * `after` - Board right after the slide
    pub fn record_slide(&mut self, reward: u32, after: &Board) {
        self.score += u64::from(reward);
        self.moves += 1;
        self.max_rank = self.max_rank.max(after.max_rank());
    }

    /// Updates the highest rank without counting a move (used for spawned tiles).
    pub fn observe(&mut self, board: &Board) {
        self.max_rank = self.max_rank.max(board.max_rank());
    }
}
