use arrayvec::ArrayVec;
use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use crate::core::{
    action::Action,
    board::{Board, CELL_COUNT},
};

/// Probability that a spawned tile is a `2` (rank 1) rather than a `4` (rank 2).
pub const SMALL_TILE_PROBABILITY: f64 = 0.9;

/// Source of the environment's new tiles.
///
/// Each placement picks an empty cell uniformly at random and puts a `2` there with probability
/// [`SMALL_TILE_PROBABILITY`], a `4` otherwise.
///
/// The same seed always produces the same sequence of placements for the same boards, which
/// makes training runs reproducible.
///
/// # Example
///
/// ```
/// use tdtile_engine::{Board, TileSpawner};
///
/// let mut spawner1 = TileSpawner::with_seed(42);
/// let mut spawner2 = TileSpawner::with_seed(42);
/// assert_eq!(
///     spawner1.next_placement(&Board::EMPTY),
///     spawner2.next_placement(&Board::EMPTY),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TileSpawner {
    rng: Pcg32,
}

impl Default for TileSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSpawner {
    /// Creates a spawner seeded from the thread-local random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Creates a spawner with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Chooses the next tile placement, or `None` if the board has no empty cell.
    pub fn next_placement(&mut self, board: &Board) -> Option<Action> {
        let empty = board.empty_positions().collect::<ArrayVec<_, CELL_COUNT>>();
        let position = *empty.choose(&mut self.rng)?;
        let rank = if self.rng.random_bool(SMALL_TILE_PROBABILITY) {
            1
        } else {
            2
        };
        Some(Action::Place { position, rank })
    }
}
