//! Episode-level game logic.
//!
//! - [`TileSpawner`] - the random environment's tile source (seeded, reproducible)
//! - [`GameStats`] - score, move count and highest tile of one episode
//!
//! # Game Flow
//!
//! 1. Start from [`Board::EMPTY`](crate::Board::EMPTY) and spawn two tiles
//! 2. The player slides; an illegal slide is not allowed
//! 3. The environment spawns one tile into an empty cell
//! 4. Repeat until no slide can change the board
//!
//! # Example
//!
//! ```
//! use tdtile_engine::{Action, Board, GameStats, TileSpawner};
//!
//! let mut spawner = TileSpawner::with_seed(7);
//! let mut board = Board::EMPTY;
//! let mut stats = GameStats::new();
//! for _ in 0..2 {
//!     let placement = spawner.next_placement(&board).unwrap();
//!     placement.apply(&mut board).unwrap();
//! }
//!
//! while let Some(dir) = board.legal_directions().first().copied() {
//!     let reward = board.slide(dir).unwrap();
//!     stats.record_slide(reward, &board);
//!     let Some(placement) = spawner.next_placement(&board) else { break };
//!     placement.apply(&mut board).unwrap();
//! }
//! assert!(stats.moves() > 0);
//! ```

pub use self::{game_stats::*, tile_spawner::*};

mod game_stats;
mod tile_spawner;
