use std::{array, fmt, iter};

use arrayvec::ArrayVec;

use crate::{CellOccupiedError, NoTileMovedError, core::action::Direction};

/// Number of rows (and columns) of the board.
pub const BOARD_SIZE: usize = 4;

/// Number of cells of the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Largest tile rank. Its value `2^31` is the largest power of two that fits in `u32`.
///
/// Two tiles of this rank do not merge.
pub const MAX_TILE_RANK: u8 = 31;

/// Returns the face value of a tile of the given rank (`0` for an empty cell).
///
/// Ranks above [`MAX_TILE_RANK`] saturate at `u32::MAX`.
///
/// ```
/// use tdtile_engine::tile_value;
///
/// assert_eq!(tile_value(0), 0);
/// assert_eq!(tile_value(1), 2);
/// assert_eq!(tile_value(11), 2048);
/// ```
#[must_use]
pub const fn tile_value(rank: u8) -> u32 {
    match rank {
        0 => 0,
        1..=MAX_TILE_RANK => 1 << rank,
        _ => u32::MAX,
    }
}

/// 4×4 board of tile ranks.
///
/// Cells are stored in row-major order, so position `p` is at row `p / 4` and column `p % 4`.
/// Rank `0` is an empty cell, rank `k` is a tile of value `2^k`.
///
/// # Sliding
///
/// [`Board::slide`] moves every tile towards one edge. Along each line, tiles are compacted
/// towards the edge and two equal neighbours merge into a tile of the next rank. Merging starts
/// from the edge side and each tile merges at most once per move, so `[2, 2, 2, 2]` slid left
/// becomes `[4, 4, _, _]`, not `[8, _, _, _]`. The reward of a slide is the sum of the values of
/// the merged tiles.
///
/// A slide that leaves the board unchanged is illegal and reported as [`NoTileMovedError`].
///
/// # Example
///
/// ```
/// use tdtile_engine::{Board, Direction};
///
/// let mut board = Board::from_rows([
///     [1, 1, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 2],
///     [0, 0, 0, 0],
/// ]);
/// assert_eq!(board.slide(Direction::Left), Ok(4));
/// assert_eq!(board.rank(0, 0), 2);
/// assert_eq!(board.rank(2, 0), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [u8; CELL_COUNT],
}

impl Board {
    pub const EMPTY: Self = Self {
        cells: [0; CELL_COUNT],
    };

    /// Creates a board from row-major ranks.
    #[must_use]
    pub const fn from_ranks(cells: [u8; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Creates a board from rows of ranks.
    #[must_use]
    pub fn from_rows(rows: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self {
            cells: array::from_fn(|pos| rows[pos / BOARD_SIZE][pos % BOARD_SIZE]),
        }
    }

    /// Returns all ranks in row-major order.
    #[must_use]
    pub const fn ranks(&self) -> &[u8; CELL_COUNT] {
        &self.cells
    }

    /// Returns the rank at the given row and column.
    #[inline]
    #[must_use]
    pub fn rank(&self, row: usize, col: usize) -> u8 {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        self.cells[row * BOARD_SIZE + col]
    }

    /// Returns the rank at the given row-major position.
    #[inline]
    #[must_use]
    pub fn rank_at(&self, position: usize) -> u8 {
        self.cells[position]
    }

    /// Puts a tile of `rank` into an empty cell.
    pub fn place(&mut self, position: usize, rank: u8) -> Result<(), CellOccupiedError> {
        if self.cells[position] != 0 {
            return Err(CellOccupiedError { position });
        }
        self.cells[position] = rank;
        Ok(())
    }

    /// Iterates over the positions of the empty cells, in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, rank)| **rank == 0)
            .map(|(pos, _)| pos)
    }

    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|rank| **rank == 0).count()
    }

    /// Returns the highest rank on the board (`0` for an empty board).
    #[must_use]
    pub fn max_rank(&self) -> u8 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Slides all tiles towards `direction`, merging equal neighbours.
    ///
    /// Returns the reward (sum of merged tile values). The board is left untouched when the
    /// slide is illegal.
    pub fn slide(&mut self, direction: Direction) -> Result<u32, NoTileMovedError> {
        let mut reward = 0;
        let mut moved = false;
        for line in 0..BOARD_SIZE {
            let positions = line_positions(direction, line);
            let mut ranks = positions.map(|pos| self.cells[pos]);
            reward = u32::saturating_add(reward, merge_line(&mut ranks));
            for (pos, rank) in iter::zip(positions, ranks) {
                if self.cells[pos] != rank {
                    self.cells[pos] = rank;
                    moved = true;
                }
            }
        }
        if !moved {
            return Err(NoTileMovedError);
        }
        Ok(reward)
    }

    /// Like [`Self::slide`], but on a copy of the board.
    pub fn slided(&self, direction: Direction) -> Result<(Self, u32), NoTileMovedError> {
        let mut after = *self;
        let reward = after.slide(direction)?;
        Ok((after, reward))
    }

    /// Returns the directions whose slide changes the board, in [`Direction::ALL`] order.
    #[must_use]
    pub fn legal_directions(&self) -> ArrayVec<Direction, 4> {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.slided(*dir).is_ok())
            .collect()
    }

    /// Returns `true` if no slide can change the board.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.legal_directions().is_empty()
    }
}

/// Positions of one line, ordered from the edge tiles move towards.
fn line_positions(direction: Direction, line: usize) -> [usize; BOARD_SIZE] {
    const LAST: usize = BOARD_SIZE - 1;
    array::from_fn(|i| match direction {
        Direction::Up => i * BOARD_SIZE + line,
        Direction::Down => (LAST - i) * BOARD_SIZE + line,
        Direction::Left => line * BOARD_SIZE + i,
        Direction::Right => line * BOARD_SIZE + (LAST - i),
    })
}

/// Compacts and merges one line towards index 0, returning the merge reward.
fn merge_line(line: &mut [u8; BOARD_SIZE]) -> u32 {
    let mut merged = [0; BOARD_SIZE];
    let mut len = 0;
    let mut reward = 0;
    let mut pending = None;
    for rank in line.iter().copied().filter(|rank| *rank != 0) {
        match pending {
            Some(prev) if prev == rank && rank < MAX_TILE_RANK => {
                merged[len] = rank + 1;
                len += 1;
                reward = u32::saturating_add(reward, tile_value(rank + 1));
                pending = None;
            }
            Some(prev) => {
                merged[len] = prev;
                len += 1;
                pending = Some(rank);
            }
            None => pending = Some(rank),
        }
    }
    if let Some(prev) = pending {
        merged[len] = prev;
    }
    *line = merged;
    reward
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(BOARD_SIZE) {
            for (col, rank) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                match tile_value(*rank) {
                    0 => write!(f, "{:>6}", ".")?,
                    value => write!(f, "{value:>6}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
