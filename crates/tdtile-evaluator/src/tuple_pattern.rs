//! N-tuple patterns and feature extraction.
//!
//! A tuple pattern is an ordered list of [`TUPLE_LENGTH`] board positions (row-major, `0..16`).
//! The 32 patterns in [`TUPLE_PATTERNS`] are the 8 rotations/reflections of 4 base shapes:
//!
//! ```text
//! shape 0      shape 1      shape 2      shape 3
//! # . . .      . # . .      . # # .      . . # #
//! # . . .      . # . .      . # # .      . . # #
//! # # . .      . # # .      . # # .      . . # #
//! # # . .      . # # .      . . . .      . . . .
//! ```
//!
//! # Feature Index
//!
//! The feature of a board for one pattern is the base-`M` numeral formed by the ranks at the
//! pattern's positions, first position most significant, where `M` is the rank cap. Ranks
//! `>= M - 1` are clamped to `M - 1`, so every index lies in `[0, M^6)` and large tiles share
//! their entries. The clamp keeps each table at `M^6` entries.

use std::array;

use tdtile_engine::Board;

/// Number of positions in a tuple pattern.
pub const TUPLE_LENGTH: usize = 6;

/// Number of tuple patterns (and weight tables).
pub const TUPLE_COUNT: usize = 32;

/// Default rank cap: ranks up to 14 are told apart, 15 and above (32768+) share entries.
pub const DEFAULT_RANK_CAP: usize = 16;

/// Largest supported rank cap.
pub const MAX_RANK_CAP: usize = 24;

pub type TuplePattern = [u8; TUPLE_LENGTH];

/// One feature index per tuple pattern, in [`TUPLE_PATTERNS`] order.
pub type FeatureIndices = [usize; TUPLE_COUNT];

/// All tuple patterns, grouped by symmetry (4 shapes per symmetry).
pub const TUPLE_PATTERNS: [TuplePattern; TUPLE_COUNT] = [
    // identity
    [0, 4, 8, 9, 12, 13],
    [1, 5, 9, 10, 13, 14],
    [1, 2, 5, 6, 9, 10],
    [2, 3, 6, 7, 10, 11],
    // rotated 90°
    [3, 2, 1, 5, 0, 4],
    [7, 6, 5, 9, 4, 8],
    [7, 11, 6, 10, 5, 9],
    [11, 15, 10, 14, 9, 13],
    // rotated 180°
    [15, 11, 7, 6, 3, 2],
    [14, 10, 6, 5, 2, 1],
    [14, 13, 10, 9, 6, 5],
    [13, 12, 9, 8, 5, 4],
    // rotated 270°
    [12, 13, 14, 10, 15, 11],
    [8, 9, 10, 6, 11, 7],
    [8, 4, 9, 5, 10, 6],
    [4, 0, 5, 1, 6, 2],
    // mirrored
    [3, 7, 11, 10, 15, 14],
    [2, 6, 10, 9, 14, 13],
    [2, 1, 6, 5, 10, 9],
    [1, 0, 5, 4, 9, 8],
    // mirrored, rotated 90°
    [0, 1, 2, 6, 3, 7],
    [4, 5, 6, 10, 7, 11],
    [4, 8, 5, 9, 6, 10],
    [8, 12, 9, 13, 10, 14],
    // mirrored, rotated 180°
    [12, 8, 4, 5, 0, 1],
    [13, 9, 5, 6, 1, 2],
    [13, 14, 9, 10, 5, 6],
    [14, 15, 10, 11, 6, 7],
    // mirrored, rotated 270°
    [15, 14, 13, 9, 12, 8],
    [11, 10, 9, 5, 8, 4],
    [11, 7, 10, 6, 9, 5],
    [7, 3, 6, 2, 5, 1],
];

/// Number of distinct feature indices of one pattern for the given rank cap (`M^6`).
#[expect(clippy::cast_possible_truncation)]
#[must_use]
pub const fn feature_space(rank_cap: usize) -> usize {
    rank_cap.pow(TUPLE_LENGTH as u32)
}

/// Returns the rank cap `M` whose feature space is exactly `len`, if any.
#[must_use]
pub fn rank_cap_for_feature_space(len: usize) -> Option<usize> {
    (1..=MAX_RANK_CAP).find(|cap| feature_space(*cap) == len)
}

/// Maps boards to feature indices for a fixed rank cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureExtractor {
    rank_cap: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_RANK_CAP)
    }
}

impl FeatureExtractor {
    /// # Panics
    ///
    /// Panics if `rank_cap` is not in `1..=MAX_RANK_CAP`.
    #[must_use]
    pub fn new(rank_cap: usize) -> Self {
        assert!(
            (1..=MAX_RANK_CAP).contains(&rank_cap),
            "rank cap must be in 1..={MAX_RANK_CAP}, got {rank_cap}"
        );
        Self { rank_cap }
    }

    #[must_use]
    pub const fn rank_cap(&self) -> usize {
        self.rank_cap
    }

    /// Size of every weight table addressed by this extractor.
    #[must_use]
    pub const fn feature_space(&self) -> usize {
        feature_space(self.rank_cap)
    }

    /// Computes the feature index of `board` for a single pattern.
    #[must_use]
    pub fn feature_index(&self, board: &Board, pattern: &TuplePattern) -> usize {
        let max_rank = self.rank_cap - 1;
        pattern.iter().fold(0, |index, &pos| {
            let rank = usize::from(board.rank_at(usize::from(pos)));
            index * self.rank_cap + rank.min(max_rank)
        })
    }

    /// Computes the feature indices of `board` for all patterns.
    #[must_use]
    pub fn features(&self, board: &Board) -> FeatureIndices {
        array::from_fn(|i| self.feature_index(board, &TUPLE_PATTERNS[i]))
    }
}
