//! The n-tuple network: a linear value function over tuple features.
//!
//! ```text
//! value(board) = Σ_p weights[p][feature_p(board)]      p = 0..32
//! ```
//!
//! Each of the [`TUPLE_COUNT`] patterns owns one weight table of `M^6` entries (`M` = rank cap).
//! A board touches exactly one entry per table, so evaluating a board is 32 lookups and a TD
//! update on a board changes exactly 32 entries.

use std::{fmt, path::Path};

use tdtile_engine::Board;

use crate::{
    tuple_pattern::{FeatureExtractor, FeatureIndices, TUPLE_COUNT, rank_cap_for_feature_space},
    weight_store::{WeightFileError, WeightStore},
};

/// Scores boards (higher is better).
///
/// Implemented by [`TupleNetwork`]; the action selector only depends on this trait.
pub trait BoardEvaluator: fmt::Debug {
    /// Estimated value of the board, excluding any reward already collected.
    fn evaluate(&self, board: &Board) -> f32;
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum NetworkShapeError {
    #[display("expected {} weight tables, found {found}", TUPLE_COUNT)]
    TableCount { found: usize },
    #[display("weight table {table} has {len} entries, which is not M^6 for any supported M")]
    TableLength { table: usize, len: usize },
    #[display("weight table {table} has {len} entries, expected {expected}")]
    MismatchedLength {
        table: usize,
        len: usize,
        expected: usize,
    },
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum LoadNetworkError {
    #[display("{_0}")]
    File(WeightFileError),
    #[display("invalid weight file layout: {_0}")]
    Shape(NetworkShapeError),
}

/// Tuple features plus one weight table per pattern.
///
/// # Example
///
/// ```
/// use tdtile_engine::Board;
/// use tdtile_evaluator::tuple_network::TupleNetwork;
///
/// let mut network = TupleNetwork::new(4);
/// let board = Board::from_ranks([1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3]);
/// assert_eq!(network.value(&board), 0.0);
///
/// let features = network.features(&board);
/// network.update(&features, 0.5);
/// assert_eq!(network.value(&board), 16.0);
/// ```
#[derive(Debug, Clone)]
pub struct TupleNetwork {
    extractor: FeatureExtractor,
    weights: WeightStore,
}

impl TupleNetwork {
    /// Creates a network with all weights at zero.
    ///
    /// # Panics
    ///
    /// Panics if `rank_cap` is outside `1..=MAX_RANK_CAP`.
    #[must_use]
    pub fn new(rank_cap: usize) -> Self {
        let extractor = FeatureExtractor::new(rank_cap);
        let weights = WeightStore::zeroed(TUPLE_COUNT, extractor.feature_space());
        Self { extractor, weights }
    }

    /// Wraps loaded weights, deriving the rank cap from the table length.
    pub fn from_weights(weights: WeightStore) -> Result<Self, NetworkShapeError> {
        if weights.table_count() != TUPLE_COUNT {
            return Err(NetworkShapeError::TableCount {
                found: weights.table_count(),
            });
        }
        let lens = weights.tables().map(<[f32]>::len).collect::<Vec<_>>();
        let expected = lens.first().copied().unwrap_or_default();
        let rank_cap = rank_cap_for_feature_space(expected).ok_or(
            NetworkShapeError::TableLength {
                table: 0,
                len: expected,
            },
        )?;
        if let Some((table, &len)) = lens.iter().enumerate().find(|(_, len)| **len != expected) {
            return Err(NetworkShapeError::MismatchedLength {
                table,
                len,
                expected,
            });
        }
        Ok(Self {
            extractor: FeatureExtractor::new(rank_cap),
            weights,
        })
    }

    /// Loads a network from a weight file.
    pub fn load<P>(path: P) -> Result<Self, LoadNetworkError>
    where
        P: AsRef<Path>,
    {
        let network = Self::from_weights(WeightStore::load(path)?)?;
        tracing::debug!(rank_cap = network.rank_cap(), "weight file layout accepted");
        Ok(network)
    }

    /// Saves the weights to a weight file.
    pub fn save<P>(&self, path: P) -> Result<(), WeightFileError>
    where
        P: AsRef<Path>,
    {
        self.weights.save(path)
    }

    #[must_use]
    pub const fn rank_cap(&self) -> usize {
        self.extractor.rank_cap()
    }

    #[must_use]
    pub const fn weights(&self) -> &WeightStore {
        &self.weights
    }

    /// Feature indices of `board`, one per pattern.
    #[must_use]
    pub fn features(&self, board: &Board) -> FeatureIndices {
        self.extractor.features(board)
    }

    /// Sum of the weights addressed by precomputed features.
    #[must_use]
    pub fn value_of(&self, features: &FeatureIndices) -> f32 {
        features
            .iter()
            .enumerate()
            .map(|(table, entry)| self.weights.get(table, *entry))
            .sum()
    }

    /// Estimated value of `board`.
    #[must_use]
    pub fn value(&self, board: &Board) -> f32 {
        self.value_of(&self.features(board))
    }

    /// Adds the same `delta` to the entry of every table addressed by `features`.
    pub fn update(&mut self, features: &FeatureIndices, delta: f32) {
        for (table, entry) in features.iter().enumerate() {
            self.weights.add(table, *entry, delta);
        }
    }
}

impl BoardEvaluator for TupleNetwork {
    fn evaluate(&self, board: &Board) -> f32 {
        self.value(board)
    }
}
