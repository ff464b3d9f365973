//! Game mechanics for the 4×4 sliding-tile game.
//!
//! - [`core`] - the board, slide/merge rule and action descriptors
//! - [`engine`] - the random tile spawner and per-episode statistics
//!
//! Tiles are stored as ranks: `0` is an empty cell and rank `k` is a tile of value `2^k`.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no tile moved")]
pub struct NoTileMovedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell {position} is already occupied")]
pub struct CellOccupiedError {
    pub position: usize,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum IllegalActionError {
    #[display("illegal slide: {_0}")]
    NoTileMoved(NoTileMovedError),
    #[display("illegal placement: {_0}")]
    CellOccupied(CellOccupiedError),
}
