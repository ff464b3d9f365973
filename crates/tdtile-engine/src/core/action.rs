use serde::{Deserialize, Serialize};

use crate::{IllegalActionError, core::board::Board};

/// Direction of a slide.
///
/// The declaration order is the enumeration order used everywhere a set of directions is
/// scanned: up, right, down, left.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[display("up")]
    Up,
    #[display("right")]
    Right,
    #[display("down")]
    Down,
    #[display("left")]
    Left,
}

impl Direction {
    pub const LEN: usize = 4;

    /// All directions in enumeration order.
    pub const ALL: [Self; Self::LEN] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Position of the direction in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// An action taken by an agent on the board.
///
/// The player slides tiles; the environment places a new tile into an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Action {
    #[display("slide {_0}")]
    Slide(Direction),
    #[display("place rank {rank} at {position}")]
    Place { position: usize, rank: u8 },
}

impl Action {
    /// Applies the action to the board, returning the reward it yields.
    ///
    /// Placements always yield a reward of `0`.
    pub fn apply(self, board: &mut Board) -> Result<u32, IllegalActionError> {
        match self {
            Self::Slide(direction) => Ok(board.slide(direction)?),
            Self::Place { position, rank } => {
                board.place(position, rank)?;
                Ok(0)
            }
        }
    }
}
