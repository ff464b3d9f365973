//! Board evaluation for the sliding-tile game.
//!
//! This crate implements the value side of the player:
//!
//! 1. **Tuple Patterns** ([`tuple_pattern`]) - The 32 six-cell patterns and the mapping from a
//!    board to one feature index per pattern.
//!
//! 2. **Weight Storage** ([`weight_store`]) - Dense `f32` weight tables and their binary file
//!    format.
//!
//! 3. **Tuple Network** ([`tuple_network`]) - The linear value function
//!    `value(board) = Σ weights[p][feature_p(board)]` and its TD update primitive.
//!
//! 4. **Action Selection** ([`action_selector`]) - Picks the slide maximizing
//!    `reward + value(afterstate)`.
//!
//! # Architecture
//!
//! ```text
//! Action Selection (best slide for a board)
//!     ↓ uses BoardEvaluator
//! Tuple Network (value of an afterstate)
//!     ↓ uses
//! Tuple Patterns + Weight Storage
//! ```
//!
//! The selector depends only on the [`tuple_network::BoardEvaluator`] trait, so tests can drive
//! it with hand-written values.
//!
//! # Example
//!
//! ```
//! use tdtile_engine::Board;
//! use tdtile_evaluator::{action_selector::ActionSelector, tuple_network::TupleNetwork};
//!
//! let network = TupleNetwork::new(4);
//! let board = Board::from_rows([
//!     [1, 0, 0, 1],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//! ]);
//! let selection = ActionSelector::new(&network).select(&board).unwrap();
//! assert_eq!(selection.reward(), 4);
//! ```

pub mod action_selector;
pub mod tuple_network;
pub mod tuple_pattern;
pub mod weight_store;
