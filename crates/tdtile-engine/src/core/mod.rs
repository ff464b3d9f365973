pub use self::{action::*, board::*};

pub(crate) mod action;
pub(crate) mod board;
