//! Board primitives: positions, token kinds, the cell grid and swaps.

pub use self::{grid::*, position::*, swap::*, token::*};

pub(crate) mod grid;
pub(crate) mod position;
pub(crate) mod swap;
pub(crate) mod token;
