//! Match-3 puzzle engine.
//!
//! The crate owns a rectangular grid of typed tokens and implements the rules
//! that act on it: swap validation, run detection, cascade resolution,
//! solvable shuffles and scoring. It performs no rendering, input handling or
//! timing; callers replay the returned [`CascadeStep`]s at their own pace.
//!
//! ```
//! use frogcrush_engine::{GameSession, LevelDefinition, TokenSeed};
//!
//! let level = LevelDefinition::new(vec![vec![1; 9]; 9], 1000, 20);
//! let mut session = GameSession::with_seed(&level, TokenSeed::from_bytes([7; 16])).unwrap();
//!
//! let hint = session.field().possible_swaps()[0];
//! let outcome = session.play_swap(hint.first(), hint.second()).unwrap();
//! assert!(outcome.is_resolved());
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("position {position} is outside the {width}x{height} grid")]
pub struct OutOfBoundsError {
    pub position: Position,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShuffleError {
    #[display("level has no legal cells to shuffle")]
    NoLegalCells,
    #[display("no chain-free layout with a possible move found after {attempts} attempts")]
    Unsatisfiable { attempts: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionError {
    #[display("invalid level definition: {_0}")]
    Level(LevelError),
    #[display("initial shuffle failed: {_0}")]
    Shuffle(ShuffleError),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PlayError {
    #[display("{_0}")]
    OutOfBounds(OutOfBoundsError),
    #[display("reshuffle failed: {_0}")]
    Shuffle(ShuffleError),
    #[display("session already finished")]
    #[from(ignore)]
    SessionFinished,
}
