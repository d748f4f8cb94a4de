use serde::{Deserialize, Serialize};

use super::position::{Direction, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("positions {first} and {second} are not orthogonally adjacent")]
pub struct NotAdjacentError {
    first: Position,
    second: Position,
}

/// An exchange of two orthogonally adjacent cells.
///
/// Swaps are unordered: `Swap::new(a, b)` and `Swap::new(b, a)` are equal.
///
/// ```
/// use frogcrush_engine::{Direction, Position, Swap};
///
/// let a = Position::new(2, 4);
/// let b = Position::new(2, 5);
/// let swap = Swap::new(a, b).unwrap();
/// assert_eq!(swap, Swap::new(b, a).unwrap());
/// assert_eq!(swap.direction(), Direction::Vertical);
/// assert!(Swap::new(a, Position::new(3, 5)).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[Position; 2]", into = "[Position; 2]")]
pub struct Swap {
    first: Position,
    second: Position,
}

impl TryFrom<[Position; 2]> for Swap {
    type Error = NotAdjacentError;

    fn try_from([first, second]: [Position; 2]) -> Result<Self, Self::Error> {
        Self::new(first, second).ok_or(NotAdjacentError { first, second })
    }
}

impl From<Swap> for [Position; 2] {
    fn from(swap: Swap) -> Self {
        [swap.first, swap.second]
    }
}

impl Swap {
    /// Returns `None` unless `a` and `b` are orthogonally adjacent.
    #[must_use]
    pub fn new(a: Position, b: Position) -> Option<Self> {
        a.adjacency(b)?;
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Some(Self { first, second })
    }

    #[must_use]
    pub const fn first(self) -> Position {
        self.first
    }

    #[must_use]
    pub const fn second(self) -> Position {
        self.second
    }

    #[must_use]
    pub fn direction(self) -> Direction {
        if self.first.row() == self.second.row() {
            Direction::Horizontal
        } else {
            Direction::Vertical
        }
    }
}
