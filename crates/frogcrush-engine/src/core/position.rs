use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// A cell coordinate on the board.
///
/// Column 0 is the leftmost column and row 0 is the bottom row, so gravity
/// pulls tokens toward smaller row numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    column: usize,
    row: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

impl Position {
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    #[must_use]
    pub const fn column(self) -> usize {
        self.column
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[must_use]
    pub fn left(self) -> Option<Self> {
        Some(Self::new(self.column.checked_sub(1)?, self.row))
    }

    #[must_use]
    pub fn below(self) -> Option<Self> {
        Some(Self::new(self.column, self.row.checked_sub(1)?))
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.column + 1, self.row)
    }

    #[must_use]
    pub const fn above(self) -> Self {
        Self::new(self.column, self.row + 1)
    }

    /// Returns the orthogonal neighbours that lie inside a `width`×`height` board.
    #[must_use]
    pub fn neighbors(self, width: usize, height: usize) -> ArrayVec<Self, 4> {
        let mut neighbors = ArrayVec::new();
        neighbors.extend(self.left());
        neighbors.extend(self.below());
        if self.column + 1 < width {
            neighbors.push(self.right());
        }
        if self.row + 1 < height {
            neighbors.push(self.above());
        }
        neighbors
    }

    /// Returns the axis along which `other` is orthogonally adjacent, if it is.
    #[must_use]
    pub fn adjacency(self, other: Self) -> Option<Direction> {
        let dx = self.column.abs_diff(other.column);
        let dy = self.row.abs_diff(other.row);
        match (dx, dy) {
            (1, 0) => Some(Direction::Horizontal),
            (0, 1) => Some(Direction::Vertical),
            _ => None,
        }
    }
}

/// Axis of a swap or a run of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
pub enum Direction {
    Horizontal,
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_in_corner() {
        let neighbors = Position::new(0, 0).neighbors(9, 9);
        assert_eq!(
            neighbors.as_slice(),
            &[Position::new(1, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_neighbors_in_center() {
        let neighbors = Position::new(4, 4).neighbors(9, 9);
        assert_eq!(neighbors.len(), 4);
        for neighbor in neighbors {
            assert!(Position::new(4, 4).adjacency(neighbor).is_some());
        }
    }

    #[test]
    fn test_neighbors_at_far_edge() {
        let neighbors = Position::new(8, 8).neighbors(9, 9);
        assert_eq!(
            neighbors.as_slice(),
            &[Position::new(7, 8), Position::new(8, 7)]
        );
    }

    #[test]
    fn test_adjacency() {
        let p = Position::new(3, 3);
        assert_eq!(p.adjacency(Position::new(4, 3)), Some(Direction::Horizontal));
        assert_eq!(p.adjacency(Position::new(3, 2)), Some(Direction::Vertical));
        assert_eq!(p.adjacency(Position::new(4, 4)), None);
        assert_eq!(p.adjacency(Position::new(5, 3)), None);
        assert_eq!(p.adjacency(p), None);
    }
}
