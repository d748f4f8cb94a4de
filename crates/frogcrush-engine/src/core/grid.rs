use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::OutOfBoundsError;

use super::{position::Position, swap::Swap, token::TokenKind};

const ILLEGAL_CHAR: char = '#';
const EMPTY_CHAR: char = '.';

/// State of a single board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Cell {
    /// Permanently excluded from play by the level's tile mask.
    Illegal,
    /// Playable but currently holding no token.
    #[default]
    Empty,
    /// Playable and holding a token.
    Occupied(TokenKind),
}

impl Cell {
    #[must_use]
    pub fn token(self) -> Option<TokenKind> {
        match self {
            Cell::Occupied(kind) => Some(kind),
            Cell::Illegal | Cell::Empty => None,
        }
    }

    #[must_use]
    pub fn is_legal(self) -> bool {
        !self.is_illegal()
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Illegal => ILLEGAL_CHAR,
            Cell::Empty => EMPTY_CHAR,
            Cell::Occupied(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ILLEGAL_CHAR => Some(Cell::Illegal),
            EMPTY_CHAR => Some(Cell::Empty),
            _ => TokenKind::from_char(c).map(Cell::Occupied),
        }
    }
}

/// Which positions of a `width`×`height` board may ever hold a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMask {
    width: usize,
    height: usize,
    legal: Vec<bool>,
}

impl TileMask {
    /// A mask where every position is legal.
    #[must_use]
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            legal: vec![true; width * height],
        }
    }

    /// Builds a mask by asking `is_legal` about every position.
    #[must_use]
    pub fn from_fn<F>(width: usize, height: usize, mut is_legal: F) -> Self
    where
        F: FnMut(Position) -> bool,
    {
        let legal = (0..height)
            .flat_map(|row| (0..width).map(move |column| Position::new(column, row)))
            .map(&mut is_legal)
            .collect();
        Self {
            width,
            height,
            legal,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns `false` for illegal and out-of-bounds positions.
    #[must_use]
    pub fn is_legal(&self, pos: Position) -> bool {
        pos.column() < self.width
            && pos.row() < self.height
            && self.legal[pos.row() * self.width + pos.column()]
    }

    #[must_use]
    pub fn legal_count(&self) -> usize {
        self.legal.iter().filter(|legal| **legal).count()
    }
}

/// The board: a fixed `width`×`height` array of [`Cell`]s.
///
/// Illegal cells are fixed at construction and never change afterwards.
/// Legal cells move between empty and occupied through swaps, removal,
/// gravity and replenishment.
///
/// # Textual form
///
/// Rows are written top row first, separated by `/` (or newlines when
/// parsing). `#` is an illegal cell, `.` an empty cell and any
/// [`TokenKind::as_char`] character an occupied one.
///
/// ```
/// use frogcrush_engine::{Grid, Position, TokenKind};
///
/// let grid: Grid = "#CU/DDM/.OS".parse().unwrap();
/// assert_eq!(grid.width(), 3);
/// assert_eq!(grid.token(Position::new(1, 0)), Some(TokenKind::Donut));
/// assert!(grid.cell(Position::new(0, 2)).is_illegal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every legal cell of `mask` empty.
    #[must_use]
    pub fn new(mask: &TileMask) -> Self {
        let cells = mask
            .legal
            .iter()
            .map(|&legal| if legal { Cell::Empty } else { Cell::Illegal })
            .collect();
        Self {
            width: mask.width,
            height: mask.height,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.column() < self.width && pos.row() < self.height
    }

    pub fn check_bounds(&self, pos: Position) -> Result<(), OutOfBoundsError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(OutOfBoundsError {
                position: pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {pos} outside {}x{} grid",
            self.width,
            self.height
        );
        pos.row() * self.width + pos.column()
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Returns the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Returns the token at `pos`, or `None` for empty, illegal and
    /// out-of-bounds positions.
    #[must_use]
    pub fn token(&self, pos: Position) -> Option<TokenKind> {
        self.get(pos).and_then(Cell::token)
    }

    /// Iterates over every position, bottom row first, left to right.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |column| Position::new(column, row)))
    }

    /// Like [`Self::positions`], restricted to legal cells.
    pub fn legal_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|&pos| self.cell(pos).is_legal())
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_occupied()).count()
    }

    #[must_use]
    pub fn column_occupied_count(&self, column: usize) -> usize {
        (0..self.height)
            .filter(|&row| self.cell(Position::new(column, row)).is_occupied())
            .count()
    }

    /// Returns the tile mask this grid was built from.
    #[must_use]
    pub fn tile_mask(&self) -> TileMask {
        TileMask {
            width: self.width,
            height: self.height,
            legal: self.cells.iter().map(|cell| cell.is_legal()).collect(),
        }
    }

    /// Places `kind` at `pos`, replacing any token already there.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid or refers to an illegal cell.
    pub fn set_token(&mut self, pos: Position, kind: TokenKind) {
        let index = self.index(pos);
        assert!(
            self.cells[index].is_legal(),
            "cannot place a token on illegal cell {pos}"
        );
        self.cells[index] = Cell::Occupied(kind);
    }

    /// Empties `pos` and returns the token it held. Illegal cells are left untouched.
    pub fn clear(&mut self, pos: Position) -> Option<TokenKind> {
        let index = self.index(pos);
        let token = self.cells[index].token();
        if token.is_some() {
            self.cells[index] = Cell::Empty;
        }
        token
    }

    /// Exchanges the contents of the two cells of `swap`.
    pub fn swap_tokens(&mut self, swap: Swap) {
        self.exchange(swap.first(), swap.second());
    }

    /// Exchanges the contents of two legal cells, adjacent or not.
    pub(crate) fn exchange(&mut self, a: Position, b: Position) {
        let (ia, ib) = (self.index(a), self.index(b));
        assert!(
            self.cells[ia].is_legal() && self.cells[ib].is_legal(),
            "cannot exchange illegal cells {a} and {b}"
        );
        self.cells.swap(ia, ib);
    }

    fn row_chars(&self, row: usize) -> impl Iterator<Item = char> + '_ {
        (0..self.width).map(move |column| self.cell(Position::new(column, row)).as_char())
    }

    fn write_rows(&self, f: &mut impl fmt::Write, separator: char) -> fmt::Result {
        for (i, row) in (0..self.height).rev().enumerate() {
            if i > 0 {
                f.write_char(separator)?;
            }
            for c in self.row_chars(row) {
                f.write_char(c)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_rows(f, '\n')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridParseError {
    #[display("grid has no rows")]
    Empty,
    #[display("row {line} has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {found:?} at row {line}, column {column}")]
    InvalidCell {
        line: usize,
        column: usize,
        found: char,
    },
}

impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(GridParseError::Empty);
        };
        let width = first.chars().count();
        let height = lines.len();

        let mut cells = vec![Cell::Empty; width * height];
        for (line, text) in lines.iter().enumerate() {
            let found = text.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow {
                    line,
                    expected: width,
                    found,
                });
            }
            let row = height - 1 - line;
            for (column, c) in text.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or(GridParseError::InvalidCell {
                    line,
                    column,
                    found: c,
                })?;
                cells[row * width + column] = cell;
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "#CU/DDM/.OS" (top row first)
        let mut text = String::with_capacity((self.width + 1) * self.height);
        self.write_rows(&mut text, '/')
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid grid {s:?}: {e}")))
    }
}
