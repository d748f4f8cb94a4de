use serde::{Deserialize, Serialize};

use crate::core::{Palette, Position, TileMask};

use super::{scoring::ScoreTable, shuffle::ShuffleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LevelError {
    #[display("level has no tiles")]
    NoTiles,
    #[display("tile row {row} has {found} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("tile at row {row}, column {column} must be 0 or 1, got {value}")]
    InvalidTile { row: usize, column: usize, value: u8 },
    #[display("level must allow at least one move")]
    NoMoves,
}

/// Everything a level hands to the engine at construction.
///
/// Deserializes from the level file format: `tiles` lists rows top row
/// first, with `1` for a legal cell and `0` for a permanent hole.
///
/// ```
/// use frogcrush_engine::LevelDefinition;
///
/// let level: LevelDefinition = serde_json::from_str(r#"{
///     "tiles": [[0, 1, 1], [1, 1, 1], [1, 1, 0]],
///     "targetScore": 1000,
///     "moves": 15
/// }"#).unwrap();
/// let mask = level.tile_mask().unwrap();
/// assert_eq!(mask.legal_count(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDefinition {
    pub tiles: Vec<Vec<u8>>,
    pub target_score: usize,
    pub moves: usize,
    #[serde(default, rename = "paletteSize")]
    pub palette: Palette,
    #[serde(default)]
    pub scoring: ScoreTable,
    #[serde(default)]
    pub shuffle: ShuffleConfig,
}

impl LevelDefinition {
    /// A level with the full palette and default scoring and shuffle settings.
    #[must_use]
    pub fn new(tiles: Vec<Vec<u8>>, target_score: usize, moves: usize) -> Self {
        Self {
            tiles,
            target_score,
            moves,
            palette: Palette::default(),
            scoring: ScoreTable::default(),
            shuffle: ShuffleConfig::default(),
        }
    }

    /// Checks the definition and converts `tiles` into a [`TileMask`].
    pub fn tile_mask(&self) -> Result<TileMask, LevelError> {
        let height = self.tiles.len();
        let width = self.tiles.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(LevelError::NoTiles);
        }
        if self.moves == 0 {
            return Err(LevelError::NoMoves);
        }
        for (row, tiles) in self.tiles.iter().enumerate() {
            if tiles.len() != width {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: width,
                    found: tiles.len(),
                });
            }
            if let Some((column, &value)) = tiles.iter().enumerate().find(|(_, v)| **v > 1) {
                return Err(LevelError::InvalidTile { row, column, value });
            }
        }

        Ok(TileMask::from_fn(width, height, |pos: Position| {
            self.tiles[height - 1 - pos.row()][pos.column()] == 1
        }))
    }
}
