use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    ShuffleError,
    core::{Grid, Position, TokenKind},
};

use super::{
    detector::has_chain, possible_moves::has_any_possible_move, token_source::TokenSource,
};

/// Retry budget for [`shuffle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShuffleConfig {
    /// Number of fresh layouts to try before giving up.
    pub max_attempts: usize,
    /// Random exchanges tried on a chain-free layout that has no move.
    pub max_perturbations: usize,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            max_perturbations: 32,
        }
    }
}

/// Reassigns every legal cell of `grid` with a fresh random layout.
///
/// On success the grid has every legal cell occupied, contains no chain and
/// has at least one possible move.
///
/// Cells are filled bottom row first, left to right; each draws uniformly
/// among the palette kinds that would not complete a run with the two cells
/// to its left or the two cells below it. A layout without a possible move
/// is perturbed by exchanging random tokens of different kinds, and then
/// abandoned for a new attempt.
///
/// # Errors
///
/// [`ShuffleError::NoLegalCells`] if the grid has no legal cell, and
/// [`ShuffleError::Unsatisfiable`] once `config.max_attempts` layouts have
/// failed. The latter happens for palettes smaller than three kinds or legal
/// areas too small to hold any move. `grid` is left untouched on error.
pub fn shuffle(
    grid: &mut Grid,
    source: &mut TokenSource,
    config: &ShuffleConfig,
) -> Result<(), ShuffleError> {
    let legal: Vec<Position> = grid.legal_positions().collect();
    if legal.is_empty() {
        return Err(ShuffleError::NoLegalCells);
    }

    let mut scratch = grid.clone();
    for attempt in 1..=config.max_attempts {
        if !fill_without_chains(&mut scratch, source, &legal) {
            debug!(attempt, "palette too small for a chain-free layout");
            continue;
        }
        if has_any_possible_move(&scratch)
            || perturb(&mut scratch, source, &legal, config.max_perturbations)
        {
            debug!(attempt, "shuffled layout");
            *grid = scratch;
            return Ok(());
        }
        debug!(attempt, "layout has no possible move");
    }

    warn!(
        attempts = config.max_attempts,
        legal_cells = legal.len(),
        palette = source.palette().size(),
        "no valid layout found; level definition is likely unsatisfiable"
    );
    Err(ShuffleError::Unsatisfiable {
        attempts: config.max_attempts,
    })
}

/// Fills `legal` in order; returns `false` if some cell had no allowed kind.
fn fill_without_chains(grid: &mut Grid, source: &mut TokenSource, legal: &[Position]) -> bool {
    for &pos in legal {
        let mut excluded = ArrayVec::<TokenKind, 2>::new();
        let lines = [
            (pos.left(), pos.left().and_then(Position::left)),
            (pos.below(), pos.below().and_then(Position::below)),
        ];
        for (near, far) in lines {
            let near = near.and_then(|p| grid.token(p));
            let far = far.and_then(|p| grid.token(p));
            if let (Some(a), Some(b)) = (near, far)
                && a == b
            {
                excluded.push(a);
            }
        }
        let Some(kind) = source.draw_excluding(&excluded) else {
            return false;
        };
        grid.set_token(pos, kind);
    }
    true
}

/// Tries random exchanges that keep the layout chain-free and create a move.
fn perturb(grid: &mut Grid, source: &mut TokenSource, legal: &[Position], tries: usize) -> bool {
    for _ in 0..tries {
        let a = legal[source.index(legal.len())];
        let b = legal[source.index(legal.len())];
        if grid.token(a) == grid.token(b) {
            continue;
        }
        grid.exchange(a, b);
        if !has_chain(grid) && has_any_possible_move(grid) {
            debug!(%a, %b, "perturbed layout to create a move");
            return true;
        }
        grid.exchange(a, b);
    }
    false
}

#[cfg(test)]
mod tests {
    use crate::{Palette, TileMask, TokenSeed, find_chains};

    use super::*;

    fn source(palette: usize, byte: u8) -> TokenSource {
        TokenSource::with_seed(
            Palette::new(palette).unwrap(),
            TokenSeed::from_bytes([byte; 16]),
        )
    }

    fn assert_valid_layout(grid: &Grid, palette: Palette) {
        for pos in grid.positions() {
            let cell = grid.cell(pos);
            if cell.is_illegal() {
                continue;
            }
            let kind = cell.token().expect("legal cell left empty");
            assert!(palette.contains(kind));
        }
        assert!(find_chains(grid).is_empty());
        assert!(has_any_possible_move(grid));
    }

    #[test]
    fn test_full_board_shuffles() {
        for byte in 0..20 {
            let mut src = source(6, byte);
            let mut grid = Grid::new(&TileMask::full(9, 9));
            shuffle(&mut grid, &mut src, &ShuffleConfig::default()).unwrap();
            assert_valid_layout(&grid, src.palette());
        }
    }

    #[test]
    fn test_small_palette_board_shuffles() {
        for byte in 0..20 {
            let mut src = source(4, byte);
            let mut grid = Grid::new(&TileMask::full(9, 9));
            shuffle(&mut grid, &mut src, &ShuffleConfig::default()).unwrap();
            assert_valid_layout(&grid, src.palette());
        }
    }

    #[test]
    fn test_masked_board_keeps_illegal_cells() {
        // Diamond-ish level with cut corners and a hole in the middle.
        let mask = TileMask::from_fn(9, 9, |pos| {
            let corner = (pos.column() < 2 || pos.column() > 6) && (pos.row() < 2 || pos.row() > 6);
            !corner && pos != Position::new(4, 4)
        });
        for byte in 0..10 {
            let mut src = source(5, byte);
            let mut grid = Grid::new(&mask);
            shuffle(&mut grid, &mut src, &ShuffleConfig::default()).unwrap();
            assert_valid_layout(&grid, src.palette());
            assert_eq!(grid.tile_mask(), mask);
            assert_eq!(grid.occupied_count(), mask.legal_count());
        }
    }

    #[test]
    fn test_reshuffle_replaces_existing_layout() {
        let mut src = source(6, 1);
        let mut grid = Grid::new(&TileMask::full(9, 9));
        shuffle(&mut grid, &mut src, &ShuffleConfig::default()).unwrap();
        let first = grid.clone();
        shuffle(&mut grid, &mut src, &ShuffleConfig::default()).unwrap();
        assert_ne!(grid, first);
        assert_valid_layout(&grid, src.palette());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = Grid::new(&TileMask::full(9, 9));
        let mut b = Grid::new(&TileMask::full(9, 9));
        shuffle(&mut a, &mut source(6, 77), &ShuffleConfig::default()).unwrap();
        shuffle(&mut b, &mut source(6, 77), &ShuffleConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_kind_palette_is_unsatisfiable() {
        let mut grid = Grid::new(&TileMask::full(9, 9));
        let config = ShuffleConfig {
            max_attempts: 5,
            ..ShuffleConfig::default()
        };
        assert_eq!(
            shuffle(&mut grid, &mut source(1, 0), &config),
            Err(ShuffleError::Unsatisfiable { attempts: 5 })
        );
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_failed_shuffle_keeps_layout() {
        let config = ShuffleConfig {
            max_attempts: 3,
            ..ShuffleConfig::default()
        };
        for byte in 0..20 {
            let mut grid: Grid = "CUCU/UCUC/CUCU/UCUU".parse().unwrap();
            let before = grid.clone();
            assert_eq!(
                shuffle(&mut grid, &mut source(1, byte), &config),
                Err(ShuffleError::Unsatisfiable { attempts: 3 })
            );
            assert_eq!(grid, before);
        }
    }

    #[test]
    fn test_tiny_legal_area_is_unsatisfiable() {
        let mask = TileMask::from_fn(5, 5, |pos| pos.row() == 0 && pos.column() < 2);
        let mut grid = Grid::new(&mask);
        assert_eq!(
            shuffle(&mut grid, &mut source(6, 0), &ShuffleConfig::default()),
            Err(ShuffleError::Unsatisfiable { attempts: 100 })
        );
    }

    #[test]
    fn test_no_legal_cells() {
        let mut grid = Grid::new(&TileMask::from_fn(3, 3, |_| false));
        assert_eq!(
            shuffle(&mut grid, &mut source(6, 0), &ShuffleConfig::default()),
            Err(ShuffleError::NoLegalCells)
        );
    }

    #[test]
    fn test_perturb_creates_move_on_stuck_layout() {
        let mut grid: Grid = "CUDC/UDCU/DCUD/CUDC".parse().unwrap();
        assert!(!has_chain(&grid));
        let legal: Vec<Position> = grid.legal_positions().collect();
        let mut src = source(3, 4);
        assert!(perturb(&mut grid, &mut src, &legal, 500));
        assert!(!has_chain(&grid));
        assert!(has_any_possible_move(&grid));
    }
}
