use crate::core::{Grid, Swap};

use super::detector::has_chain;

/// Returns whether exchanging the two cells of `swap` creates at least one chain.
///
/// Both cells must hold tokens of different kinds. The exchange is simulated
/// on a scratch copy, so `grid` is never modified.
///
/// ```
/// use frogcrush_engine::{Grid, Position, Swap, is_legal_swap};
///
/// let grid: Grid = "....O./..OOU.".parse().unwrap();
/// let good = Swap::new(Position::new(4, 0), Position::new(4, 1)).unwrap();
/// let bad = Swap::new(Position::new(3, 0), Position::new(4, 0)).unwrap();
/// assert!(is_legal_swap(&grid, good));
/// assert!(!is_legal_swap(&grid, bad));
/// ```
#[must_use]
pub fn is_legal_swap(grid: &Grid, swap: Swap) -> bool {
    if !is_exchangeable(grid, swap) {
        return false;
    }
    let mut scratch = grid.clone();
    creates_chain(&mut scratch, swap)
}

/// Whether both cells are occupied by tokens of different kinds.
pub(crate) fn is_exchangeable(grid: &Grid, swap: Swap) -> bool {
    match (grid.token(swap.first()), grid.token(swap.second())) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}

/// Applies `swap` to `scratch`, checks for a chain and reverts the exchange.
pub(crate) fn creates_chain(scratch: &mut Grid, swap: Swap) -> bool {
    scratch.swap_tokens(swap);
    let found = has_chain(scratch);
    scratch.swap_tokens(swap);
    found
}

#[cfg(test)]
mod tests {
    use crate::{Position, find_chains};

    use super::*;

    fn swap(a: (usize, usize), b: (usize, usize)) -> Swap {
        Swap::new(Position::new(a.0, a.1), Position::new(b.0, b.1)).unwrap()
    }

    #[test]
    fn test_swap_completing_row_is_legal() {
        // Donuts at (2,4) and (3,4); a third donut sits above (4,4).
        let grid: Grid = "....O./..OOU./....../....../....../......"
            .parse()
            .unwrap();
        let before = grid.clone();
        assert!(is_legal_swap(&grid, swap((4, 4), (4, 5))));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_swap_without_match_is_rejected_and_grid_unchanged() {
        let grid: Grid = "CUD/UDC/DCU".parse().unwrap();
        let before = grid.clone();
        assert!(!is_legal_swap(&grid, swap((0, 0), (1, 0))));
        assert_eq!(grid, before);
        assert!(find_chains(&grid).is_empty());
    }

    #[test]
    fn test_empty_illegal_and_same_kind_cells_are_rejected() {
        let grid: Grid = "CC.C/#CUU".parse().unwrap();
        // Empty cell.
        assert!(!is_legal_swap(&grid, swap((2, 1), (3, 1))));
        // Illegal cell.
        assert!(!is_legal_swap(&grid, swap((0, 0), (1, 0))));
        // Same kind.
        assert!(!is_legal_swap(&grid, swap((0, 1), (1, 1))));
    }

    #[test]
    fn test_vertical_swap_can_complete_column() {
        let grid: Grid = "M/S/M/M".parse().unwrap();
        assert!(is_legal_swap(&grid, swap((0, 3), (0, 2))));
        assert!(!is_legal_swap(&grid, swap((0, 1), (0, 0))));
    }
}
