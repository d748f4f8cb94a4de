use crate::core::{Grid, Position, Swap};

use super::validator::{creates_chain, is_exchangeable};

/// Every swap of two occupied, differently-kinded neighbours, each pair once.
fn candidate_swaps(grid: &Grid) -> impl Iterator<Item = Swap> + '_ {
    grid.positions().flat_map(move |pos| {
        let right = (pos.column() + 1 < grid.width()).then(|| pos.right());
        let above = (pos.row() + 1 < grid.height()).then(|| pos.above());
        [right, above]
            .into_iter()
            .flatten()
            .filter_map(move |other: Position| Swap::new(pos, other))
            .filter(move |&swap| is_exchangeable(grid, swap))
    })
}

/// Returns whether at least one legal swap exists anywhere on the board.
///
/// Stops at the first swap that creates a chain.
#[must_use]
pub fn has_any_possible_move(grid: &Grid) -> bool {
    let mut scratch = grid.clone();
    candidate_swaps(grid).any(|swap| creates_chain(&mut scratch, swap))
}

/// Lists every legal swap on the board, in board order.
#[must_use]
pub fn possible_swaps(grid: &Grid) -> Vec<Swap> {
    let mut scratch = grid.clone();
    candidate_swaps(grid)
        .filter(|&swap| creates_chain(&mut scratch, swap))
        .collect()
}
