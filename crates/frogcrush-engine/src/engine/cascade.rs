use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::core::{Cell, Grid, Position, TokenKind};

use super::{
    detector::{Chain, find_chains},
    scoring::{ComboMultiplier, ScoreTable},
    token_source::TokenSource,
};

/// Upper bound on cascade passes within one [`resolve`] call.
///
/// Only reachable with a degenerate palette that keeps spawning chains.
pub const MAX_CASCADE_PASSES: usize = 256;

/// A removed chain together with the points it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredChain {
    chain: Chain,
    points: usize,
}

impl ScoredChain {
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    #[must_use]
    pub fn points(&self) -> usize {
        self.points
    }
}

/// A token that fell from `from_row` to `to_row` within `column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fall {
    pub column: usize,
    pub from_row: usize,
    pub to_row: usize,
    pub kind: TokenKind,
}

/// A new token placed into an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub position: Position,
    pub kind: TokenKind,
}

/// One detect → remove → gravity → replenish pass.
///
/// Steps are fully computed by [`resolve`] before it returns; a renderer
/// replays `removed`, then `falls`, then `spawns` for each step in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeStep {
    combo: ComboMultiplier,
    removed: Vec<ScoredChain>,
    falls: Vec<Fall>,
    spawns: Vec<Spawn>,
}

impl CascadeStep {
    /// The multiplier every chain of this step was scored with.
    #[must_use]
    pub fn combo(&self) -> ComboMultiplier {
        self.combo
    }

    #[must_use]
    pub fn removed(&self) -> &[ScoredChain] {
        &self.removed
    }

    /// Falls ordered by column, then by destination row from the bottom up.
    #[must_use]
    pub fn falls(&self) -> &[Fall] {
        &self.falls
    }

    /// Spawns ordered by column, then from the top row down.
    #[must_use]
    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }

    /// Total points earned by this step.
    #[must_use]
    pub fn points(&self) -> usize {
        self.removed
            .iter()
            .map(ScoredChain::points)
            .fold(0, usize::saturating_add)
    }

    /// Number of cells emptied by this step.
    #[must_use]
    pub fn removed_cells(&self) -> usize {
        self.removed.iter().map(|scored| scored.chain.size()).sum()
    }
}

/// Drains every cascade from the current grid state.
///
/// Each pass finds all chains, removes them and scores them at the current
/// multiplier, increments the multiplier, lets tokens fall and fills the
/// remaining empty cells with new tokens from `source`. Resolution stops at
/// the first pass that finds no chain, so a chain-free grid yields no steps
/// and is left untouched.
pub fn resolve(
    grid: &mut Grid,
    source: &mut TokenSource,
    table: &ScoreTable,
    combo: &mut ComboMultiplier,
) -> Vec<CascadeStep> {
    let mut steps = vec![];
    loop {
        let chains = find_chains(grid);
        if chains.is_empty() {
            break;
        }
        if steps.len() == MAX_CASCADE_PASSES {
            error!(
                passes = MAX_CASCADE_PASSES,
                palette = source.palette().size(),
                "cascade did not settle; stopping resolution"
            );
            break;
        }

        let removed = remove_chains(grid, chains, table, *combo);
        let step_combo = *combo;
        combo.increment();
        let falls = apply_gravity(grid);
        let spawns = replenish(grid, source);

        debug!(
            combo = step_combo.value(),
            chains = removed.len(),
            falls = falls.len(),
            spawns = spawns.len(),
            "cascade pass resolved"
        );
        steps.push(CascadeStep {
            combo: step_combo,
            removed,
            falls,
            spawns,
        });
    }
    steps
}

fn remove_chains(
    grid: &mut Grid,
    chains: Vec<Chain>,
    table: &ScoreTable,
    combo: ComboMultiplier,
) -> Vec<ScoredChain> {
    chains
        .into_iter()
        .map(|chain| {
            for &pos in chain.cells() {
                grid.clear(pos);
            }
            let points = table.score(&chain, combo);
            ScoredChain { chain, points }
        })
        .collect()
}

/// Compacts every column downward.
///
/// Illegal cells split a column into independent segments: tokens rest on
/// top of an illegal cell and never pass through it. Relative order within a
/// segment is preserved.
fn apply_gravity(grid: &mut Grid) -> Vec<Fall> {
    let mut falls = vec![];
    for column in 0..grid.width() {
        let mut lowest_hole = None;
        for row in 0..grid.height() {
            let pos = Position::new(column, row);
            match grid.cell(pos) {
                Cell::Illegal => lowest_hole = None,
                Cell::Empty => {
                    lowest_hole.get_or_insert(row);
                }
                Cell::Occupied(kind) => {
                    let Some(to_row) = lowest_hole else {
                        continue;
                    };
                    grid.clear(pos);
                    grid.set_token(Position::new(column, to_row), kind);
                    falls.push(Fall {
                        column,
                        from_row: row,
                        to_row,
                        kind,
                    });
                    // Everything between the hole and `row` is empty now.
                    lowest_hole = Some(to_row + 1);
                }
            }
        }
    }
    falls
}

/// Fills every empty legal cell, scanning each column from the top down.
///
/// A spawn avoids the kind spawned just before it in the same column when
/// the palette offers an alternative.
fn replenish(grid: &mut Grid, source: &mut TokenSource) -> Vec<Spawn> {
    let mut spawns = vec![];
    for column in 0..grid.width() {
        let mut previous = None;
        for row in (0..grid.height()).rev() {
            let position = Position::new(column, row);
            if !grid.cell(position).is_empty() {
                continue;
            }
            let kind = previous
                .and_then(|prev| source.draw_excluding(&[prev]))
                .unwrap_or_else(|| source.draw());
            grid.set_token(position, kind);
            spawns.push(Spawn { position, kind });
            previous = Some(kind);
        }
    }
    spawns
}
