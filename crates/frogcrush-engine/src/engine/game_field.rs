use crate::{
    OutOfBoundsError, ShuffleError,
    core::{Grid, Palette, Position, Swap, TileMask},
};

use super::{
    cascade::{self, CascadeStep},
    possible_moves,
    scoring::{ComboMultiplier, ScoreTable},
    shuffle::{self, ShuffleConfig},
    token_source::TokenSource,
    validator,
};

/// The engine facade: a grid plus everything needed to play on it.
///
/// `GameField` owns the grid, the seeded token source and the combo
/// multiplier. It holds no score or move bookkeeping; that belongs to the
/// turn controller (see [`GameSession`](super::GameSession)).
///
/// # Example
///
/// ```
/// use frogcrush_engine::{GameField, Palette, TileMask, TokenSeed, TokenSource};
///
/// let source = TokenSource::with_seed(Palette::FULL, TokenSeed::from_bytes([3; 16]));
/// let mut field = GameField::new(&TileMask::full(9, 9), source);
/// field.shuffle().unwrap();
///
/// field.reset_combo_multiplier();
/// let swap = field.possible_swaps()[0];
/// assert!(field.propose_swap(swap.first(), swap.second()).unwrap());
/// let steps = field.resolve();
/// assert!(!steps.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct GameField {
    grid: Grid,
    source: TokenSource,
    scoring: ScoreTable,
    shuffle_config: ShuffleConfig,
    combo: ComboMultiplier,
}

impl GameField {
    /// Creates a field with every legal cell empty; call [`Self::shuffle`] to fill it.
    #[must_use]
    pub fn new(mask: &TileMask, source: TokenSource) -> Self {
        Self::from_grid(Grid::new(mask), source)
    }

    /// Creates a field around an existing layout.
    #[must_use]
    pub fn from_grid(grid: Grid, source: TokenSource) -> Self {
        Self {
            grid,
            source,
            scoring: ScoreTable::default(),
            shuffle_config: ShuffleConfig::default(),
            combo: ComboMultiplier::default(),
        }
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoreTable) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn with_shuffle_config(mut self, shuffle_config: ShuffleConfig) -> Self {
        self.shuffle_config = shuffle_config;
        self
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        self.source.palette()
    }

    #[must_use]
    pub fn scoring(&self) -> &ScoreTable {
        &self.scoring
    }

    #[must_use]
    pub fn combo_multiplier(&self) -> ComboMultiplier {
        self.combo
    }

    /// Resets the combo multiplier to 1; call at the start of every turn.
    pub fn reset_combo_multiplier(&mut self) {
        self.combo.reset();
    }

    /// Validates and commits a swap between `a` and `b`.
    ///
    /// Returns `Ok(true)` if the swap creates a chain, in which case it has
    /// already been applied to the grid. Returns `Ok(false)` without touching
    /// the grid for non-adjacent positions, empty or illegal cells, and swaps
    /// that create no chain.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfBoundsError`] if either position lies outside the grid.
    pub fn propose_swap(&mut self, a: Position, b: Position) -> Result<bool, OutOfBoundsError> {
        self.grid.check_bounds(a)?;
        self.grid.check_bounds(b)?;
        Ok(Swap::new(a, b).is_some_and(|swap| self.try_swap(swap)))
    }

    /// Like [`Self::propose_swap`] for an already-validated adjacent pair.
    pub fn try_swap(&mut self, swap: Swap) -> bool {
        if !validator::is_legal_swap(&self.grid, swap) {
            return false;
        }
        self.grid.swap_tokens(swap);
        true
    }

    /// Drains all cascades; see [`cascade::resolve`].
    pub fn resolve(&mut self) -> Vec<CascadeStep> {
        cascade::resolve(
            &mut self.grid,
            &mut self.source,
            &self.scoring,
            &mut self.combo,
        )
    }

    /// Reassigns every legal cell and returns the new layout.
    ///
    /// The grid is unchanged if no valid layout is found.
    pub fn shuffle(&mut self) -> Result<Grid, ShuffleError> {
        shuffle::shuffle(&mut self.grid, &mut self.source, &self.shuffle_config)?;
        Ok(self.grid.clone())
    }

    #[must_use]
    pub fn has_any_possible_move(&self) -> bool {
        possible_moves::has_any_possible_move(&self.grid)
    }

    #[must_use]
    pub fn possible_swaps(&self) -> Vec<Swap> {
        possible_moves::possible_swaps(&self.grid)
    }
}
