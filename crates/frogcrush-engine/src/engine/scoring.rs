use serde::{Deserialize, Serialize};

use super::detector::{Chain, ChainShape};

/// Per-turn escalating score multiplier.
///
/// Starts at 1 at the beginning of every turn and grows by one after each
/// cascade pass. All chains removed in the same pass share one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComboMultiplier(u32);

impl Default for ComboMultiplier {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl ComboMultiplier {
    pub const INITIAL: Self = Self(1);

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    pub fn reset(&mut self) {
        *self = Self::INITIAL;
    }

    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }
}

/// Base points per chain shape.
///
/// Base points grow with the longest run of a chain: 3 → `three`, 4 → `four`,
/// 5 or more → `five_plus`. Junctions add `junction_bonus` on top of the base
/// for their longest run.
///
/// # Example
///
/// ```
/// use frogcrush_engine::{ComboMultiplier, Grid, ScoreTable, find_chains};
///
/// let table = ScoreTable::default();
/// let grid: Grid = "CCC".parse().unwrap();
/// let chain = &find_chains(&grid)[0];
///
/// let mut combo = ComboMultiplier::default();
/// assert_eq!(table.score(chain, combo), 60);
/// combo.increment();
/// assert_eq!(table.score(chain, combo), 120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreTable {
    pub three: usize,
    pub four: usize,
    pub five_plus: usize,
    pub junction_bonus: usize,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            three: 60,
            four: 120,
            five_plus: 200,
            junction_bonus: 60,
        }
    }
}

impl ScoreTable {
    /// Returns the points for a straight run of `length` tokens.
    #[must_use]
    pub fn base(&self, length: usize) -> usize {
        match length {
            0..=2 => 0,
            3 => self.three,
            4 => self.four,
            _ => self.five_plus,
        }
    }

    /// Points awarded for removing `chain` at the given multiplier.
    ///
    /// Saturates at `usize::MAX` for oversized tables.
    #[must_use]
    pub fn score(&self, chain: &Chain, combo: ComboMultiplier) -> usize {
        let mut base = self.base(chain.longest_run());
        if chain.shape() == ChainShape::Junction {
            base = base.saturating_add(self.junction_bonus);
        }
        base.saturating_mul(combo.value() as usize)
    }
}
