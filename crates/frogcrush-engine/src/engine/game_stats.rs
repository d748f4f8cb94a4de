use serde::{Deserialize, Serialize};

use super::cascade::CascadeStep;

/// Score and move bookkeeping for one level.
///
/// Tracks:
///
/// - **Score**: Sum of the points of every removed chain
/// - **Moves remaining**: Decremented once per committed swap
/// - **Cascade counters**: Passes, chains removed and the longest cascade of a single turn
///
/// # Example
///
/// ```
/// use frogcrush_engine::GameStats;
///
/// let stats = GameStats::new(1000, 20);
/// assert_eq!(stats.score(), 0);
/// assert_eq!(stats.moves_remaining(), 20);
/// assert!(!stats.is_target_reached());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    score: usize,
    target_score: usize,
    moves_remaining: usize,
    turns_played: usize,
    cascades: usize,
    chains_removed: usize,
    best_combo: u32,
}

impl GameStats {
    #[must_use]
    pub const fn new(target_score: usize, moves: usize) -> Self {
        Self {
            score: 0,
            target_score,
            moves_remaining: moves,
            turns_played: 0,
            cascades: 0,
            chains_removed: 0,
            best_combo: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn target_score(&self) -> usize {
        self.target_score
    }

    #[must_use]
    pub const fn moves_remaining(&self) -> usize {
        self.moves_remaining
    }

    #[must_use]
    pub const fn turns_played(&self) -> usize {
        self.turns_played
    }

    /// Total number of cascade passes over all turns.
    #[must_use]
    pub const fn cascades(&self) -> usize {
        self.cascades
    }

    #[must_use]
    pub const fn chains_removed(&self) -> usize {
        self.chains_removed
    }

    /// Highest combo multiplier applied to any pass so far, or 0 before the first turn.
    #[must_use]
    pub const fn best_combo(&self) -> u32 {
        self.best_combo
    }

    #[must_use]
    pub const fn is_target_reached(&self) -> bool {
        self.score >= self.target_score
    }

    /// Books one committed swap and the cascade it triggered.
    ///
    /// Returns the points earned this turn.
    pub fn complete_turn(&mut self, steps: &[CascadeStep]) -> usize {
        let points = steps
            .iter()
            .map(CascadeStep::points)
            .fold(0, usize::saturating_add);
        self.score = self.score.saturating_add(points);
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.turns_played += 1;
        self.cascades += steps.len();
        self.chains_removed += steps.iter().map(|step| step.removed().len()).sum::<usize>();
        if let Some(last) = steps.last() {
            self.best_combo = self.best_combo.max(last.combo().value());
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ComboMultiplier, Grid, Palette, ScoreTable, TokenSeed, TokenSource, resolve,
    };

    use super::*;

    fn steps_for(s: &str) -> Vec<CascadeStep> {
        let mut grid: Grid = s.parse().unwrap();
        let mut source = TokenSource::with_seed(Palette::FULL, TokenSeed::from_bytes([9; 16]));
        let mut combo = ComboMultiplier::default();
        resolve(&mut grid, &mut source, &ScoreTable::default(), &mut combo)
    }

    #[test]
    fn test_complete_turn_books_points_and_move() {
        let steps = steps_for("CUD/UDC/MMM");
        let expected: usize = steps.iter().map(CascadeStep::points).sum();

        let mut stats = GameStats::new(100, 3);
        let points = stats.complete_turn(&steps);
        assert_eq!(points, expected);
        assert_eq!(stats.score(), expected);
        assert_eq!(stats.moves_remaining(), 2);
        assert_eq!(stats.turns_played(), 1);
        assert_eq!(stats.cascades(), steps.len());
        assert!(stats.chains_removed() >= 1);
        assert_eq!(stats.best_combo() as usize, steps.len());
        assert!(stats.is_target_reached());
    }

    #[test]
    fn test_moves_never_underflow() {
        let mut stats = GameStats::new(10, 1);
        assert_eq!(stats.complete_turn(&[]), 0);
        assert_eq!(stats.complete_turn(&[]), 0);
        assert_eq!(stats.moves_remaining(), 0);
        assert_eq!(stats.turns_played(), 2);
        assert_eq!(stats.best_combo(), 0);
        assert!(!stats.is_target_reached());
    }

    #[test]
    fn test_serialized_shape() {
        let stats = GameStats::new(500, 12);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["targetScore"], 500);
        assert_eq!(json["movesRemaining"], 12);
        let back: GameStats = serde_json::from_value(json).unwrap();
        assert_eq!(back, stats);
    }
}
