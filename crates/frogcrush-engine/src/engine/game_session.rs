use tracing::{debug, info, instrument, warn};

use crate::{
    PlayError, SessionError,
    core::{Grid, Position, Swap},
};

use super::{
    GameStats,
    cascade::CascadeStep,
    game_field::GameField,
    level::LevelDefinition,
    token_source::{TokenSeed, TokenSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Won,
    OutOfMoves,
}

/// Everything that happened during one committed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    swap: Swap,
    steps: Vec<CascadeStep>,
    points: usize,
    reshuffle: Option<Grid>,
}

impl TurnReport {
    #[must_use]
    pub fn swap(&self) -> Swap {
        self.swap
    }

    /// Cascade passes in the order they happened.
    #[must_use]
    pub fn steps(&self) -> &[CascadeStep] {
        &self.steps
    }

    #[must_use]
    pub fn points(&self) -> usize {
        self.points
    }

    /// The new layout if the board was reshuffled after the cascade.
    #[must_use]
    pub fn reshuffle(&self) -> Option<&Grid> {
        self.reshuffle.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum TurnOutcome {
    /// The swap created no chain; nothing changed and no move was spent.
    Rejected,
    Resolved(TurnReport),
}

impl TurnOutcome {
    #[must_use]
    pub fn report(&self) -> Option<&TurnReport> {
        match self {
            Self::Rejected => None,
            Self::Resolved(report) => Some(report),
        }
    }
}

/// Turn controller for a single level.
///
/// Owns a [`GameField`] together with the [`GameStats`] of the attempt and
/// decides when the level is won or lost.
#[derive(Debug, Clone)]
pub struct GameSession {
    seed: TokenSeed,
    field: GameField,
    stats: GameStats,
    session_state: SessionState,
}

impl GameSession {
    /// Starts a level with a random seed.
    pub fn new(level: &LevelDefinition) -> Result<Self, SessionError> {
        Self::with_seed(level, rand::random())
    }

    /// Starts a level; the same level and seed always produce the same game.
    pub fn with_seed(level: &LevelDefinition, seed: TokenSeed) -> Result<Self, SessionError> {
        let mask = level.tile_mask()?;
        let source = TokenSource::with_seed(level.palette, seed);
        let mut field = GameField::new(&mask, source)
            .with_scoring(level.scoring)
            .with_shuffle_config(level.shuffle);
        field.shuffle()?;
        debug!(%seed, width = mask.width(), height = mask.height(), "session started");

        Ok(Self {
            seed,
            field,
            stats: GameStats::new(level.target_score, level.moves),
            session_state: SessionState::Playing,
        })
    }

    #[must_use]
    pub fn seed(&self) -> TokenSeed {
        self.seed
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Plays one turn.
    ///
    /// Illegal swaps return [`TurnOutcome::Rejected`] and cost nothing. A
    /// legal swap is resolved, booked and, if the board is left without a
    /// possible move, followed by a reshuffle.
    ///
    /// If that reshuffle fails the whole turn is undone: grid, stats and
    /// token source are restored to their state before the swap.
    #[instrument(skip(self))]
    pub fn play_swap(&mut self, a: Position, b: Position) -> Result<TurnOutcome, PlayError> {
        if !self.session_state.is_playing() {
            return Err(PlayError::SessionFinished);
        }

        self.field.reset_combo_multiplier();
        let before = (self.field.clone(), self.stats.clone());
        let committed = self.field.propose_swap(a, b)?;
        let swap = match Swap::new(a, b) {
            Some(swap) if committed => swap,
            _ => {
                debug!("swap rejected");
                return Ok(TurnOutcome::Rejected);
            }
        };

        let steps = self.field.resolve();
        let points = self.stats.complete_turn(&steps);
        debug!(points, cascades = steps.len(), "turn resolved");

        if self.stats.is_target_reached() {
            self.session_state = SessionState::Won;
            info!(score = self.stats.score(), "level won");
        } else if self.stats.moves_remaining() == 0 {
            self.session_state = SessionState::OutOfMoves;
            info!(score = self.stats.score(), "out of moves");
        }

        let mut reshuffle = None;
        if self.session_state.is_playing() && !self.field.has_any_possible_move() {
            info!("no possible move left, reshuffling");
            match self.field.shuffle() {
                Ok(grid) => reshuffle = Some(grid),
                Err(err) => {
                    warn!(%err, "reshuffle failed, undoing turn");
                    (self.field, self.stats) = before;
                    return Err(err.into());
                }
            }
        }

        Ok(TurnOutcome::Resolved(TurnReport {
            swap,
            steps,
            points,
            reshuffle,
        }))
    }

    /// Reshuffles the board without spending a move.
    pub fn shuffle(&mut self) -> Result<Grid, PlayError> {
        if !self.session_state.is_playing() {
            return Err(PlayError::SessionFinished);
        }
        Ok(self.field.shuffle()?)
    }
}
