use chrono::{DateTime, Utc};
use frogcrush_engine::{GameStats, LevelDefinition, Swap, TokenSeed};
use serde::{Deserialize, Serialize};

/// Recorded play session with enough metadata to replay it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSession {
    /// Timestamp when recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Seed used for shuffles and replenishment
    pub seed: TokenSeed,
    /// The level that was played
    pub level: LevelDefinition,
    /// Game statistics when the session ended
    pub final_stats: GameStats,
    /// Committed swaps in play order
    pub turns: Vec<TurnRecord>,
}

/// A single committed swap and what it earned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn number (0-indexed)
    pub turn: usize,
    pub swap: Swap,
    pub points: usize,
    /// Number of cascade passes the swap triggered
    pub cascades: usize,
    /// Whether the board was reshuffled after the cascade
    pub reshuffled: bool,
}
