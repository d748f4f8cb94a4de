use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use frogcrush_engine::{
    Chain, GameSession, Grid, LevelDefinition, Swap, TokenSeed, find_chains, possible_swaps,
};

use crate::{
    schema::record::{RecordedSession, TurnRecord},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Path to the level file (JSON format)
    level_path: PathBuf,
    /// Seed as 32 hex digits; random if omitted
    #[arg(long)]
    seed: Option<TokenSeed>,
    /// Output file path for the recording
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        level_path,
        seed,
        output,
    } = arg;

    let level: LevelDefinition = util::read_json_file("level", level_path)?;
    let seed = seed.unwrap_or_else(rand::random);
    let mut session = GameSession::with_seed(&level, seed)
        .with_context(|| format!("Failed to start level {}", level_path.display()))?;

    let mut turns = vec![];
    while session.session_state().is_playing() {
        let swap = best_swap(session.field().grid())
            .context("Board has no possible move after shuffle")?;
        let outcome = session.play_swap(swap.first(), swap.second())?;
        let report = outcome
            .report()
            .context("Greedy player proposed an illegal swap")?;
        turns.push(TurnRecord {
            turn: turns.len(),
            swap: report.swap(),
            points: report.points(),
            cascades: report.steps().len(),
            reshuffled: report.reshuffle().is_some(),
        });
    }

    let stats = session.stats();
    tracing::info!(
        state = ?session.session_state(),
        score = stats.score(),
        target = stats.target_score(),
        turns = stats.turns_played(),
        "session finished"
    );

    let record = RecordedSession {
        recorded_at: Utc::now(),
        seed,
        level,
        final_stats: stats.clone(),
        turns,
    };
    util::save_json(&record, output.as_deref())
}

/// Picks the possible swap whose immediate chains remove the most cells.
///
/// Ties go to the first swap in scan order.
fn best_swap(grid: &Grid) -> Option<Swap> {
    let mut best: Option<(Swap, usize)> = None;
    for swap in possible_swaps(grid) {
        let mut scratch = grid.clone();
        scratch.swap_tokens(swap);
        let removed = find_chains(&scratch).iter().map(Chain::size).sum();
        if best.is_none_or(|(_, most)| removed > most) {
            best = Some((swap, removed));
        }
    }
    best.map(|(swap, _)| swap)
}
