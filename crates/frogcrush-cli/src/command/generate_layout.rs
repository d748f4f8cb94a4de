use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use frogcrush_engine::{GameField, LevelDefinition, TokenSeed, TokenSource};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateLayoutArg {
    /// Path to the level file (JSON format)
    level_path: PathBuf,
    /// Seed as 32 hex digits; random if omitted
    #[arg(long)]
    seed: Option<TokenSeed>,
    /// Number of layouts to generate
    #[arg(long, default_value_t = 1)]
    count: usize,
}

pub(crate) fn run(arg: &GenerateLayoutArg) -> anyhow::Result<()> {
    let GenerateLayoutArg {
        level_path,
        seed,
        count,
    } = arg;

    let level: LevelDefinition = util::read_json_file("level", level_path)?;
    let mask = level
        .tile_mask()
        .with_context(|| format!("Invalid level file: {}", level_path.display()))?;
    let seed = seed.unwrap_or_else(rand::random);
    eprintln!("seed: {seed}");

    let source = TokenSource::with_seed(level.palette, seed);
    let mut field = GameField::new(&mask, source).with_shuffle_config(level.shuffle);

    let mut stdout = std::io::stdout().lock();
    for i in 0..*count {
        let layout = field
            .shuffle()
            .with_context(|| format!("Failed to generate layout #{i}"))?;
        if i > 0 {
            writeln!(stdout)?;
        }
        writeln!(stdout, "{layout}")?;
    }
    Ok(())
}
