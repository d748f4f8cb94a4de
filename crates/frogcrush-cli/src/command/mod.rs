use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, generate_layout::GenerateLayoutArg};

mod auto_play;
mod generate_layout;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a level with the greedy player and record the session
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Print shuffled starting layouts for a level
    GenerateLayout(#[clap(flatten)] GenerateLayoutArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::GenerateLayout(arg) => generate_layout::run(&arg)?,
    }
    Ok(())
}
