//! Game rules and state management.
//!
//! This module implements the match-3 rules on top of the [`Grid`](crate::Grid):
//!
//! - [`find_chains`] - Detects runs of three or more and merges overlapping runs
//! - [`is_legal_swap`] - A swap is legal iff it creates at least one chain
//! - [`has_any_possible_move`] / [`possible_swaps`] - Searches for legal swaps
//! - [`resolve`] - Removes chains, applies gravity and replenishes until stable
//! - [`shuffle`] - Generates chain-free layouts that keep a move available
//! - [`ScoreTable`] / [`ComboMultiplier`] - Converts chains into points
//!
//! [`GameField`] bundles these into the engine facade a turn controller talks
//! to, and [`GameSession`] is such a turn controller: it owns the field plus
//! the score and move bookkeeping of one level.
//!
//! # Turn Flow
//!
//! 1. Construct a [`GameSession`] from a [`LevelDefinition`]; the board is shuffled
//! 2. The player proposes a swap; illegal swaps are rejected without cost
//! 3. Legal swaps are resolved into an ordered list of [`CascadeStep`]s
//! 4. Points and the move are booked; the board is reshuffled if no move remains
//! 5. Repeat until the target score is reached or the moves run out

pub use self::{
    cascade::*, detector::*, game_field::*, game_session::*, game_stats::*, level::*,
    possible_moves::*, scoring::*, shuffle::*, token_source::*, validator::*,
};

mod cascade;
mod detector;
mod game_field;
mod game_session;
mod game_stats;
mod level;
mod possible_moves;
mod scoring;
mod shuffle;
mod token_source;
mod validator;
