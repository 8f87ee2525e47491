//! Nine Morris sessions - turn coordination around the rules engine
//!
//! This crate drives games:
//! - The per-frame turn state machine for interactive play
//! - Headless computer-vs-computer games
//! - Matches between two AI configurations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: GameSession::update, play_match (orchestration)
//! - Level 2: turn states, match phases
//! - Level 3: GameRunner::play_game, single steps
//! - Level 4: configuration

mod config;
mod game_runner;
mod match_play;
mod session;
mod state;

pub use config::{AiConfig, MatchConfig, SessionConfig};
pub use game_runner::{GameOutcome, GameRunner};
pub use match_play::{play_match, MatchResult};
pub use session::{apply_move_result, apply_step, GameSession};
pub use state::{Click, SessionError, TurnState};
