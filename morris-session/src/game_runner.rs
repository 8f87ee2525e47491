//! Game runner - plays single computer-vs-computer games without a session
//!
//! Level 3 - Step-level implementation

use morris_ai::{best_move, MoveResult};
use morris_core::{Board, EndReason, Ending, GameMode, Outcome, Player};
use serde::Serialize;

use crate::config::AiConfig;
use crate::session::apply_move_result;

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    /// Final result, `None` if the turn cap was hit first
    pub ending: Option<Ending>,
    pub reason: Option<EndReason>,
    /// Turns played
    pub turns: u32,
    /// Move history
    pub moves: Vec<MoveResult>,
}

impl GameOutcome {
    pub fn white_wins(&self) -> bool {
        self.ending == Some(Ending::WinnerWhite)
    }

    pub fn black_wins(&self) -> bool {
        self.ending == Some(Ending::WinnerBlack)
    }

    /// Drawn by rule or unfinished at the turn cap
    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }

    pub fn winner(&self) -> Option<Player> {
        self.ending.and_then(Ending::winner)
    }
}

/// Game runner that plays one AI configuration against another
pub struct GameRunner {
    mode: GameMode,
    white: AiConfig,
    black: AiConfig,
    /// Random seed counter
    seed_counter: u64,
}

impl GameRunner {
    pub fn new(mode: GameMode, white: AiConfig, black: AiConfig) -> Self {
        let seed_counter = white.seed.unwrap_or(42);
        Self { mode, white, black, seed_counter }
    }

    /// Same configuration on both sides
    pub fn symmetric(mode: GameMode, config: AiConfig) -> Self {
        Self::new(mode, config, config)
    }

    /// Play a game from the mode's starting position
    pub fn play_game(&mut self, max_turns: u32) -> GameOutcome {
        self.play_from(Board::new(self.mode), max_turns)
    }

    /// Play a game from `board` until it ends or `max_turns` turns have passed
    pub fn play_from(&mut self, mut board: Board, max_turns: u32) -> GameOutcome {
        let mut moves = Vec::new();

        while !board.is_game_over() && board.turn_count() < max_turns {
            let ai = match board.turn() {
                Player::White => self.white,
                Player::Black => self.black,
            };
            let config = ai.search_config().with_seed(self.next_seed());
            let chosen = best_move(&board.search_request(), &config);
            if chosen == MoveResult::None {
                tracing::warn!("{} has no move on turn {}", board.turn(), board.turn_count());
                break;
            }

            if let Outcome::Rejected(rejection) = apply_move_result(&mut board, chosen) {
                tracing::warn!("search chose illegal {:?}: {}", chosen, rejection);
                break;
            }
            moves.push(chosen);
        }

        tracing::debug!("game finished after {} turns: {:?}", board.turn_count(), board.ending());
        GameOutcome {
            ending: board.ending(),
            reason: board.end_reason(),
            turns: board.turn_count(),
            moves,
        }
    }

    /// Get next seed and increment counter
    fn next_seed(&mut self) -> u64 {
        let seed = self.seed_counter;
        self.seed_counter = self.seed_counter.wrapping_add(1);
        seed
    }

    /// Reset seed counter
    pub fn reset_seed(&mut self, seed: u64) {
        self.seed_counter = seed;
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }
}
