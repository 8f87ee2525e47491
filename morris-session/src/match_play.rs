//! Match play - multiple games between two AI configurations
//!
//! Level 2 - Phase-level implementation

use rayon::prelude::*;
use serde::Serialize;

use crate::config::MatchConfig;
use crate::game_runner::{GameOutcome, GameRunner};

/// Result of a match, from the first configuration's point of view
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchResult {
    /// Wins for the first configuration
    pub first_wins: u32,
    /// Wins for the second configuration
    pub second_wins: u32,
    /// Draws, including games cut at the turn cap
    pub draws: u32,
    /// Games won by whoever played white
    pub white_wins: u32,
    /// Average game length in turns
    pub avg_turns: f32,
    pub games_played: u32,
    /// Individual game outcomes in game order
    pub game_outcomes: Vec<GameOutcome>,
}

impl MatchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_second(&self) -> f32 {
        self.second_wins as f32 + 0.5 * self.draws as f32
    }
}

/// Play a match (Level 2 phase)
///
/// Colors alternate each game; `on_game` is called as each game finishes.
pub fn play_match<F>(config: &MatchConfig, on_game: F) -> MatchResult
where
    F: Fn(&GameOutcome) + Sync,
{
    if config.games == 0 {
        return MatchResult::empty();
    }

    let game_configs = prepare_game_configs(config.games);
    let results = if config.parallel {
        execute_games_parallel(config, &game_configs, &on_game)
    } else {
        execute_games(config, &game_configs, &on_game)
    };
    aggregate_results(results)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Copy)]
struct GameConfig {
    /// Whether the first configuration plays white this game
    first_is_white: bool,
    /// Game index (for seeding)
    game_index: usize,
}

fn prepare_game_configs(games: usize) -> Vec<GameConfig> {
    (0..games)
        .map(|i| GameConfig {
            first_is_white: i % 2 == 0,
            game_index: i,
        })
        .collect()
}

fn execute_games<F>(config: &MatchConfig, game_configs: &[GameConfig], on_game: &F) -> Vec<GameOutcomeWithContext>
where
    F: Fn(&GameOutcome) + Sync,
{
    game_configs.iter().map(|gc| play_single_game(config, gc, on_game)).collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel<F>(
    config: &MatchConfig,
    game_configs: &[GameConfig],
    on_game: &F,
) -> Vec<GameOutcomeWithContext>
where
    F: Fn(&GameOutcome) + Sync,
{
    game_configs.par_iter().map(|gc| play_single_game(config, gc, on_game)).collect()
}

#[derive(Clone)]
struct GameOutcomeWithContext {
    outcome: GameOutcome,
    first_is_white: bool,
}

fn play_single_game<F>(config: &MatchConfig, gc: &GameConfig, on_game: &F) -> GameOutcomeWithContext
where
    F: Fn(&GameOutcome) + Sync,
{
    let (white, black) = if gc.first_is_white {
        (config.first, config.second)
    } else {
        (config.second, config.first)
    };

    let base_seed = config.first.seed.unwrap_or(42);
    let mut runner = GameRunner::new(config.mode, white, black);
    runner.reset_seed(base_seed.wrapping_add(gc.game_index as u64 * 1000));

    let outcome = runner.play_game(config.max_turns);
    on_game(&outcome);

    GameOutcomeWithContext {
        outcome,
        first_is_white: gc.first_is_white,
    }
}

/// Aggregate game outcomes into a match result
fn aggregate_results(outcomes: Vec<GameOutcomeWithContext>) -> MatchResult {
    let mut result = MatchResult::empty();
    let mut total_turns = 0u32;

    for owc in outcomes {
        total_turns += owc.outcome.turns;
        match owc.outcome.winner() {
            Some(winner) => {
                let first_won = (winner == morris_core::Player::White) == owc.first_is_white;
                if first_won {
                    result.first_wins += 1;
                } else {
                    result.second_wins += 1;
                }
                if owc.outcome.white_wins() {
                    result.white_wins += 1;
                }
            }
            None => result.draws += 1,
        }
        result.game_outcomes.push(owc.outcome);
    }

    result.games_played = result.game_outcomes.len() as u32;
    if result.games_played > 0 {
        result.avg_turns = total_turns as f32 / result.games_played as f32;
    }
    result
}
