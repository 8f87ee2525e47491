//! Configuration types for sessions and headless games

use morris_ai::SearchConfig;
use morris_core::{GameMode, Options};

/// AI configuration for computer players
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AiConfig {
    /// Search depth in whole turns
    pub depth: u32,
    /// Random seed for reproducibility (None = 42)
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self { depth: 4, seed: None }
    }
}

impl AiConfig {
    /// Create config for alpha-beta at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self { depth, ..Default::default() }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::with_depth(self.depth).with_seed(self.seed.unwrap_or(42))
    }
}

/// Configuration of an interactive session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub ai: AiConfig,
    /// Seconds a piece spends in flight after each step
    pub move_animation: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Standard,
            ai: AiConfig::default(),
            move_animation: 0.4,
        }
    }
}

impl SessionConfig {
    /// Session settings taken from persisted options
    pub fn from_options(options: &Options) -> Self {
        Self {
            mode: options.mode,
            ai: AiConfig::alpha_beta(options.ai_depth),
            ..Default::default()
        }
    }

    /// No animation delay
    pub fn instant(mut self) -> Self {
        self.move_animation = 0.0;
        self
    }
}

/// Configuration for a batch of computer-vs-computer games
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    pub mode: GameMode,
    /// Player that takes white in even games
    pub first: AiConfig,
    /// Player that takes white in odd games
    pub second: AiConfig,
    pub games: usize,
    /// Turn cap per game; games reaching it count as draws
    pub max_turns: u32,
    /// Whether to run games in parallel
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Standard,
            first: AiConfig::default(),
            second: AiConfig::default(),
            games: 10,
            max_turns: 500,
            parallel: true,
        }
    }
}
