//! Match command - play computer games between two search depths
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_games(), report_results()
//! - Level 3: progress reporting
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use morris_core::{GameMode, MAX_AI_DEPTH};
use morris_session::{play_match, AiConfig, MatchConfig, MatchResult};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Game mode: standard, twelve, jump, jump-plus
    #[arg(long, default_value = "standard")]
    pub mode: GameMode,

    /// AI search depth of the first player
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// AI search depth of the second player (defaults to --depth)
    #[arg(long)]
    pub opponent_depth: Option<u32>,

    /// Maximum turns per game; longer games count as draws
    #[arg(long, default_value = "500")]
    pub max_turns: u32,

    /// Random seed (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Play games one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build the match configuration
/// 2. Play the games
/// 3. Report results
pub fn run(args: MatchArgs) -> Result<()> {
    let config = build_config(&args)?;

    tracing::info!(
        "Starting match: depth {} vs depth {} ({} games of {})",
        config.first.depth,
        config.second.depth,
        config.games,
        config.mode
    );

    let started = chrono::Local::now();
    let results = play_games(&config, args.json);
    report_results(&results, &config, started, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &MatchArgs) -> Result<MatchConfig> {
    let seed = resolve_seed(args.seed);
    for depth in [args.depth, args.opponent_depth.unwrap_or(args.depth)] {
        if !(1..=MAX_AI_DEPTH).contains(&depth) {
            anyhow::bail!("search depth must be between 1 and {MAX_AI_DEPTH}, got {depth}");
        }
    }

    Ok(MatchConfig {
        mode: args.mode,
        first: AiConfig::alpha_beta(args.depth).with_seed(seed),
        second: AiConfig::alpha_beta(args.opponent_depth.unwrap_or(args.depth)).with_seed(seed),
        games: args.games,
        max_turns: args.max_turns,
        parallel: !args.sequential,
    })
}

/// Play all games with a progress bar on stderr
fn play_games(config: &MatchConfig, quiet: bool) -> MatchResult {
    let progress = create_progress_bar(config.games as u64, quiet);
    let results = play_match(config, |outcome| {
        progress.inc(1);
        tracing::debug!("game finished in {} turns: {:?}", outcome.turns, outcome.ending);
    });
    progress.finish_and_clear();
    results
}

fn report_results(
    results: &MatchResult,
    config: &MatchConfig,
    started: chrono::DateTime<chrono::Local>,
    json: bool,
) -> Result<()> {
    if json {
        print_json_results(results, config, started)
    } else {
        print_text_results(results, config);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn create_progress_bar(games: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(games);
    match ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} games") {
        Ok(style) => bar.set_style(style),
        Err(e) => tracing::warn!("invalid progress template: {}", e),
    }
    bar
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

fn percent(count: u32, total: u32) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(
    results: &MatchResult,
    config: &MatchConfig,
    started: chrono::DateTime<chrono::Local>,
) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        started: String,
        mode: GameMode,
        first_depth: u32,
        second_depth: u32,
        seed: Option<u64>,
        first_score: f32,
        second_score: f32,
        #[serde(flatten)]
        results: &'a MatchResult,
    }

    let output = JsonOutput {
        started: started.to_rfc3339(),
        mode: config.mode,
        first_depth: config.first.depth,
        second_depth: config.second.depth,
        seed: config.first.seed,
        first_score: results.score_for_first(),
        second_score: results.score_for_second(),
        results,
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to encode results")?;
    println!("{}", json);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResult, config: &MatchConfig) {
    let total = results.games_played;

    println!("\n=== Match Results ===");
    println!("Mode:          {}", config.mode);
    println!("Total games:   {}", total);
    println!(
        "First wins:    {} ({:.1}%)  [depth {}]",
        results.first_wins,
        percent(results.first_wins, total),
        config.first.depth
    );
    println!(
        "Second wins:   {} ({:.1}%)  [depth {}]",
        results.second_wins,
        percent(results.second_wins, total),
        config.second.depth
    );
    println!("Draws:         {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("White wins:    {} ({:.1}%)", results.white_wins, percent(results.white_wins, total));
    println!("Avg turns:     {:.1}", results.avg_turns);

    println!("\nGame details:");
    for (i, game) in results.game_outcomes.iter().enumerate() {
        let result = match (game.ending, game.reason) {
            (Some(ending), Some(reason)) => format!("{:?} by {:?}", ending, reason),
            (Some(ending), None) => format!("{:?}", ending),
            (None, _) => "unfinished".to_string(),
        };
        println!("  Game {}: {} in {} turns", i + 1, result, game.turns);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MatchArgs {
        MatchArgs {
            games: 4,
            mode: GameMode::Jump,
            depth: 2,
            opponent_depth: Some(1),
            max_turns: 50,
            seed: Some(9),
            sequential: true,
            json: true,
        }
    }

    #[test]
    fn test_build_config() {
        let config = build_config(&args()).unwrap();
        assert_eq!(config.first.depth, 2);
        assert_eq!(config.second.depth, 1);
        assert_eq!(config.first.seed, Some(9));
        assert!(!config.parallel);
    }

    #[test]
    fn test_rejects_bad_depth() {
        let bad = MatchArgs { depth: 0, ..args() };
        assert!(build_config(&bad).is_err());
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(3, 0), 0.0);
    }

    #[test]
    fn test_play_games_counts_all() {
        let config = build_config(&args()).unwrap();
        let results = play_games(&config, true);
        assert_eq!(results.games_played, 4);
        assert_eq!(results.first_wins + results.second_wins + results.draws, 4);
    }
}
