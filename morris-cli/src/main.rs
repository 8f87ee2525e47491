//! Nine Morris CLI - Command-line interface
//!
//! Commands:
//! - play: Play a game in the terminal
//! - match: Run computer-vs-computer games
//! - inspect: Describe a save file

mod inspect;
mod match_cmd;
mod play;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "morris")]
#[command(about = "Nine Men's Morris and variants")]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game on stdin/stdout
    Play(play::PlayArgs),
    /// Play computer games between two search depths
    Match(match_cmd::MatchArgs),
    /// Describe a save file
    Inspect(inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Match(args) => match_cmd::run(args),
        Commands::Inspect(args) => inspect::run(args),
    }
}

/// Log to stderr; `--verbose` wins over `RUST_LOG`, which wins over `info`
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
