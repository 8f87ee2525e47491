//! Play command - interactive game on stdin/stdout
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_options(), start_session(), game_loop(), finish()
//! - Level 3: drive(), apply_command()
//! - Level 4: command parsing

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;

use morris_core::{Direction, GameMode, Options, Player, PlayerKind, SavedGame};
use morris_session::{Click, GameSession, SessionConfig, TurnState};

use crate::render;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Options file (JSON); defaults are used when it is missing
    #[arg(long, value_name = "FILE", default_value = "morris-options.json")]
    pub options: PathBuf,

    /// Game mode: standard, twelve, jump, jump-plus
    #[arg(long)]
    pub mode: Option<GameMode>,

    /// Who plays white: human or computer
    #[arg(long)]
    pub white: Option<PlayerKind>,

    /// Who plays black: human or computer
    #[arg(long)]
    pub black: Option<PlayerKind>,

    /// AI search depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Resume a saved game
    #[arg(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    /// Where `save` and save-on-exit write
    #[arg(long, value_name = "FILE", default_value = "morris-last-game.dat")]
    pub save: PathBuf,
}

/// Parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Node(usize),
    Cursor(Direction),
    Select,
    Undo,
    Redo,
    Save(Option<PathBuf>),
    Help,
    Quit,
    Unknown(String),
}

/// Why the loop stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exit {
    Finished,
    Quit,
}

/// Real-time frame driver for the session
struct Driver {
    last_frame: Instant,
}

const THINK_POLL: Duration = Duration::from_millis(5);

const HELP: &str = "\
Commands:
  <0-23>         click a node
  w/a/s/d        move the cursor
  <enter>        click the node under the cursor
  undo, redo     step through history
  save [FILE]    save the game
  quit           leave (saves when save_on_exit is set)";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let options = load_options(&args)?;
    let mut session = start_session(&args, &options)?;

    tracing::info!(
        "Starting {} game: white={:?} black={:?}",
        session.board().mode(),
        session.player(Player::White),
        session.player(Player::Black)
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let exit = game_loop(&mut session, &args.save, stdin.lock(), stdout.lock())?;

    finish(&session, exit, &args, &options)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load options and apply command line overrides
fn load_options(args: &PlayArgs) -> Result<Options> {
    let mut options = Options::load(&args.options)
        .with_context(|| format!("Failed to load options: {}", args.options.display()))?;

    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(kind) = args.white {
        options.set_player(Player::White, kind);
    }
    if let Some(kind) = args.black {
        options.set_player(Player::Black, kind);
    }
    if let Some(depth) = args.depth {
        options.ai_depth = depth;
    }
    options.validate().context("Invalid options")?;
    Ok(options)
}

fn start_session(args: &PlayArgs, options: &Options) -> Result<GameSession> {
    let config = SessionConfig::from_options(options).instant();

    let mut session = GameSession::new(config, options.white_player, options.black_player);
    if let Some(path) = &args.load {
        let saved = SavedGame::load_from_file(path)
            .with_context(|| format!("Failed to load game: {}", path.display()))?;
        session.load(saved).context("Failed to resume game")?;
        if let Some(kind) = args.white {
            session.set_player(Player::White, kind);
        }
        if let Some(kind) = args.black {
            session.set_player(Player::Black, kind);
        }
    }
    session.camera_mut().set_sensitivity(options.sensitivity);
    Ok(session)
}

/// Read commands until the game ends or the player quits
fn game_loop<R: BufRead, W: Write>(
    session: &mut GameSession,
    save_path: &Path,
    mut input: R,
    mut out: W,
) -> Result<Exit> {
    let mut driver = Driver::new();
    writeln!(out, "{}", render::legend())?;
    writeln!(out, "{HELP}\n")?;

    loop {
        driver.drive(session);

        if let Some(error) = session.take_error() {
            let side = session.board().turn();
            writeln!(out, "Computer error: {error}; {side} is now played by a human")?;
            session.set_player(side, PlayerKind::Human);
            continue;
        }

        writeln!(out, "{}", render::board(session.board(), Some(session.cursor()), session.selected()))?;
        writeln!(out, "{}  [{}]", render::status(session.board()), session.clock().formatted())?;
        if session.board().is_game_over() {
            return Ok(Exit::Finished);
        }

        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Exit::Quit);
        }

        match parse_command(&line) {
            Command::Quit => return Ok(Exit::Quit),
            command => apply_command(session, command, save_path, &mut out)?,
        }
    }
}

/// Save on exit and report the result
fn finish(session: &GameSession, exit: Exit, args: &PlayArgs, options: &Options) -> Result<()> {
    match exit {
        Exit::Finished => {
            tracing::info!("Game over after {} turns: {}", session.board().turn_count(), render::status(session.board()));
        }
        Exit::Quit if options.save_on_exit => {
            session
                .to_saved_game()
                .save_to_file(&args.save)
                .with_context(|| format!("Failed to save game: {}", args.save.display()))?;
            println!("Saved to {}", args.save.display());
        }
        Exit::Quit => {}
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

impl Driver {
    fn new() -> Self {
        Self { last_frame: Instant::now() }
    }

    /// Update until a human must act, the game ends, or a computer turn fails
    fn drive(&mut self, session: &mut GameSession) {
        loop {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame).as_secs_f32();
            self.last_frame = now;
            session.update(dt);

            if session.awaiting_human() || session.error().is_some() {
                return;
            }
            if session.board().is_game_over() && session.state() == TurnState::NextPlayer {
                return;
            }
            if session.state() == TurnState::ComputerThinkingMove {
                std::thread::sleep(THINK_POLL);
            }
        }
    }
}

fn apply_command<W: Write>(
    session: &mut GameSession,
    command: Command,
    save_path: &Path,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Node(node) => report_click(session.click(node), out)?,
        Command::Select => report_click(session.select_focused(), out)?,
        Command::Cursor(direction) => {
            session.move_cursor(direction);
        }
        Command::Undo => {
            if let Err(e) = session.undo() {
                writeln!(out, "Cannot undo: {e}")?;
            }
        }
        Command::Redo => {
            if let Err(e) = session.redo() {
                writeln!(out, "Cannot redo: {e}")?;
            }
        }
        Command::Save(path) => {
            let path = path.as_deref().unwrap_or(save_path);
            match session.to_saved_game().save_to_file(path) {
                Ok(()) => writeln!(out, "Saved to {}", path.display())?,
                Err(e) => writeln!(out, "Save failed: {e}")?,
            }
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Unknown(text) => writeln!(out, "Unknown command `{text}` (try `help`)")?,
        Command::Quit => {}
    }
    Ok(())
}

fn report_click<W: Write>(click: Result<Click, morris_session::SessionError>, out: &mut W) -> Result<()> {
    match click {
        Ok(Click::Selected(node)) => writeln!(out, "Selected {node}")?,
        Ok(Click::Deselected) => writeln!(out, "Deselected")?,
        Ok(Click::Played(_)) => {}
        Err(e) => writeln!(out, "{e}")?,
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Command::Select;
    };

    match first.to_ascii_lowercase().as_str() {
        "w" | "up" => Command::Cursor(Direction::Up),
        "a" | "left" => Command::Cursor(Direction::Left),
        "s" | "down" => Command::Cursor(Direction::Down),
        "d" | "right" => Command::Cursor(Direction::Right),
        "u" | "undo" => Command::Undo,
        "r" | "redo" => Command::Redo,
        "save" => Command::Save(words.next().map(PathBuf::from)),
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(node) => Command::Node(node),
            Err(_) => Command::Unknown(line.to_string()),
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================
