//! Inspect command - describe a save file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use morris_core::{EndReason, Ending, GameMode, Phase, Player, PlayerKind, SavedGame};

use crate::render;

#[derive(Args)]
pub struct InspectArgs {
    /// Save file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output a summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Per-color counters
#[derive(Serialize)]
struct SideSummary {
    player: PlayerKind,
    on_board: u8,
    to_place: u8,
    captured: u8,
    can_fly: bool,
}

#[derive(Serialize)]
struct SaveSummary {
    date: String,
    mode: GameMode,
    phase: Phase,
    turn: Player,
    turn_count: u32,
    clock: String,
    must_capture: bool,
    turns_without_mill: u32,
    ending: Option<Ending>,
    end_reason: Option<EndReason>,
    undo_steps: usize,
    redo_steps: usize,
    white: SideSummary,
    black: SideSummary,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let saved = SavedGame::load_from_file(&args.file)
        .with_context(|| format!("Failed to read save file: {}", args.file.display()))?;
    let summary = summarize(&saved);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&saved, &summary);
    }
    Ok(())
}

fn summarize(saved: &SavedGame) -> SaveSummary {
    let board = &saved.board;
    let side = |player: Player, kind: PlayerKind| SideSummary {
        player: kind,
        on_board: board.pieces_on_board(player),
        to_place: board.pieces_to_place(player),
        captured: board.captured(player),
        can_fly: board.can_fly(player),
    };

    SaveSummary {
        date: saved.date.clone(),
        mode: board.mode(),
        phase: board.phase(),
        turn: board.turn(),
        turn_count: board.turn_count(),
        clock: morris_core::GameClock::from_deciseconds(saved.time).formatted(),
        must_capture: board.must_capture(),
        turns_without_mill: board.turns_without_mill(),
        ending: board.ending(),
        end_reason: board.end_reason(),
        undo_steps: saved.history.undo_len(),
        redo_steps: saved.history.redo_len(),
        white: side(Player::White, saved.white_player),
        black: side(Player::Black, saved.black_player),
    }
}

fn print_text(saved: &SavedGame, summary: &SaveSummary) {
    println!("\n=== Saved Game ===");
    println!("Saved:       {}", summary.date);
    println!("Mode:        {}", summary.mode);
    println!("Phase:       {:?}", summary.phase);
    println!("Clock:       {}", summary.clock);
    println!("History:     {} undo, {} redo", summary.undo_steps, summary.redo_steps);
    for (name, side) in [("White", &summary.white), ("Black", &summary.black)] {
        println!(
            "{name}:       {:?}, {} on board, {} to place, {} captured{}",
            side.player,
            side.on_board,
            side.to_place,
            side.captured,
            if side.can_fly { ", flying" } else { "" }
        );
    }
    println!();
    print!("{}", render::board(&saved.board, None, None));
    println!("{}", render::status(&saved.board));
}
