//! Integration tests for the morris binary and the stack under it
//!
//! Tests the full stack: rules engine, search, sessions, save files and the CLI

use std::process::Command;

use morris_ai::{best_move, MoveResult, SearchConfig};
use morris_core::{Board, GameMode, Outcome, Player, PlayerKind, SavedGame};
use morris_session::{apply_move_result, GameRunner, AiConfig, GameSession, SessionConfig};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn morris() -> Command {
    Command::new(env!("CARGO_BIN_EXE_morris"))
}

/// Standard game a few placements in, with white to take
fn pending_capture() -> Board {
    let mut board = Board::new(GameMode::Standard);
    for node in [0, 9, 1, 10, 2] {
        board.place_piece(node);
    }
    board
}

// ============================================================================
// ENGINE + AI TESTS
// ============================================================================

#[test]
fn test_search_move_is_always_legal() {
    for mode in GameMode::ALL {
        let mut board = Board::new(mode);
        let config = SearchConfig::with_depth(2).with_seed(1);
        for _ in 0..30 {
            if board.is_game_over() {
                break;
            }
            let chosen = best_move(&board.search_request(), &config);
            assert_ne!(chosen, MoveResult::None, "{mode}: no move on turn {}", board.turn_count());
            let outcome = apply_move_result(&mut board, chosen);
            assert!(!outcome.is_rejected(), "{mode}: {chosen:?} rejected: {outcome:?}");
        }
    }
}

#[test]
fn test_search_finishes_pending_capture() {
    let mut board = pending_capture();
    let chosen = best_move(&board.search_request(), &SearchConfig::with_depth(2));
    assert!(matches!(chosen, MoveResult::Take { node: 9 | 10 }));
    assert!(matches!(apply_move_result(&mut board, chosen), Outcome::TurnSwitched { .. }));
    assert_eq!(board.turn(), Player::Black);
}

#[test]
fn test_headless_game_is_reproducible() {
    let config = AiConfig::alpha_beta(1).with_seed(21);
    let a = GameRunner::symmetric(GameMode::TwelveMensMorris, config).play_game(60);
    let b = GameRunner::symmetric(GameMode::TwelveMensMorris, config).play_game(60);
    assert_eq!(a.moves, b.moves);
    assert_eq!(a.ending, b.ending);
}

// ============================================================================
// CLI TESTS
// ============================================================================

#[test]
fn test_inspect_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.dat");
    let mut saved = SavedGame { board: pending_capture(), time: 123, ..SavedGame::default() };
    saved.stamp_now();
    saved.save_to_file(&path).unwrap();

    let output = morris().arg("inspect").arg(&path).arg("--json").output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["must_capture"], true);
    assert_eq!(summary["white"]["on_board"], 3);
    assert_eq!(summary["clock"], "00:12");
    assert_eq!(summary["date"], saved.date.as_str());
}

#[test]
fn test_inspect_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.dat");
    std::fs::write(&path, b"definitely not a save").unwrap();

    let output = morris().arg("inspect").arg(&path).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a save file"));
}

#[test]
fn test_match_json() {
    let output = morris()
        .args(["match", "--games", "2", "--mode", "jump", "--depth", "1", "--seed", "3"])
        .args(["--max-turns", "40", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results["games_played"], 2);
    assert_eq!(results["mode"], "Jump");
    assert_eq!(results["game_outcomes"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_play_script_saves_on_quit() {
    let dir = tempfile::tempdir().unwrap();
    let save = dir.path().join("last.dat");
    let options = dir.path().join("options.json");

    let mut child = morris()
        .args(["play", "--white", "human", "--black", "human"])
        .arg("--options")
        .arg(&options)
        .arg("--save")
        .arg(&save)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();
    {
        use std::io::Write;
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(b"4\n13\nquit\n").unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let saved = SavedGame::load_from_file(&save).unwrap();
    assert_eq!(saved.board.pieces_on_board(Player::White), 1);
    assert_eq!(saved.board.pieces_on_board(Player::Black), 1);
    assert_eq!(saved.white_player, PlayerKind::Human);
    assert_eq!(saved.history.undo_len(), 2);

    // And the session picks it back up
    let mut session = GameSession::new(SessionConfig::default().instant(), PlayerKind::Computer, PlayerKind::Computer);
    session.load(saved).unwrap();
    assert_eq!(session.board().turn(), Player::White);
    assert_eq!(session.player(Player::Black), PlayerKind::Human);
}
