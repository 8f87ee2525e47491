//! Nine Morris Core - rules engine and game state
//!
//! This crate provides everything that runs on the main loop:
//! - Board geometry (24 points, adjacency and mill lines)
//! - Game modes and the board rules engine
//! - Threefold repetition tracking
//! - Undo/redo over full snapshots
//! - Keyboard focus navigation
//! - Camera and clock value types
//! - Options (JSON) and save files (bincode)

pub mod graph;
pub mod rules;
pub mod position;
pub mod repetition;
pub mod board;
pub mod camera;
pub mod clock;
pub mod history;
pub mod keyboard;
pub mod options;
pub mod save;

// Re-exports for convenient access
pub use graph::{Layout, NodeIndex, NODE_COUNT};
pub use rules::{GameMode, MillEffect, Rules, MAX_TURNS_WITHOUT_MILL};
pub use position::{GamePosition, MoveKind, Player, SearchRequest};
pub use repetition::{RepetitionHistory, RepetitionKey};
pub use board::{Board, EndReason, Ending, Node, Outcome, Phase, Piece, PieceIndex, Rejection};
pub use camera::{CameraHandle, CameraInput, CameraState, PointCameraController};
pub use clock::GameClock;
pub use history::{HistoryError, Snapshot, UndoRedoState};
pub use keyboard::{Direction, KeyboardNavigator};
pub use options::{Options, OptionsError, PlayerKind, MAX_AI_DEPTH};
pub use save::{SaveError, SavedGame, FORMAT_VERSION, NO_LAST_GAME};
