//! Undo/redo over whole-game snapshots

use crate::board::Board;
use crate::camera::{CameraState, PointCameraController};
use crate::clock::GameClock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("cannot change history while a piece is moving")]
    PieceInFlight,
}

/// Self-contained copy of the game as it was before a move
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub camera: CameraState,
    /// Clock value in deciseconds
    pub time: u32,
}

impl Snapshot {
    pub fn capture(board: &Board, camera: &PointCameraController, clock: &GameClock) -> Self {
        Self { board: board.clone(), camera: camera.state(), time: clock.deciseconds() }
    }

    /// Write this snapshot back into the live objects.
    ///
    /// The controller keeps its camera binding; only its orientation changes.
    fn apply(self, board: &mut Board, camera: &mut PointCameraController, clock: &mut GameClock) {
        *board = self.board;
        camera.restore(self.camera);
        clock.set_deciseconds(self.time);
    }
}

/// The two history stacks
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UndoRedoState {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl UndoRedoState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the current state before a move is applied
    pub fn record(&mut self, board: &Board, camera: &PointCameraController, clock: &GameClock) {
        self.undo.push(Snapshot::capture(board, camera, clock));
        self.redo.clear();
    }

    /// Go back one move
    pub fn undo(
        &mut self,
        board: &mut Board,
        camera: &mut PointCameraController,
        clock: &mut GameClock,
    ) -> Result<(), HistoryError> {
        if board.any_in_flight() {
            return Err(HistoryError::PieceInFlight);
        }
        let previous = self.undo.pop().ok_or(HistoryError::NothingToUndo)?;
        self.redo.push(Snapshot::capture(board, camera, clock));
        previous.apply(board, camera, clock);
        tracing::debug!("undo ({} left, {} to redo)", self.undo.len(), self.redo.len());
        Ok(())
    }

    /// Replay the last undone move
    pub fn redo(
        &mut self,
        board: &mut Board,
        camera: &mut PointCameraController,
        clock: &mut GameClock,
    ) -> Result<(), HistoryError> {
        if board.any_in_flight() {
            return Err(HistoryError::PieceInFlight);
        }
        let next = self.redo.pop().ok_or(HistoryError::NothingToRedo)?;
        self.undo.push(Snapshot::capture(board, camera, clock));
        next.apply(board, camera, clock);
        tracing::debug!("redo ({} to undo, {} left)", self.undo.len(), self.redo.len());
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}
