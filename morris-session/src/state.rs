//! Turn states and session errors

use morris_ai::{MoveResult, SearchError};
use morris_core::{HistoryError, NodeIndex, Outcome, Rejection};
use thiserror::Error;

/// Where the current turn is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    /// Between turns; picks the next actor (frozen once the game is over)
    NextPlayer,
    HumanBeginMove,
    /// Waiting for clicks
    HumanThinkingMove,
    /// A human step is animating
    HumanDoingMove,
    HumanEndMove,
    ComputerBeginMove,
    /// Search running on the worker
    ComputerThinkingMove,
    /// A computer step is animating
    ComputerDoingMove,
    ComputerEndMove,
}

impl TurnState {
    pub fn is_computer(self) -> bool {
        matches!(
            self,
            TurnState::ComputerBeginMove
                | TurnState::ComputerThinkingMove
                | TurnState::ComputerDoingMove
                | TurnState::ComputerEndMove
        )
    }

    pub fn is_animating(self) -> bool {
        matches!(self, TurnState::HumanDoingMove | TurnState::ComputerDoingMove)
    }
}

/// Result of a click on a node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click {
    /// Own piece picked up for moving
    Selected(NodeIndex),
    Deselected,
    /// A step was applied to the board
    Played(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("illegal move: {0}")]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("computer search failed: {0}")]
    Search(#[from] SearchError),
    #[error("computer chose {chosen:?}, which is illegal: {reason}")]
    IllegalComputerMove { chosen: MoveResult, reason: Rejection },
    #[error("computer found no move")]
    NoComputerMove,
    #[error("not accepting input during {0:?}")]
    NotAccepting(TurnState),
    #[error("the computer is still thinking")]
    SearchRunning,
    #[error("the game is over")]
    GameOver,
}
