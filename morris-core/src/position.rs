//! Pointer-free views of a board: the 24-cell position and the search snapshot

use crate::graph::{NodeIndex, NODE_COUNT};
use crate::rules::GameMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Index into per-color arrays
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::White => "white",
            Player::Black => "black",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Occupancy of every node, compared structurally
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GamePosition {
    cells: [Option<Player>; NODE_COUNT],
}

impl GamePosition {
    pub fn empty() -> Self {
        Self { cells: [None; NODE_COUNT] }
    }

    pub fn from_cells(cells: [Option<Player>; NODE_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Player>; NODE_COUNT] {
        &self.cells
    }

    pub fn set(&mut self, node: NodeIndex, cell: Option<Player>) {
        self.cells[node] = cell;
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }
}

impl Default for GamePosition {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<NodeIndex> for GamePosition {
    type Output = Option<Player>;

    fn index(&self, node: NodeIndex) -> &Self::Output {
        &self.cells[node]
    }
}

/// Which step the side to move has to make
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Place,
    Move,
    Take,
}

/// Everything a search needs, copied out of the board at search start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub mode: GameMode,
    pub position: GamePosition,
    pub player: Player,
    pub kind: MoveKind,
    pub pieces_to_place: [u8; 2],
    pub can_fly: [bool; 2],
    pub turns_without_mill: u32,
}
