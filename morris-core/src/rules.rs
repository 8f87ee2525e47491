//! Game modes and the rule parameters each one selects

use crate::graph::{Layout, NodeIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moves in a row without a mill before the game is drawn
pub const MAX_TURNS_WITHOUT_MILL: u32 = 40;

/// Occurrences of the same position that end the game in a draw
pub const REPETITION_LIMIT: u8 = 3;

/// Piece count at which a side may fly (standard-family modes)
pub const FLYING_THRESHOLD: u8 = 3;

/// Piece count at which a side has lost
pub const LOSING_PIECE_COUNT: u8 = 2;

/// Which game is being played
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Nine men's morris
    #[default]
    Standard,
    /// Twelve men's morris (diagonal mills)
    TwelveMensMorris,
    /// Three pieces each, already placed, every move flies, first mill wins
    Jump,
    /// Six pieces each, already placed, every move flies, first mill wins
    JumpPlus,
}

/// What completing a mill does
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MillEffect {
    /// The mover must take an opponent piece before the turn passes
    Capture,
    /// The mover wins on the spot
    Win,
}

/// Rule parameters derived from a [`GameMode`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub mode: GameMode,
    pub layout: Layout,
    pub pieces_per_side: u8,
    /// Nodes pre-occupied at game start (white, black); empty when the game opens with placement
    pub initial_white: &'static [NodeIndex],
    pub initial_black: &'static [NodeIndex],
    pub mill_effect: MillEffect,
    /// Every move may go to any empty node
    pub always_fly: bool,
}

const JUMP_WHITE: [NodeIndex; 3] = [4, 13, 15];
const JUMP_BLACK: [NodeIndex; 3] = [5, 11, 16];
const JUMP_PLUS_WHITE: [NodeIndex; 6] = [0, 3, 6, 17, 20, 23];
const JUMP_PLUS_BLACK: [NodeIndex; 6] = [2, 5, 8, 15, 18, 21];

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Standard,
        GameMode::TwelveMensMorris,
        GameMode::Jump,
        GameMode::JumpPlus,
    ];

    pub fn rules(self) -> Rules {
        match self {
            GameMode::Standard => Rules {
                mode: self,
                layout: Layout::NineMens,
                pieces_per_side: 9,
                initial_white: &[],
                initial_black: &[],
                mill_effect: MillEffect::Capture,
                always_fly: false,
            },
            GameMode::TwelveMensMorris => Rules {
                mode: self,
                layout: Layout::TwelveMens,
                pieces_per_side: 12,
                initial_white: &[],
                initial_black: &[],
                mill_effect: MillEffect::Capture,
                always_fly: false,
            },
            GameMode::Jump => Rules {
                mode: self,
                layout: Layout::NineMens,
                pieces_per_side: 3,
                initial_white: &JUMP_WHITE,
                initial_black: &JUMP_BLACK,
                mill_effect: MillEffect::Win,
                always_fly: true,
            },
            GameMode::JumpPlus => Rules {
                mode: self,
                layout: Layout::NineMens,
                pieces_per_side: 6,
                initial_white: &JUMP_PLUS_WHITE,
                initial_black: &JUMP_PLUS_BLACK,
                mill_effect: MillEffect::Win,
                always_fly: true,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameMode::Standard => "standard",
            GameMode::TwelveMensMorris => "twelve",
            GameMode::Jump => "jump",
            GameMode::JumpPlus => "jump-plus",
        }
    }
}

impl Rules {
    /// Whether the game opens with a placement phase
    pub fn has_placement(&self) -> bool {
        self.initial_white.is_empty() && self.initial_black.is_empty()
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown game mode `{s}` (expected standard, twelve, jump or jump-plus)"))
    }
}
