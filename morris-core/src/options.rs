//! User options persisted as JSON

use crate::position::Player;
use crate::rules::GameMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Deepest search the options accept
pub const MAX_AI_DEPTH: u32 = 8;

/// Who controls a color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    Human,
    Computer,
}

impl std::str::FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "h" => Ok(PlayerKind::Human),
            "computer" | "ai" | "c" => Ok(PlayerKind::Computer),
            other => Err(format!("unknown player kind `{other}` (expected human or computer)")),
        }
    }
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to access options file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed options file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid option: {0}")]
    Invalid(String),
}

/// Persistent game options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub mode: GameMode,
    pub white_player: PlayerKind,
    pub black_player: PlayerKind,
    /// Search depth for computer players
    pub ai_depth: u32,
    /// Camera mouse sensitivity, best from 0.5 to 2.0
    pub sensitivity: f32,
    pub hide_timer: bool,
    pub save_on_exit: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: GameMode::Standard,
            white_player: PlayerKind::Human,
            black_player: PlayerKind::Computer,
            ai_depth: 4,
            sensitivity: 1.0,
            hide_timer: false,
            save_on_exit: true,
        }
    }
}

impl Options {
    pub fn player(&self, color: Player) -> PlayerKind {
        match color {
            Player::White => self.white_player,
            Player::Black => self.black_player,
        }
    }

    pub fn set_player(&mut self, color: Player, kind: PlayerKind) {
        match color {
            Player::White => self.white_player = kind,
            Player::Black => self.black_player = kind,
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(1..=MAX_AI_DEPTH).contains(&self.ai_depth) {
            return Err(OptionsError::Invalid(format!(
                "ai_depth must be between 1 and {MAX_AI_DEPTH}, got {}",
                self.ai_depth
            )));
        }
        if !(0.5..=2.0).contains(&self.sensitivity) {
            return Err(OptionsError::Invalid(format!(
                "sensitivity must be between 0.5 and 2.0, got {}",
                self.sensitivity
            )));
        }
        Ok(())
    }

    /// Read options; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no options file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let options: Options = serde_json::from_str(&content)?;
        options.validate()?;
        Ok(options)
    }

    /// Read options, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load options from {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), OptionsError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Saved options to {}", path.display());
        Ok(())
    }
}
