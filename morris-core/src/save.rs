//! Binary save files
//!
//! Layout: 4-byte magic, little-endian `u16` format version, then the
//! bincode-encoded [`SavedGame`].

use crate::board::Board;
use crate::camera::CameraState;
use crate::history::UndoRedoState;
use crate::options::PlayerKind;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

const MAGIC: &[u8; 4] = b"NMMS";
pub const FORMAT_VERSION: u16 = 1;

/// Date shown when there is no previous game
pub const NO_LAST_GAME: &str = "No Last Game";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to access save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt save file: {0}")]
    Corrupt(#[from] bincode::Error),
    #[error("not a save file")]
    NotASave,
    #[error("save format version {found} is not supported (expected {expected})")]
    Incompatible { found: u16, expected: u16 },
}

/// Everything needed to resume a game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub board: Board,
    pub camera: CameraState,
    /// Clock value in deciseconds
    pub time: u32,
    /// Local time the game was saved
    pub date: String,
    pub history: UndoRedoState,
    pub white_player: PlayerKind,
    pub black_player: PlayerKind,
}

impl Default for SavedGame {
    fn default() -> Self {
        Self {
            board: Board::default(),
            camera: CameraState::default(),
            time: 0,
            date: NO_LAST_GAME.to_string(),
            history: UndoRedoState::default(),
            white_player: PlayerKind::Human,
            black_player: PlayerKind::Computer,
        }
    }
}

impl SavedGame {
    /// Stamp the record with the current local time
    pub fn stamp_now(&mut self) {
        self.date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), SaveError> {
        writer.write_all(MAGIC)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, SaveError> {
        let mut magic = [0u8; 4];
        let mut version = [0u8; 2];
        if reader.read_exact(&mut magic).is_err() || &magic != MAGIC {
            return Err(SaveError::NotASave);
        }
        reader.read_exact(&mut version)?;
        let found = u16::from_le_bytes(version);
        if found != FORMAT_VERSION {
            return Err(SaveError::Incompatible { found, expected: FORMAT_VERSION });
        }
        Ok(bincode::deserialize_from(reader)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))?;
        tracing::info!("Saved game to {} ({})", path.display(), self.date);
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SaveError> {
        let file = std::fs::File::open(path)?;
        let saved = Self::read_from(std::io::BufReader::new(file))?;
        tracing::info!("Loaded game from {} ({})", path.display(), saved.date);
        Ok(saved)
    }

    /// Date of the game saved at `path`, or [`NO_LAST_GAME`] if there is none to resume
    pub fn last_game_date(path: &Path) -> String {
        match Self::load_from_file(path) {
            Ok(saved) if !saved.board.is_game_over() => saved.date,
            Ok(_) => NO_LAST_GAME.to_string(),
            Err(e) => {
                tracing::debug!("no last game at {}: {}", path.display(), e);
                NO_LAST_GAME.to_string()
            }
        }
    }
}
