//! Game clock counting tenths of a second

use serde::{Deserialize, Serialize};

const TICK: f64 = 0.1;
const ROUNDING: f64 = 1e-9;

/// Elapsed play time, advanced explicitly by the main loop
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    /// Whole deciseconds elapsed
    deciseconds: u32,
    /// Seconds not yet folded into a whole tick
    #[serde(skip)]
    pending: f64,
    #[serde(skip)]
    running: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_deciseconds(deciseconds: u32) -> Self {
        Self { deciseconds, ..Self::default() }
    }

    /// Reset to zero and start counting
    pub fn start(&mut self) {
        self.deciseconds = 0;
        self.pending = 0.0;
        self.running = true;
    }

    /// Keep counting from the current value
    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add `dt` seconds if the clock is running
    pub fn advance(&mut self, dt: f64) {
        if !self.running {
            return;
        }
        self.pending += dt;
        let ticks = (self.pending / TICK + ROUNDING).floor();
        if ticks >= 1.0 {
            self.deciseconds += ticks as u32;
            self.pending = (self.pending - ticks * TICK).max(0.0);
        }
    }

    pub fn deciseconds(&self) -> u32 {
        self.deciseconds
    }

    /// Jump to a recorded value, keeping the running state
    pub fn set_deciseconds(&mut self, deciseconds: u32) {
        self.deciseconds = deciseconds;
        self.pending = 0.0;
    }

    /// `MM:SS`
    pub fn formatted(&self) -> String {
        let seconds = self.deciseconds / 10;
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }
}
