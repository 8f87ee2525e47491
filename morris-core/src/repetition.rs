//! Threefold repetition bookkeeping

use crate::graph::NodeIndex;
use crate::position::GamePosition;
use crate::rules::REPETITION_LIMIT;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A position plus the move context that produced it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepetitionKey {
    pub position: GamePosition,
    /// Piece that was just moved
    pub piece: usize,
    /// Node it arrived on
    pub node: NodeIndex,
}

/// Multiset of observed positions
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionHistory {
    counts: FxHashMap<RepetitionKey, u8>,
}

impl RepetitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more occurrence and return the new count
    pub fn observe(&mut self, key: RepetitionKey) -> u8 {
        let count = self.counts.entry(key).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn count(&self, key: &RepetitionKey) -> u8 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// True once `key` has been seen often enough to draw
    pub fn is_repeated(&self, key: &RepetitionKey) -> bool {
        self.count(key) >= REPETITION_LIMIT
    }

    /// Number of distinct positions seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Player;

    fn key(piece: usize, node: NodeIndex) -> RepetitionKey {
        let mut position = GamePosition::empty();
        position.set(node, Some(Player::White));
        RepetitionKey { position, piece, node }
    }

    #[test]
    fn test_counts_exact_matches_only() {
        let mut history = RepetitionHistory::new();
        assert_eq!(history.observe(key(0, 4)), 1);
        assert_eq!(history.observe(key(0, 4)), 2);
        // Same layout, different moved piece
        assert_eq!(history.observe(key(1, 4)), 1);
        assert!(!history.is_repeated(&key(0, 4)));
        assert_eq!(history.observe(key(0, 4)), 3);
        assert!(history.is_repeated(&key(0, 4)));
        assert_eq!(history.len(), 2);
    }
}
