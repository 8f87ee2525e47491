//! Static board geometry: the 24 points, their adjacency and mill lines
//!
//! Node numbering runs row by row from the top-left corner of the outer square:
//!
//! ```text
//!  0 ---------- 1 ---------- 2
//!  |   3 ------ 4 ------ 5   |
//!  |   |   6 -- 7 -- 8   |   |
//!  9 - 10 - 11      12 - 13 - 14
//!  |   |  15 - 16 - 17   |   |
//!  |  18 ----- 19 ----- 20   |
//! 21 --------- 22 --------- 23
//! ```

use serde::{Deserialize, Serialize};

/// Index of a point on the board (0..24)
pub type NodeIndex = usize;

/// Number of points on every supported board
pub const NODE_COUNT: usize = 24;

/// Which line/edge set the board uses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// Nine men's morris board: orthogonal edges, 16 mills
    NineMens,
    /// Twelve men's morris board: adds the four corner diagonals, 20 mills
    TwelveMens,
}

// ============================================================================
// TABLES
// ============================================================================

const NINE_MENS_NEIGHBORS: [&[NodeIndex]; NODE_COUNT] = [
    &[1, 9],
    &[0, 2, 4],
    &[1, 14],
    &[4, 10],
    &[1, 3, 5, 7],
    &[4, 13],
    &[7, 11],
    &[4, 6, 8],
    &[7, 12],
    &[0, 10, 21],
    &[3, 9, 11, 18],
    &[6, 10, 15],
    &[8, 13, 17],
    &[5, 12, 14, 20],
    &[2, 13, 23],
    &[11, 16],
    &[15, 17, 19],
    &[12, 16],
    &[10, 19],
    &[16, 18, 20, 22],
    &[13, 19],
    &[9, 22],
    &[19, 21, 23],
    &[14, 22],
];

const TWELVE_MENS_NEIGHBORS: [&[NodeIndex]; NODE_COUNT] = [
    &[1, 9, 3],
    &[0, 2, 4],
    &[1, 14, 5],
    &[4, 10, 0, 6],
    &[1, 3, 5, 7],
    &[4, 13, 2, 8],
    &[7, 11, 3],
    &[4, 6, 8],
    &[7, 12, 5],
    &[0, 10, 21],
    &[3, 9, 11, 18],
    &[6, 10, 15],
    &[8, 13, 17],
    &[5, 12, 14, 20],
    &[2, 13, 23],
    &[11, 16, 18],
    &[15, 17, 19],
    &[12, 16, 20],
    &[10, 19, 15, 21],
    &[16, 18, 20, 22],
    &[13, 19, 17, 23],
    &[9, 22, 18],
    &[19, 21, 23],
    &[14, 22, 20],
];

/// The 16 mills of the nine men's morris board
pub const NINE_MENS_MILLS: [[NodeIndex; 3]; 16] = [
    [0, 1, 2], [2, 14, 23], [21, 22, 23], [0, 9, 21],
    [3, 4, 5], [5, 13, 20], [18, 19, 20], [3, 10, 18],
    [6, 7, 8], [8, 12, 17], [15, 16, 17], [6, 11, 15],
    [1, 4, 7], [12, 13, 14], [16, 19, 22], [9, 10, 11],
];

/// The 20 mills of the twelve men's morris board (adds the corner diagonals)
pub const TWELVE_MENS_MILLS: [[NodeIndex; 3]; 20] = [
    [0, 1, 2], [2, 14, 23], [21, 22, 23], [0, 9, 21],
    [3, 4, 5], [5, 13, 20], [18, 19, 20], [3, 10, 18],
    [6, 7, 8], [8, 12, 17], [15, 16, 17], [6, 11, 15],
    [1, 4, 7], [12, 13, 14], [16, 19, 22], [9, 10, 11],
    [0, 3, 6], [2, 5, 8], [15, 18, 21], [17, 20, 23],
];

// ============================================================================
// LOOKUPS
// ============================================================================

impl Layout {
    /// Adjacent points of `node` (board edges, not mill lines)
    pub fn neighbors(self, node: NodeIndex) -> &'static [NodeIndex] {
        match self {
            Layout::NineMens => NINE_MENS_NEIGHBORS[node],
            Layout::TwelveMens => TWELVE_MENS_NEIGHBORS[node],
        }
    }

    /// Whether an edge joins `a` and `b`
    pub fn are_adjacent(self, a: NodeIndex, b: NodeIndex) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Every mill line of the board
    pub fn mills(self) -> &'static [[NodeIndex; 3]] {
        match self {
            Layout::NineMens => &NINE_MENS_MILLS,
            Layout::TwelveMens => &TWELVE_MENS_MILLS,
        }
    }

    /// All mill lines that pass through `node`
    pub fn mill_lines(self, node: NodeIndex) -> impl Iterator<Item = &'static [NodeIndex; 3]> {
        self.mills().iter().filter(move |mill| mill.contains(&node))
    }
}

/// Check that a raw index names a board point
pub fn is_valid_node(node: NodeIndex) -> bool {
    node < NODE_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_symmetric() {
        for layout in [Layout::NineMens, Layout::TwelveMens] {
            for a in 0..NODE_COUNT {
                for &b in layout.neighbors(a) {
                    assert!(layout.are_adjacent(b, a), "{layout:?}: {a} -> {b} not mirrored");
                }
            }
        }
    }

    #[test]
    fn test_neighbor_counts() {
        for node in 0..NODE_COUNT {
            let n = Layout::NineMens.neighbors(node).len();
            assert!((2..=4).contains(&n));
            let n = Layout::TwelveMens.neighbors(node).len();
            assert!((2..=4).contains(&n));
        }
        assert_eq!(Layout::NineMens.neighbors(4), &[1, 3, 5, 7]);
        assert!(!Layout::NineMens.are_adjacent(0, 3));
        assert!(Layout::TwelveMens.are_adjacent(0, 3));
    }

    #[test]
    fn test_every_node_in_two_mills() {
        for node in 0..NODE_COUNT {
            assert_eq!(Layout::NineMens.mill_lines(node).count(), 2, "node {node}");
        }
        // Corner diagonals add a third mill for some points
        assert_eq!(Layout::TwelveMens.mill_lines(3).count(), 3);
        assert_eq!(Layout::TwelveMens.mill_lines(1).count(), 2);
    }

    #[test]
    fn test_mill_lines_are_edges() {
        // Every consecutive pair in a mill line is joined by an edge
        for layout in [Layout::NineMens, Layout::TwelveMens] {
            for mill in layout.mills() {
                assert!(layout.are_adjacent(mill[0], mill[1]));
                assert!(layout.are_adjacent(mill[1], mill[2]));
            }
        }
    }
}
