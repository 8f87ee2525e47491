//! Directional focus cursor over the 24 nodes

use crate::graph::{NodeIndex, NODE_COUNT};
use serde::{Deserialize, Serialize};

/// Logical arrow-key direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Remap an arrow key so that `Up` always points away from the camera.
    ///
    /// `camera_angle` is the orbit angle in degrees, bucketed into four
    /// 90 degree sectors centered on 0, 90, 180 and 270.
    pub fn calculate(self, camera_angle: f32) -> Self {
        let angle = (camera_angle as i32).rem_euclid(360);
        let sector = match angle {
            46..=135 => 1,
            136..=225 => 2,
            226..=315 => 3,
            _ => 0,
        };
        Self::from_index(self as usize + sector)
    }
}

/// Neighbors of one node as (up, down, left, right)
type Links = [Option<NodeIndex>; 4];

const fn links(up: i8, down: i8, left: i8, right: i8) -> Links {
    const fn opt(n: i8) -> Option<NodeIndex> {
        if n < 0 { None } else { Some(n as NodeIndex) }
    }
    [opt(up), opt(down), opt(left), opt(right)]
}

const LINKS: [Links; NODE_COUNT] = [
    links(-1, 9, -1, 1),
    links(-1, 4, 0, 2),
    links(-1, 14, 1, -1),
    links(-1, 10, -1, 4),
    links(1, 7, 3, 5),
    links(-1, 13, 4, -1),
    links(-1, 11, -1, 7),
    links(4, -1, 6, 8),
    links(-1, 12, 7, -1),
    links(0, 21, -1, 10),
    links(3, 18, 9, 11),
    links(6, 15, 10, -1),
    links(8, 17, -1, 13),
    links(5, 20, 12, 14),
    links(2, 23, 13, -1),
    links(11, -1, -1, 16),
    links(-1, 19, 15, 17),
    links(12, -1, 16, -1),
    links(10, -1, -1, 19),
    links(16, 22, 18, 20),
    links(13, -1, 19, -1),
    links(9, -1, -1, 22),
    links(19, -1, 21, 23),
    links(14, -1, 22, -1),
];

/// Node reached from `node` going `direction`, if any
pub fn neighbor(node: NodeIndex, direction: Direction) -> Option<NodeIndex> {
    let [up, down, left, right] = LINKS[node];
    match direction {
        Direction::Up => up,
        Direction::Down => down,
        Direction::Left => left,
        Direction::Right => right,
    }
}

/// Keyboard focus cursor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardNavigator {
    current: NodeIndex,
}

impl KeyboardNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> NodeIndex {
        self.current
    }

    /// Step toward `direction`; stays put at the edge of the graph
    pub fn move_to(&mut self, direction: Direction) -> NodeIndex {
        if let Some(next) = neighbor(self.current, direction) {
            self.current = next;
        }
        self.current
    }

    /// Step using a key pressed while the camera sits at `camera_angle`
    pub fn move_relative(&mut self, direction: Direction, camera_angle: f32) -> NodeIndex {
        self.move_to(direction.calculate(camera_angle))
    }
}
