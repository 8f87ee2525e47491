//! Alpha-beta minimax over whole turns
//!
//! One ply is a complete turn: a placement or move together with the capture
//! it triggers, so a result never leaves a capture half-done.

use morris_core::{
    Layout, MillEffect, MoveKind, NodeIndex, Player, Rules, SearchRequest,
    MAX_TURNS_WITHOUT_MILL, NODE_COUNT,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Score of a won position before the depth bonus
pub const WIN_VALUE: i32 = 100_000;

/// Weight of one piece of material against one point of freedom
const MATERIAL_WEIGHT: i32 = 10;

/// Weight of a closed mill on board
const MILL_WEIGHT: i32 = 3;

// ============================================================================
// RESULTS
// ============================================================================

/// Move chosen by a search, expressed in node indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveResult {
    /// No legal move
    None,
    Place { node: NodeIndex },
    PlaceTake { node: NodeIndex, take: NodeIndex },
    Move { from: NodeIndex, to: NodeIndex },
    MoveTake { from: NodeIndex, to: NodeIndex, take: NodeIndex },
    /// Resolve a capture that was already pending
    Take { node: NodeIndex },
}

impl MoveResult {
    /// Node to capture after the main step, if any
    pub fn take(&self) -> Option<NodeIndex> {
        match *self {
            MoveResult::PlaceTake { take, .. } | MoveResult::MoveTake { take, .. } => Some(take),
            MoveResult::Take { node } => Some(node),
            _ => None,
        }
    }
}

/// Search parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Turns to look ahead
    pub depth: u32,
    /// Seed for tie breaking among equal moves
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { depth: 4, seed: 42 }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self { depth, ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

// ============================================================================
// SEARCH STATE
// ============================================================================

#[derive(Clone, Copy, Debug)]
struct State {
    rules: Rules,
    cells: [Option<Player>; NODE_COUNT],
    to_move: Player,
    kind: MoveKind,
    to_place: [u8; 2],
    on_board: [u8; 2],
    can_fly: [bool; 2],
    turns_without_mill: u32,
}

/// How a turn ended the game, from the mover's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Terminal {
    Won,
    Drawn,
}

impl State {
    fn from_request(request: &SearchRequest) -> Self {
        let position = request.position;
        Self {
            rules: request.mode.rules(),
            cells: *position.cells(),
            to_move: request.player,
            kind: request.kind,
            to_place: request.pieces_to_place,
            on_board: [
                position.count(Player::White) as u8,
                position.count(Player::Black) as u8,
            ],
            can_fly: request.can_fly,
            turns_without_mill: request.turns_without_mill,
        }
    }

    fn layout(&self) -> Layout {
        self.rules.layout
    }

    fn forms_mill(&self, node: NodeIndex, player: Player) -> bool {
        self.layout()
            .mill_lines(node)
            .any(|line| line.iter().all(|&n| self.cells[n] == Some(player)))
    }

    fn is_in_mill(&self, node: NodeIndex) -> bool {
        match self.cells[node] {
            Some(player) => self.forms_mill(node, player),
            None => false,
        }
    }

    fn nodes_of(&self, player: Player) -> impl Iterator<Item = NodeIndex> + '_ {
        (0..NODE_COUNT).filter(move |&n| self.cells[n] == Some(player))
    }

    /// Opponent nodes the mover may capture
    fn takeable(&self) -> Vec<NodeIndex> {
        let victim = self.to_move.opponent();
        let free: Vec<NodeIndex> = self.nodes_of(victim).filter(|&n| !self.is_in_mill(n)).collect();
        if free.is_empty() {
            self.nodes_of(victim).collect()
        } else {
            free
        }
    }

    fn destinations(&self, from: NodeIndex, player: Player) -> Vec<NodeIndex> {
        if self.can_fly[player.index()] {
            (0..NODE_COUNT).filter(|&n| self.cells[n].is_none()).collect()
        } else {
            self.layout()
                .neighbors(from)
                .iter()
                .copied()
                .filter(|&n| self.cells[n].is_none())
                .collect()
        }
    }

    fn has_move(&self, player: Player) -> bool {
        if self.to_place[player.index()] > 0 {
            return true;
        }
        self.nodes_of(player).any(|n| !self.destinations(n, player).is_empty())
    }

    /// Every complete turn for the side to move
    fn actions(&self) -> Vec<MoveResult> {
        let mut actions = Vec::new();
        let player = self.to_move;

        match self.kind {
            MoveKind::Take => {
                actions.extend(self.takeable().into_iter().map(|node| MoveResult::Take { node }));
            }
            MoveKind::Place => {
                for node in (0..NODE_COUNT).filter(|&n| self.cells[n].is_none()) {
                    let mut after = *self;
                    after.cells[node] = Some(player);
                    after.push_with_takes(&mut actions, node, |take| match take {
                        Some(take) => MoveResult::PlaceTake { node, take },
                        None => MoveResult::Place { node },
                    });
                }
            }
            MoveKind::Move => {
                for from in self.nodes_of(player) {
                    for to in self.destinations(from, player) {
                        let mut after = *self;
                        after.cells[from] = None;
                        after.cells[to] = Some(player);
                        after.push_with_takes(&mut actions, to, |take| match take {
                            Some(take) => MoveResult::MoveTake { from, to, take },
                            None => MoveResult::Move { from, to },
                        });
                    }
                }
            }
        }
        actions
    }

    /// Expand one step into its capture variants (self already has the piece in place)
    fn push_with_takes(
        &self,
        actions: &mut Vec<MoveResult>,
        landed: NodeIndex,
        make: impl Fn(Option<NodeIndex>) -> MoveResult,
    ) {
        let captures = self.rules.mill_effect == MillEffect::Capture
            && self.forms_mill(landed, self.to_move)
            && self.on_board[self.to_move.opponent().index()] > 0;
        if captures {
            actions.extend(self.takeable().into_iter().map(|take| make(Some(take))));
        } else {
            actions.push(make(None));
        }
    }

    /// Play a full turn; returns the new state and whether it ended the game
    fn apply(&self, action: MoveResult) -> (State, Option<Terminal>) {
        let mut next = *self;
        let player = self.to_move;
        let side = player.index();
        let mut mill = false;

        match action {
            MoveResult::None => {}
            MoveResult::Place { node } | MoveResult::PlaceTake { node, .. } => {
                next.cells[node] = Some(player);
                next.to_place[side] -= 1;
                next.on_board[side] += 1;
                mill = next.forms_mill(node, player);
            }
            MoveResult::Move { from, to } | MoveResult::MoveTake { from, to, .. } => {
                next.cells[from] = None;
                next.cells[to] = Some(player);
                mill = next.forms_mill(to, player);
                if mill {
                    next.turns_without_mill = 0;
                } else {
                    next.turns_without_mill += 1;
                }
            }
            MoveResult::Take { .. } => {}
        }

        if mill && self.rules.mill_effect == MillEffect::Win {
            return (next, Some(Terminal::Won));
        }

        if let Some(take) = action.take() {
            let victim = player.opponent().index();
            next.cells[take] = None;
            next.on_board[victim] -= 1;
            next.turns_without_mill = 0;
            let remaining = next.on_board[victim] + next.to_place[victim];
            if remaining <= 2 {
                return (next, Some(Terminal::Won));
            }
            if remaining == 3 && self.rules.mill_effect == MillEffect::Capture {
                next.can_fly[victim] = true;
            }
        }

        next.to_move = player.opponent();
        let placing = next.to_place != [0, 0];
        next.kind = if placing { MoveKind::Place } else { MoveKind::Move };

        if !placing {
            if next.turns_without_mill >= MAX_TURNS_WITHOUT_MILL {
                return (next, Some(Terminal::Drawn));
            }
            if !next.has_move(next.to_move) {
                let terminal = if next.has_move(player) { Terminal::Won } else { Terminal::Drawn };
                return (next, Some(terminal));
            }
        }
        (next, None)
    }

    /// Static score from the side to move's point of view
    fn evaluate(&self) -> i32 {
        let me = self.to_move;
        let them = me.opponent();
        let material = |p: Player| (self.on_board[p.index()] + self.to_place[p.index()]) as i32;
        let freedom = |p: Player| -> i32 {
            if self.can_fly[p.index()] {
                return 0;
            }
            self.nodes_of(p)
                .map(|n| self.layout().neighbors(n).iter().filter(|&&m| self.cells[m].is_none()).count() as i32)
                .sum()
        };
        let mills = |p: Player| -> i32 {
            self.layout()
                .mills()
                .iter()
                .filter(|line| line.iter().all(|&n| self.cells[n] == Some(p)))
                .count() as i32
        };

        (material(me) - material(them)) * MATERIAL_WEIGHT
            + (mills(me) - mills(them)) * MILL_WEIGHT
            + freedom(me)
            - freedom(them)
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Captures first, then plain steps
fn move_score(action: &MoveResult) -> i32 {
    match action {
        MoveResult::PlaceTake { .. } | MoveResult::MoveTake { .. } | MoveResult::Take { .. } => 10,
        MoveResult::Place { .. } | MoveResult::Move { .. } => 0,
        MoveResult::None => -10,
    }
}

fn ordered_actions(state: &State, rng: &mut ChaCha8Rng) -> Vec<MoveResult> {
    let mut actions = state.actions();
    actions.shuffle(rng);
    // Stable sort keeps the shuffled order among equals
    actions.sort_by_key(|a| -move_score(a));
    actions
}

// ============================================================================
// NEGAMAX WITH ALPHA-BETA
// ============================================================================

fn score_child(state: &State, action: MoveResult, depth: i32, alpha: i32, beta: i32) -> i32 {
    let (child, terminal) = state.apply(action);
    match terminal {
        Some(Terminal::Won) => WIN_VALUE + depth,
        Some(Terminal::Drawn) => 0,
        None => -negamax(&child, depth - 1, -beta, -alpha),
    }
}

fn negamax(state: &State, depth: i32, mut alpha: i32, beta: i32) -> i32 {
    if depth <= 0 {
        return state.evaluate();
    }

    let mut actions = state.actions();
    if actions.is_empty() {
        return -WIN_VALUE - depth;
    }
    actions.sort_by_key(|a| -move_score(a));

    let mut best = i32::MIN + 1;
    for action in actions {
        let score = score_child(state, action, depth, alpha, beta);
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Pick the best complete turn for the side to move in `request`
pub fn best_move(request: &SearchRequest, config: &SearchConfig) -> MoveResult {
    let state = State::from_request(request);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let actions = ordered_actions(&state, &mut rng);
    let depth = config.depth.max(1) as i32;

    let Some(&first) = actions.first() else {
        return MoveResult::None;
    };

    #[cfg(feature = "parallel")]
    let scores: Vec<i32> = {
        use rayon::prelude::*;
        actions
            .par_iter()
            .map(|&action| score_child(&state, action, depth, -WIN_VALUE * 2, WIN_VALUE * 2))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let scores: Vec<i32> = {
        let mut alpha = -WIN_VALUE * 2;
        actions
            .iter()
            .map(|&action| {
                let score = score_child(&state, action, depth, alpha, WIN_VALUE * 2);
                alpha = alpha.max(score);
                score
            })
            .collect()
    };

    let mut best = (first, scores[0]);
    for (&action, &score) in actions.iter().zip(&scores).skip(1) {
        if score > best.1 {
            best = (action, score);
        }
    }
    tracing::debug!("search depth {} picked {:?} (score {})", depth, best.0, best.1);
    best.0
}

/// Static evaluation of a request's position for the side to move
pub fn evaluate(request: &SearchRequest) -> i32 {
    State::from_request(request).evaluate()
}

/// All complete turns available in a request's position
pub fn legal_actions(request: &SearchRequest) -> Vec<MoveResult> {
    State::from_request(request).actions()
}
