//! Board state and move legality
//!
//! The board owns every node and piece. All entry points take node indices and
//! report the result as an [`Outcome`]; illegal requests come back as
//! [`Outcome::Rejected`] and leave the board untouched.

use crate::graph::{is_valid_node, NodeIndex, NODE_COUNT};
use crate::position::{GamePosition, MoveKind, Player, SearchRequest};
use crate::repetition::{RepetitionHistory, RepetitionKey};
use crate::rules::{
    GameMode, MillEffect, Rules, FLYING_THRESHOLD, LOSING_PIECE_COUNT, MAX_TURNS_WITHOUT_MILL,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Index of a piece in [`Board::pieces`]
pub type PieceIndex = usize;

/// One point of the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub index: NodeIndex,
    pub piece: Option<PieceIndex>,
}

/// A playing piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub index: PieceIndex,
    pub color: Player,
    /// Node the piece stands on; `None` before placement and after capture
    pub node: Option<NodeIndex>,
    pub alive: bool,
    /// Still being animated toward its node
    pub in_flight: bool,
}

/// Stage of the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    PlacePieces,
    MovePieces,
    GameOver,
}

/// Final result of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    WinnerWhite,
    WinnerBlack,
    Draw,
}

impl Ending {
    pub fn win_for(player: Player) -> Self {
        match player {
            Player::White => Ending::WinnerWhite,
            Player::Black => Ending::WinnerBlack,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Ending::WinnerWhite => Some(Player::White),
            Ending::WinnerBlack => Some(Player::Black),
            Ending::Draw => None,
        }
    }
}

/// Why the game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Loser was reduced to two pieces
    TooFewPieces,
    /// Side to move had no legal move
    Blocked,
    /// Neither side can move
    BothBlocked,
    /// A mill was closed in a mode where that wins outright
    MillFormed,
    /// Same position seen three times
    Repetition,
    /// Too many moves without a mill
    FortyTurns,
}

/// Result of a move request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A mill was formed; the same side must now take an opponent piece
    MustCapture { piece: PieceIndex },
    /// The move completed and the other side is to play
    TurnSwitched { piece: PieceIndex },
    /// The move ended the game
    GameOver { piece: PieceIndex, ending: Ending },
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }
}

/// Reason a move request was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("the game is over")]
    GameOver,
    #[error("not allowed during {0:?}")]
    WrongPhase(Phase),
    #[error("a piece must be taken first")]
    CapturePending,
    #[error("no capture is pending")]
    NoCapturePending,
    #[error("node {0} does not exist")]
    NodeOutOfRange(NodeIndex),
    #[error("node {0} is occupied")]
    NodeOccupied(NodeIndex),
    #[error("node {0} is empty")]
    NodeEmpty(NodeIndex),
    #[error("the piece on node {0} belongs to the opponent")]
    NotYourPiece(NodeIndex),
    #[error("the piece on node {0} is not an opponent piece")]
    NotOpponentPiece(NodeIndex),
    #[error("node {to} is not adjacent to node {from}")]
    NotAdjacent { from: NodeIndex, to: NodeIndex },
    #[error("the piece on node {0} is in a mill")]
    PieceInMill(NodeIndex),
    #[error("a piece is still moving")]
    PieceInFlight,
    #[error("no pieces left to place")]
    NoPiecesLeft,
    #[error("piece {0} does not exist")]
    NoSuchPiece(PieceIndex),
    #[error("too many pieces for this mode")]
    TooManyPieces,
}

// ============================================================================
// BOARD
// ============================================================================

/// Full game state: nodes, pieces and the bookkeeping counters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    mode: GameMode,
    nodes: [Node; NODE_COUNT],
    pieces: Vec<Piece>,
    phase: Phase,
    turn: Player,
    must_capture: bool,
    pieces_on_board: [u8; 2],
    pieces_to_place: [u8; 2],
    captured: [u8; 2],
    can_fly: [bool; 2],
    turns_without_mill: u32,
    turn_count: u32,
    ending: Option<Ending>,
    end_reason: Option<EndReason>,
    repetition: RepetitionHistory,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}

impl Board {
    /// Fresh board for `mode`, white to move
    pub fn new(mode: GameMode) -> Self {
        let rules = mode.rules();
        let mut board = Self::empty(mode);

        if rules.has_placement() {
            board.phase = Phase::PlacePieces;
            board.pieces_to_place = [rules.pieces_per_side; 2];
        } else {
            for (player, nodes) in [(Player::White, rules.initial_white), (Player::Black, rules.initial_black)] {
                for (slot, &node) in nodes.iter().enumerate() {
                    let index = board.first_piece(player) + slot;
                    board.put(index, node);
                }
                board.pieces_on_board[player.index()] = nodes.len() as u8;
            }
            board.phase = Phase::MovePieces;
        }
        board.can_fly = [rules.always_fly; 2];
        board
    }

    /// Mid-game position in the movement phase with the given pieces on board.
    ///
    /// Pieces not listed count as captured.
    pub fn with_position(
        mode: GameMode,
        white: &[NodeIndex],
        black: &[NodeIndex],
        turn: Player,
    ) -> Result<Self, Rejection> {
        let rules = mode.rules();
        let mut board = Self::empty(mode);

        for (player, nodes) in [(Player::White, white), (Player::Black, black)] {
            if nodes.len() > rules.pieces_per_side as usize {
                return Err(Rejection::TooManyPieces);
            }
            let first = board.first_piece(player);
            for (slot, &node) in nodes.iter().enumerate() {
                if !is_valid_node(node) {
                    return Err(Rejection::NodeOutOfRange(node));
                }
                if board.nodes[node].piece.is_some() {
                    return Err(Rejection::NodeOccupied(node));
                }
                board.put(first + slot, node);
            }
            for piece in &mut board.pieces[first + nodes.len()..first + rules.pieces_per_side as usize] {
                piece.alive = false;
            }
            let side = player.index();
            board.pieces_on_board[side] = nodes.len() as u8;
            board.captured[side] = rules.pieces_per_side - nodes.len() as u8;
            board.can_fly[side] = rules.always_fly
                || (rules.mill_effect == MillEffect::Capture && nodes.len() as u8 == FLYING_THRESHOLD);
        }

        board.phase = Phase::MovePieces;
        board.turn = turn;
        board.check_invariants();
        Ok(board)
    }

    fn empty(mode: GameMode) -> Self {
        let per_side = mode.rules().pieces_per_side as usize;
        let pieces = (0..per_side * 2)
            .map(|index| Piece {
                index,
                color: if index < per_side { Player::White } else { Player::Black },
                node: None,
                alive: true,
                in_flight: false,
            })
            .collect();

        Self {
            mode,
            nodes: std::array::from_fn(|index| Node { index, piece: None }),
            pieces,
            phase: Phase::PlacePieces,
            turn: Player::White,
            must_capture: false,
            pieces_on_board: [0; 2],
            pieces_to_place: [0; 2],
            captured: [0; 2],
            can_fly: [false; 2],
            turns_without_mill: 0,
            turn_count: 0,
            ending: None,
            end_reason: None,
            repetition: RepetitionHistory::new(),
        }
    }

    fn first_piece(&self, player: Player) -> PieceIndex {
        match player {
            Player::White => 0,
            Player::Black => self.rules().pieces_per_side as usize,
        }
    }

    fn put(&mut self, piece: PieceIndex, node: NodeIndex) {
        self.nodes[node].piece = Some(piece);
        self.pieces[piece].node = Some(node);
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn rules(&self) -> Rules {
        self.mode.rules()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn must_capture(&self) -> bool {
        self.must_capture
    }

    pub fn pieces_on_board(&self, player: Player) -> u8 {
        self.pieces_on_board[player.index()]
    }

    pub fn pieces_to_place(&self, player: Player) -> u8 {
        self.pieces_to_place[player.index()]
    }

    pub fn captured(&self, player: Player) -> u8 {
        self.captured[player.index()]
    }

    pub fn can_fly(&self, player: Player) -> bool {
        self.can_fly[player.index()]
    }

    pub fn turns_without_mill(&self) -> u32 {
        self.turns_without_mill
    }

    /// Number of completed turns
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn nodes(&self) -> &[Node; NODE_COUNT] {
        &self.nodes
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, index: PieceIndex) -> Option<&Piece> {
        self.pieces.get(index)
    }

    /// Piece standing on `node`, if any
    pub fn piece_at(&self, node: NodeIndex) -> Option<&Piece> {
        self.nodes.get(node)?.piece.map(|index| &self.pieces[index])
    }

    fn owner(&self, node: NodeIndex) -> Option<Player> {
        self.piece_at(node).map(|piece| piece.color)
    }

    pub fn repetition(&self) -> &RepetitionHistory {
        &self.repetition
    }

    /// Occupancy snapshot of every node
    pub fn position(&self) -> GamePosition {
        let mut position = GamePosition::empty();
        for node in 0..NODE_COUNT {
            position.set(node, self.owner(node));
        }
        position
    }

    /// Step the side to move has to make next
    pub fn move_kind(&self) -> MoveKind {
        if self.must_capture {
            MoveKind::Take
        } else if self.phase == Phase::PlacePieces {
            MoveKind::Place
        } else {
            MoveKind::Move
        }
    }

    /// Value copy handed to a search worker
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest {
            mode: self.mode,
            position: self.position(),
            player: self.turn,
            kind: self.move_kind(),
            pieces_to_place: self.pieces_to_place,
            can_fly: self.can_fly,
            turns_without_mill: self.turns_without_mill,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Whether the piece on `node` is part of a mill of its own color
    pub fn is_in_mill(&self, node: NodeIndex) -> bool {
        match self.owner(node) {
            Some(player) => self.forms_mill(node, player),
            None => false,
        }
    }

    fn forms_mill(&self, node: NodeIndex, player: Player) -> bool {
        self.rules()
            .layout
            .mill_lines(node)
            .any(|line| line.iter().all(|&n| self.owner(n) == Some(player)))
    }

    /// Whether the side to move may take the piece on `node` right now
    pub fn can_take(&self, node: NodeIndex) -> bool {
        if !self.must_capture || !is_valid_node(node) {
            return false;
        }
        let victim = self.turn.opponent();
        if self.owner(node) != Some(victim) {
            return false;
        }
        !self.is_in_mill(node) || self.all_in_mills(victim)
    }

    fn all_in_mills(&self, player: Player) -> bool {
        (0..NODE_COUNT)
            .filter(|&node| self.owner(node) == Some(player))
            .all(|node| self.is_in_mill(node))
    }

    /// Nodes the piece on `node` may move to this turn
    pub fn legal_destinations(&self, node: NodeIndex) -> Vec<NodeIndex> {
        if self.phase != Phase::MovePieces || self.must_capture || self.owner(node) != Some(self.turn) {
            return Vec::new();
        }
        if self.can_fly(self.turn) {
            (0..NODE_COUNT).filter(|&n| self.nodes[n].piece.is_none()).collect()
        } else {
            self.rules()
                .layout
                .neighbors(node)
                .iter()
                .copied()
                .filter(|&n| self.nodes[n].piece.is_none())
                .collect()
        }
    }

    /// Whether `player` has no legal move
    pub fn is_blocked(&self, player: Player) -> bool {
        if self.pieces_to_place(player) > 0 {
            return false;
        }
        let layout = self.rules().layout;
        let flying = self.can_fly(player);
        let has_empty = self.nodes.iter().any(|n| n.piece.is_none());

        !(0..NODE_COUNT)
            .filter(|&node| self.owner(node) == Some(player))
            .any(|node| {
                if flying {
                    has_empty
                } else {
                    layout.neighbors(node).iter().any(|&n| self.nodes[n].piece.is_none())
                }
            })
    }

    /// Whether any piece is still animating
    pub fn any_in_flight(&self) -> bool {
        self.pieces.iter().any(|piece| piece.in_flight)
    }

    // ========================================================================
    // ANIMATION HOOKS
    // ========================================================================

    /// Mark a piece as moving; moves are refused until it lands
    pub fn begin_flight(&mut self, piece: PieceIndex) -> Result<(), Rejection> {
        let piece = self.pieces.get_mut(piece).ok_or(Rejection::NoSuchPiece(piece))?;
        piece.in_flight = true;
        Ok(())
    }

    /// Mark a piece as settled on its node
    pub fn land(&mut self, piece: PieceIndex) -> Result<(), Rejection> {
        let piece = self.pieces.get_mut(piece).ok_or(Rejection::NoSuchPiece(piece))?;
        piece.in_flight = false;
        Ok(())
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    fn check_ready(&self, nodes: &[NodeIndex]) -> Result<(), Rejection> {
        if self.phase == Phase::GameOver {
            return Err(Rejection::GameOver);
        }
        if self.any_in_flight() {
            return Err(Rejection::PieceInFlight);
        }
        match nodes.iter().find(|&&node| !is_valid_node(node)) {
            Some(&node) => Err(Rejection::NodeOutOfRange(node)),
            None => Ok(()),
        }
    }

    /// Put the mover's next unplaced piece on `node`
    pub fn place_piece(&mut self, node: NodeIndex) -> Outcome {
        match self.try_place(node) {
            Ok(outcome) => outcome,
            Err(rejection) => self.reject(rejection),
        }
    }

    fn try_place(&mut self, node: NodeIndex) -> Result<Outcome, Rejection> {
        self.check_ready(&[node])?;
        if self.phase != Phase::PlacePieces {
            return Err(Rejection::WrongPhase(self.phase));
        }
        if self.must_capture {
            return Err(Rejection::CapturePending);
        }
        if self.nodes[node].piece.is_some() {
            return Err(Rejection::NodeOccupied(node));
        }
        let player = self.turn;
        let piece = self
            .pieces
            .iter()
            .position(|p| p.color == player && p.alive && p.node.is_none())
            .ok_or(Rejection::NoPiecesLeft)?;

        self.put(piece, node);
        let side = player.index();
        self.pieces_to_place[side] -= 1;
        self.pieces_on_board[side] += 1;
        tracing::debug!("{} placed piece {} on node {}", player, piece, node);

        if self.forms_mill(node, player) {
            Ok(self.mill_formed(piece))
        } else {
            Ok(self.switch_turn(piece))
        }
    }

    /// Move the mover's piece from `source` to `destination`
    pub fn move_piece(&mut self, source: NodeIndex, destination: NodeIndex) -> Outcome {
        match self.try_move(source, destination) {
            Ok(outcome) => outcome,
            Err(rejection) => self.reject(rejection),
        }
    }

    fn try_move(&mut self, source: NodeIndex, destination: NodeIndex) -> Result<Outcome, Rejection> {
        self.check_ready(&[source, destination])?;
        if self.phase != Phase::MovePieces {
            return Err(Rejection::WrongPhase(self.phase));
        }
        if self.must_capture {
            return Err(Rejection::CapturePending);
        }
        let player = self.turn;
        let piece = self.nodes[source].piece.ok_or(Rejection::NodeEmpty(source))?;
        if self.pieces[piece].color != player {
            return Err(Rejection::NotYourPiece(source));
        }
        if self.nodes[destination].piece.is_some() {
            return Err(Rejection::NodeOccupied(destination));
        }
        if !self.can_fly(player) && !self.rules().layout.are_adjacent(source, destination) {
            return Err(Rejection::NotAdjacent { from: source, to: destination });
        }

        self.nodes[source].piece = None;
        self.put(piece, destination);
        tracing::debug!("{} moved piece {} from {} to {}", player, piece, source, destination);

        if self.forms_mill(destination, player) {
            self.turns_without_mill = 0;
            return Ok(self.mill_formed(piece));
        }

        self.turns_without_mill += 1;
        let key = RepetitionKey { position: self.position(), piece, node: destination };
        self.repetition.observe(key);
        if self.repetition.is_repeated(&key) {
            return Ok(self.finish(piece, Ending::Draw, EndReason::Repetition));
        }
        Ok(self.switch_turn(piece))
    }

    /// Take the opponent piece on `node` after forming a mill
    pub fn take_piece(&mut self, node: NodeIndex) -> Outcome {
        match self.try_take(node) {
            Ok(outcome) => outcome,
            Err(rejection) => self.reject(rejection),
        }
    }

    fn try_take(&mut self, node: NodeIndex) -> Result<Outcome, Rejection> {
        self.check_ready(&[node])?;
        if !self.must_capture {
            return Err(Rejection::NoCapturePending);
        }
        let piece = self.nodes[node].piece.ok_or(Rejection::NodeEmpty(node))?;
        let victim = self.turn.opponent();
        if self.pieces[piece].color != victim {
            return Err(Rejection::NotOpponentPiece(node));
        }
        if !self.can_take(node) {
            return Err(Rejection::PieceInMill(node));
        }

        self.nodes[node].piece = None;
        let taken = &mut self.pieces[piece];
        taken.node = None;
        taken.alive = false;
        let side = victim.index();
        self.pieces_on_board[side] -= 1;
        self.captured[side] += 1;
        self.turns_without_mill = 0;
        self.must_capture = false;
        tracing::debug!("{} took piece {} on node {}", self.turn, piece, node);

        let remaining = self.pieces_on_board[side] + self.pieces_to_place[side];
        if remaining <= LOSING_PIECE_COUNT {
            return Ok(self.finish(piece, Ending::win_for(self.turn), EndReason::TooFewPieces));
        }
        if remaining == FLYING_THRESHOLD && self.rules().mill_effect == MillEffect::Capture {
            self.can_fly[side] = true;
            tracing::debug!("{} may now fly", victim);
        }
        Ok(self.switch_turn(piece))
    }

    fn reject(&self, rejection: Rejection) -> Outcome {
        tracing::debug!("rejected move for {}: {}", self.turn, rejection);
        Outcome::Rejected(rejection)
    }

    fn mill_formed(&mut self, piece: PieceIndex) -> Outcome {
        tracing::debug!("{} formed a mill", self.turn);
        match self.rules().mill_effect {
            MillEffect::Win => self.finish(piece, Ending::win_for(self.turn), EndReason::MillFormed),
            MillEffect::Capture => {
                if self.pieces_on_board(self.turn.opponent()) == 0 {
                    // Nothing to take
                    return self.switch_turn(piece);
                }
                self.must_capture = true;
                self.check_invariants();
                Outcome::MustCapture { piece }
            }
        }
    }

    fn switch_turn(&mut self, piece: PieceIndex) -> Outcome {
        self.turn = self.turn.opponent();
        self.turn_count += 1;

        if self.phase == Phase::PlacePieces && self.pieces_to_place == [0, 0] {
            self.phase = Phase::MovePieces;
            tracing::info!("all pieces placed after {} turns", self.turn_count);
        }

        if self.phase == Phase::MovePieces {
            if self.turns_without_mill >= MAX_TURNS_WITHOUT_MILL {
                return self.finish(piece, Ending::Draw, EndReason::FortyTurns);
            }
            if self.is_blocked(self.turn) {
                return if self.is_blocked(self.turn.opponent()) {
                    self.finish(piece, Ending::Draw, EndReason::BothBlocked)
                } else {
                    self.finish(piece, Ending::win_for(self.turn.opponent()), EndReason::Blocked)
                };
            }
        }

        self.check_invariants();
        Outcome::TurnSwitched { piece }
    }

    fn finish(&mut self, piece: PieceIndex, ending: Ending, reason: EndReason) -> Outcome {
        self.phase = Phase::GameOver;
        self.ending = Some(ending);
        self.end_reason = Some(reason);
        self.must_capture = false;
        tracing::info!("game over after {} turns: {:?} ({:?})", self.turn_count, ending, reason);
        self.check_invariants();
        Outcome::GameOver { piece, ending }
    }

    fn check_invariants(&self) {
        let per_side = self.rules().pieces_per_side;
        for player in [Player::White, Player::Black] {
            let side = player.index();
            debug_assert_eq!(
                self.pieces_on_board[side] + self.pieces_to_place[side] + self.captured[side],
                per_side,
                "piece bookkeeping drifted for {player}"
            );
            debug_assert_eq!(
                self.pieces_on_board[side] as usize,
                self.position().count(player),
                "on-board count disagrees with nodes for {player}"
            );
        }
        debug_assert!(!(self.must_capture && self.phase == Phase::GameOver));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_MILL_WHITE: [NodeIndex; 9] = [0, 2, 4, 9, 13, 15, 17, 19, 23];
    const NO_MILL_BLACK: [NodeIndex; 9] = [1, 3, 6, 8, 10, 14, 16, 20, 22];

    fn play(board: &mut Board, moves: &[(NodeIndex, NodeIndex)]) {
        for &(from, to) in moves {
            let outcome = board.move_piece(from, to);
            assert!(!outcome.is_rejected(), "{from}->{to}: {outcome:?}");
        }
    }

    #[test]
    fn test_new_standard_board() {
        let board = Board::new(GameMode::Standard);
        assert_eq!(board.phase(), Phase::PlacePieces);
        assert_eq!(board.turn(), Player::White);
        assert_eq!(board.pieces().len(), 18);
        assert_eq!(board.pieces_to_place(Player::Black), 9);
        assert_eq!(board.pieces_on_board(Player::White), 0);
        assert_eq!(board.move_kind(), MoveKind::Place);
    }

    #[test]
    fn test_place_and_take_scenario() {
        let mut board = Board::new(GameMode::Standard);
        assert_eq!(board.place_piece(0), Outcome::TurnSwitched { piece: 0 });
        assert!(matches!(board.place_piece(9), Outcome::TurnSwitched { .. }));
        assert!(matches!(board.place_piece(1), Outcome::TurnSwitched { .. }));
        assert!(matches!(board.place_piece(10), Outcome::TurnSwitched { .. }));

        let outcome = board.place_piece(2);
        assert!(matches!(outcome, Outcome::MustCapture { .. }));
        assert!(board.must_capture());
        assert_eq!(board.turn(), Player::White);
        assert_eq!(board.move_kind(), MoveKind::Take);

        // Nothing else is allowed until the capture resolves
        assert_eq!(board.place_piece(5), Outcome::Rejected(Rejection::CapturePending));
        assert_eq!(board.take_piece(0), Outcome::Rejected(Rejection::NotOpponentPiece(0)));

        let turns_before = board.turn_count();
        assert!(matches!(board.take_piece(9), Outcome::TurnSwitched { .. }));
        assert_eq!(board.turn(), Player::Black);
        assert_eq!(board.turn_count(), turns_before + 1);
        assert_eq!(board.pieces_on_board(Player::Black), 1);
        assert_eq!(board.captured(Player::Black), 1);
        assert!(board.piece_at(9).is_none());
        assert!(!board.must_capture());
    }

    #[test]
    fn test_place_rejections() {
        let mut board = Board::new(GameMode::Standard);
        board.place_piece(4);
        assert_eq!(board.place_piece(4), Outcome::Rejected(Rejection::NodeOccupied(4)));
        assert_eq!(board.place_piece(24), Outcome::Rejected(Rejection::NodeOutOfRange(24)));
        assert_eq!(board.take_piece(4), Outcome::Rejected(Rejection::NoCapturePending));
        assert_eq!(board.move_piece(4, 5), Outcome::Rejected(Rejection::WrongPhase(Phase::PlacePieces)));
        // Rejections leave the board untouched
        assert_eq!(board.turn(), Player::Black);
        assert_eq!(board.pieces_on_board(Player::White), 1);
    }

    #[test]
    fn test_placement_ends_in_move_phase() {
        let mut board = Board::new(GameMode::Standard);
        for (w, b) in NO_MILL_WHITE.iter().zip(NO_MILL_BLACK.iter()) {
            assert!(matches!(board.place_piece(*w), Outcome::TurnSwitched { .. }));
            assert!(matches!(board.place_piece(*b), Outcome::TurnSwitched { .. }));
        }
        assert_eq!(board.phase(), Phase::MovePieces);
        assert_eq!(board.turn(), Player::White);
        assert_eq!(board.turn_count(), 18);
        // Placements do not count toward the forty-turn rule
        assert_eq!(board.turns_without_mill(), 0);
        assert_eq!(board.legal_destinations(4), vec![5, 7]);
        assert!(board.legal_destinations(0).is_empty());
    }

    #[test]
    fn test_move_requires_adjacency() {
        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 4, 15, 20],
            &[2, 9, 17, 22],
            Player::White,
        )
        .unwrap();
        assert_eq!(
            board.move_piece(0, 5),
            Outcome::Rejected(Rejection::NotAdjacent { from: 0, to: 5 })
        );
        assert_eq!(board.move_piece(2, 1), Outcome::Rejected(Rejection::NotYourPiece(2)));
        assert_eq!(board.move_piece(1, 0), Outcome::Rejected(Rejection::NodeEmpty(1)));
        assert_eq!(board.move_piece(0, 9), Outcome::Rejected(Rejection::NodeOccupied(9)));
        assert!(matches!(board.move_piece(0, 1), Outcome::TurnSwitched { .. }));
        assert_eq!(board.turns_without_mill(), 1);
    }

    #[test]
    fn test_flying_with_three_pieces() {
        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 4, 15],
            &[2, 9, 17, 22],
            Player::White,
        )
        .unwrap();
        assert!(board.can_fly(Player::White));
        assert!(!board.can_fly(Player::Black));
        assert_eq!(board.legal_destinations(0).len(), NODE_COUNT - 7);
        assert!(matches!(board.move_piece(0, 23), Outcome::TurnSwitched { .. }));
        assert_eq!(
            board.move_piece(2, 12),
            Outcome::Rejected(Rejection::NotAdjacent { from: 2, to: 12 })
        );
    }

    #[test]
    fn test_cannot_take_from_mill_unless_all_milled() {
        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 1, 14],
            &[3, 4, 5, 20],
            Player::White,
        )
        .unwrap();
        assert!(matches!(board.move_piece(14, 2), Outcome::MustCapture { .. }));
        assert!(!board.can_take(4));
        assert!(board.can_take(20));
        assert_eq!(board.take_piece(4), Outcome::Rejected(Rejection::PieceInMill(4)));

        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 1, 14, 10],
            &[3, 4, 5, 18, 19, 20],
            Player::White,
        )
        .unwrap();
        assert!(matches!(board.move_piece(14, 2), Outcome::MustCapture { .. }));
        assert!(board.can_take(4));
        assert!(matches!(board.take_piece(4), Outcome::TurnSwitched { .. }));
    }

    #[test]
    fn test_reduced_to_two_pieces_loses() {
        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 1, 14],
            &[9, 10, 20],
            Player::White,
        )
        .unwrap();
        assert!(matches!(board.move_piece(14, 2), Outcome::MustCapture { .. }));
        let outcome = board.take_piece(20);
        assert!(matches!(outcome, Outcome::GameOver { ending: Ending::WinnerWhite, .. }));
        assert_eq!(board.ending(), Some(Ending::WinnerWhite));
        assert_eq!(board.end_reason(), Some(EndReason::TooFewPieces));
        assert_eq!(board.pieces_on_board(Player::Black), 2);
        assert_eq!(board.place_piece(5), Outcome::Rejected(Rejection::GameOver));
    }

    #[test]
    fn test_capture_enables_flying() {
        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 1, 14, 23],
            &[9, 10, 20, 6],
            Player::White,
        )
        .unwrap();
        assert!(matches!(board.move_piece(14, 2), Outcome::MustCapture { .. }));
        assert!(matches!(board.take_piece(6), Outcome::TurnSwitched { .. }));
        assert!(board.can_fly(Player::Black));
        assert_eq!(board.turns_without_mill(), 0);
    }

    #[test]
    fn test_threefold_repetition_draws_on_third() {
        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 4, 15, 20],
            &[2, 9, 17, 22],
            Player::White,
        )
        .unwrap();
        let cycle = [(0, 1), (22, 21), (1, 0), (21, 22)];
        play(&mut board, &cycle);
        play(&mut board, &cycle);
        assert!(!board.is_game_over());

        let outcome = board.move_piece(0, 1);
        assert!(matches!(outcome, Outcome::GameOver { ending: Ending::Draw, .. }));
        assert_eq!(board.end_reason(), Some(EndReason::Repetition));
    }

    #[test]
    fn test_forty_moves_without_mill_draws() {
        // Both sides fly one piece around a short loop; no line holds both fixed pieces
        let white_loop = [0, 2, 23];
        let black_loop = [3, 5, 18, 20];
        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 9, 13],
            &[3, 7, 19],
            Player::White,
        )
        .unwrap();

        for round in 0..20 {
            let (from, to) = (white_loop[round % 3], white_loop[(round + 1) % 3]);
            assert!(matches!(board.move_piece(from, to), Outcome::TurnSwitched { .. }), "round {round}");
            assert_eq!(board.turns_without_mill(), 2 * round as u32 + 1);

            let (from, to) = (black_loop[round % 4], black_loop[(round + 1) % 4]);
            let outcome = board.move_piece(from, to);
            if round < 19 {
                assert!(matches!(outcome, Outcome::TurnSwitched { .. }), "round {round}");
            } else {
                assert!(matches!(outcome, Outcome::GameOver { ending: Ending::Draw, .. }));
            }
        }
        assert_eq!(board.turns_without_mill(), MAX_TURNS_WITHOUT_MILL);
        assert_eq!(board.end_reason(), Some(EndReason::FortyTurns));
    }

    #[test]
    fn test_blocked_side_loses() {
        let mut board = Board::with_position(
            GameMode::Standard,
            &[0, 2, 21, 23],
            &[1, 9, 14, 22, 16],
            Player::Black,
        )
        .unwrap();
        let outcome = board.move_piece(16, 15);
        assert!(matches!(outcome, Outcome::GameOver { ending: Ending::WinnerBlack, .. }));
        assert_eq!(board.end_reason(), Some(EndReason::Blocked));
        assert!(board.is_blocked(Player::White));
    }

    #[test]
    fn test_in_flight_blocks_moves() {
        let mut board = Board::new(GameMode::Standard);
        board.place_piece(0);
        board.begin_flight(0).unwrap();
        assert!(board.any_in_flight());
        assert_eq!(board.place_piece(5), Outcome::Rejected(Rejection::PieceInFlight));
        board.land(0).unwrap();
        assert!(matches!(board.place_piece(5), Outcome::TurnSwitched { .. }));
        assert_eq!(board.begin_flight(99), Err(Rejection::NoSuchPiece(99)));
    }

    #[test]
    fn test_jump_mode_mill_wins() {
        let mut board = Board::new(GameMode::Jump);
        assert_eq!(board.phase(), Phase::MovePieces);
        assert!(board.can_fly(Player::White) && board.can_fly(Player::Black));
        assert_eq!(board.place_piece(0), Outcome::Rejected(Rejection::WrongPhase(Phase::MovePieces)));

        play(&mut board, &[(15, 1), (16, 22)]);
        let outcome = board.move_piece(13, 7);
        assert!(matches!(outcome, Outcome::GameOver { ending: Ending::WinnerWhite, .. }));
        assert_eq!(board.end_reason(), Some(EndReason::MillFormed));
    }

    #[test]
    fn test_jump_plus_start_and_mill_win() {
        let mut board = Board::new(GameMode::JumpPlus);
        assert_eq!(board.phase(), Phase::MovePieces);
        assert_eq!(board.pieces_on_board(Player::White), 6);
        assert_eq!(board.pieces_on_board(Player::Black), 6);
        assert_eq!(board.pieces_to_place(Player::White), 0);
        for node in [0, 3, 6, 17, 20, 23] {
            assert_eq!(board.piece_at(node).map(|p| p.color), Some(Player::White));
        }
        for node in [2, 5, 8, 15, 18, 21] {
            assert_eq!(board.piece_at(node).map(|p| p.color), Some(Player::Black));
        }
        assert!(board.can_fly(Player::White) && board.can_fly(Player::Black));

        play(&mut board, &[(17, 1), (15, 16), (20, 4), (16, 15)]);
        let outcome = board.move_piece(23, 7);
        assert!(matches!(outcome, Outcome::GameOver { ending: Ending::WinnerWhite, .. }));
        assert_eq!(board.end_reason(), Some(EndReason::MillFormed));
        assert!(!board.must_capture());
    }

    #[test]
    fn test_twelve_mens_full_board_draws() {
        let mut board = Board::new(GameMode::TwelveMensMorris);
        for node in 0..NODE_COUNT - 1 {
            assert!(matches!(board.place_piece(node), Outcome::TurnSwitched { .. }), "node {node}");
        }
        let outcome = board.place_piece(NODE_COUNT - 1);
        assert!(matches!(outcome, Outcome::GameOver { ending: Ending::Draw, .. }));
        assert_eq!(board.end_reason(), Some(EndReason::BothBlocked));
        assert!(board.is_blocked(Player::White) && board.is_blocked(Player::Black));
    }

    #[test]
    fn test_twelve_mens_diagonal_mill() {
        let mut board = Board::new(GameMode::TwelveMensMorris);
        for node in [0, 1, 3, 9] {
            board.place_piece(node);
        }
        assert!(matches!(board.place_piece(6), Outcome::MustCapture { .. }));
    }

    #[test]
    fn test_search_request_copies_state() {
        let mut board = Board::new(GameMode::Standard);
        board.place_piece(7);
        let request = board.search_request();
        assert_eq!(request.player, Player::Black);
        assert_eq!(request.kind, MoveKind::Place);
        assert_eq!(request.position[7], Some(Player::White));
        assert_eq!(request.pieces_to_place, [8, 9]);
        assert_eq!(board.position().count(Player::White), 1);
    }

    #[test]
    fn test_with_position_validates() {
        assert_eq!(
            Board::with_position(GameMode::Standard, &[0, 1], &[1], Player::White),
            Err(Rejection::NodeOccupied(1))
        );
        assert_eq!(
            Board::with_position(GameMode::Jump, &[0, 1, 2, 3], &[], Player::White),
            Err(Rejection::TooManyPieces)
        );
    }
}
