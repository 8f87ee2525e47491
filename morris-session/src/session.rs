//! Game session: the turn state machine around one board
//!
//! [`GameSession::update`] is called once per frame and advances the state
//! machine by at most one transition. Humans act through [`GameSession::click`]
//! (or the keyboard cursor); computer turns run on the search coordinator and
//! are polled without blocking.

use morris_ai::{MoveResult, SearchCoordinator, SearchFn};
use morris_core::{
    Board, CameraHandle, Direction, GameClock, KeyboardNavigator, NodeIndex, Outcome, Phase,
    PieceIndex, Player, PlayerKind, PointCameraController, Rejection, SavedGame, UndoRedoState,
    NODE_COUNT,
};

use crate::config::SessionConfig;
use crate::state::{Click, SessionError, TurnState};

/// Apply the main step of a computer move (not its capture)
pub fn apply_step(board: &mut Board, chosen: MoveResult) -> Outcome {
    match chosen {
        MoveResult::Place { node } | MoveResult::PlaceTake { node, .. } => board.place_piece(node),
        MoveResult::Move { from, to } | MoveResult::MoveTake { from, to, .. } => board.move_piece(from, to),
        MoveResult::Take { node } => board.take_piece(node),
        MoveResult::None => Outcome::Rejected(Rejection::WrongPhase(board.phase())),
    }
}

/// Apply a complete computer move, capture included
pub fn apply_move_result(board: &mut Board, chosen: MoveResult) -> Outcome {
    let outcome = apply_step(board, chosen);
    match (outcome, chosen) {
        (Outcome::MustCapture { .. }, MoveResult::PlaceTake { take, .. } | MoveResult::MoveTake { take, .. }) => {
            board.take_piece(take)
        }
        _ => outcome,
    }
}

/// A piece travelling to its node
#[derive(Clone, Copy, Debug)]
struct Flight {
    piece: PieceIndex,
    remaining: f32,
}

/// One game in progress
pub struct GameSession {
    config: SessionConfig,
    board: Board,
    history: UndoRedoState,
    coordinator: SearchCoordinator,
    players: [PlayerKind; 2],
    state: TurnState,
    camera: PointCameraController,
    clock: GameClock,
    cursor: KeyboardNavigator,
    selected: Option<NodeIndex>,
    flight: Option<Flight>,
    planned_take: Option<NodeIndex>,
    error: Option<SessionError>,
}

impl GameSession {
    pub fn new(config: SessionConfig, white: PlayerKind, black: PlayerKind) -> Self {
        let mut clock = GameClock::new();
        clock.start();
        Self {
            config,
            board: Board::new(config.mode),
            history: UndoRedoState::new(),
            coordinator: SearchCoordinator::new(config.ai.search_config()),
            players: [white, black],
            state: TurnState::NextPlayer,
            camera: PointCameraController::default(),
            clock,
            cursor: KeyboardNavigator::new(),
            selected: None,
            flight: None,
            planned_take: None,
            error: None,
        }
    }

    /// Use a custom search routine for computer turns
    pub fn with_search_fn(mut self, search: SearchFn) -> Self {
        self.coordinator = SearchCoordinator::with_search(self.config.ai.search_config(), search);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn history(&self) -> &UndoRedoState {
        &self.history
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn camera(&self) -> &PointCameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PointCameraController {
        &mut self.camera
    }

    pub fn bind_camera(&mut self, handle: CameraHandle) {
        self.camera.bind(handle);
    }

    pub fn cursor(&self) -> NodeIndex {
        self.cursor.current()
    }

    pub fn selected(&self) -> Option<NodeIndex> {
        self.selected
    }

    pub fn player(&self, color: Player) -> PlayerKind {
        self.players[color.index()]
    }

    /// Takes effect the next time a turn starts
    pub fn set_player(&mut self, color: Player, kind: PlayerKind) {
        self.players[color.index()] = kind;
    }

    /// Last error raised by a computer turn
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Acknowledge the error; the next turn starts on the following update
    pub fn take_error(&mut self) -> Option<SessionError> {
        self.error.take()
    }

    /// Whether the session needs a human click to go on
    pub fn awaiting_human(&self) -> bool {
        self.state == TurnState::HumanThinkingMove
    }

    // ========================================================================
    // FRAME UPDATE
    // ========================================================================

    /// Advance by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.clock.advance(dt as f64);

        match self.state {
            TurnState::NextPlayer => {
                if self.board.is_game_over() {
                    self.clock.stop();
                    return;
                }
                if self.error.is_some() {
                    return;
                }
                self.state = match self.players[self.board.turn().index()] {
                    PlayerKind::Human => TurnState::HumanBeginMove,
                    PlayerKind::Computer => TurnState::ComputerBeginMove,
                };
            }
            TurnState::HumanBeginMove => {
                self.selected = None;
                self.state = TurnState::HumanThinkingMove;
            }
            TurnState::HumanThinkingMove => {}
            TurnState::ComputerBeginMove => {
                self.coordinator.start(self.board.search_request());
                self.state = TurnState::ComputerThinkingMove;
            }
            TurnState::ComputerThinkingMove => self.poll_search(),
            TurnState::HumanDoingMove | TurnState::ComputerDoingMove => self.advance_flight(dt),
            TurnState::HumanEndMove | TurnState::ComputerEndMove => {
                self.state = TurnState::NextPlayer;
            }
        }
    }

    fn poll_search(&mut self) {
        if self.coordinator.is_running() {
            return;
        }
        match self.coordinator.result() {
            Ok(MoveResult::None) => self.abort(SessionError::NoComputerMove),
            Ok(chosen) => self.play_computer_move(chosen),
            Err(e) => self.abort(e.into()),
        }
    }

    fn play_computer_move(&mut self, chosen: MoveResult) {
        let before = self.board.clone();
        let outcome = apply_step(&mut self.board, chosen);
        if let Outcome::Rejected(reason) = outcome {
            self.abort(SessionError::IllegalComputerMove { chosen, reason });
            return;
        }
        if !matches!(chosen, MoveResult::Take { .. }) {
            self.history.record(&before, &self.camera, &self.clock);
        }
        tracing::debug!("computer played {:?}", chosen);

        self.planned_take = match chosen {
            MoveResult::PlaceTake { take, .. } | MoveResult::MoveTake { take, .. } => Some(take),
            _ => None,
        };
        self.state = TurnState::ComputerDoingMove;
        self.start_flight(outcome);
    }

    fn abort(&mut self, error: SessionError) {
        tracing::warn!("computer turn aborted: {}", error);
        self.error = Some(error);
        self.planned_take = None;
        self.flight = None;
        self.state = TurnState::NextPlayer;
    }

    fn start_flight(&mut self, outcome: Outcome) {
        let piece = match outcome {
            Outcome::MustCapture { piece }
            | Outcome::TurnSwitched { piece }
            | Outcome::GameOver { piece, .. } => piece,
            Outcome::Rejected(_) => return,
        };
        if self.config.move_animation > 0.0 && self.board.begin_flight(piece).is_ok() {
            self.flight = Some(Flight { piece, remaining: self.config.move_animation });
        }
    }

    fn advance_flight(&mut self, dt: f32) {
        if let Some(flight) = &mut self.flight {
            flight.remaining -= dt;
            if flight.remaining > 0.0 {
                return;
            }
            let piece = flight.piece;
            self.flight = None;
            if let Err(e) = self.board.land(piece) {
                tracing::warn!("failed to land piece {}: {}", piece, e);
            }
        }
        self.finish_step();
    }

    /// Decide what follows a landed step
    fn finish_step(&mut self) {
        if self.board.is_game_over() {
            self.state = TurnState::NextPlayer;
            return;
        }
        match self.state {
            TurnState::HumanDoingMove => {
                // Same player picks the piece to take
                self.state = if self.board.must_capture() {
                    TurnState::HumanThinkingMove
                } else {
                    TurnState::HumanEndMove
                };
            }
            TurnState::ComputerDoingMove if self.board.must_capture() => {
                let Some(node) = self.planned_take.take() else {
                    self.abort(SessionError::NoComputerMove);
                    return;
                };
                let outcome = self.board.take_piece(node);
                if let Outcome::Rejected(reason) = outcome {
                    self.abort(SessionError::IllegalComputerMove { chosen: MoveResult::Take { node }, reason });
                    return;
                }
                self.start_flight(outcome);
            }
            TurnState::ComputerDoingMove => self.state = TurnState::ComputerEndMove,
            _ => {}
        }
    }

    // ========================================================================
    // HUMAN INPUT
    // ========================================================================

    /// Interpret a click on `node` for the human to move
    pub fn click(&mut self, node: NodeIndex) -> Result<Click, SessionError> {
        if self.board.is_game_over() {
            return Err(SessionError::GameOver);
        }
        if self.state != TurnState::HumanThinkingMove {
            return Err(SessionError::NotAccepting(self.state));
        }
        if node >= NODE_COUNT {
            return Err(Rejection::NodeOutOfRange(node).into());
        }

        if self.board.must_capture() {
            let outcome = self.board.take_piece(node);
            return self.human_played(outcome, None);
        }

        match self.board.phase() {
            Phase::PlacePieces => {
                let before = self.board.clone();
                let outcome = self.board.place_piece(node);
                self.human_played(outcome, Some(before))
            }
            Phase::MovePieces => {
                let piece = self.board.piece_at(node).map(|p| p.color);
                let own = piece == Some(self.board.turn());
                match self.selected {
                    Some(selected) if selected == node => {
                        self.selected = None;
                        Ok(Click::Deselected)
                    }
                    _ if own => {
                        self.selected = Some(node);
                        Ok(Click::Selected(node))
                    }
                    Some(selected) => {
                        let before = self.board.clone();
                        let outcome = self.board.move_piece(selected, node);
                        self.human_played(outcome, Some(before))
                    }
                    None if piece.is_none() => Err(Rejection::NodeEmpty(node).into()),
                    None => Err(Rejection::NotYourPiece(node).into()),
                }
            }
            Phase::GameOver => Err(SessionError::GameOver),
        }
    }

    fn human_played(&mut self, outcome: Outcome, before: Option<Board>) -> Result<Click, SessionError> {
        if let Outcome::Rejected(rejection) = outcome {
            return Err(rejection.into());
        }
        if let Some(before) = before {
            self.history.record(&before, &self.camera, &self.clock);
        }
        self.selected = None;
        self.state = TurnState::HumanDoingMove;
        self.start_flight(outcome);
        Ok(Click::Played(outcome))
    }

    /// Move the keyboard cursor relative to the camera
    pub fn move_cursor(&mut self, direction: Direction) -> NodeIndex {
        let angle = self.camera.state().normalized_angle();
        self.cursor.move_relative(direction, angle)
    }

    /// Same as clicking the node under the cursor
    pub fn select_focused(&mut self) -> Result<Click, SessionError> {
        self.click(self.cursor.current())
    }

    // ========================================================================
    // HISTORY
    // ========================================================================

    fn check_history_allowed(&mut self) -> Result<(), SessionError> {
        match self.state {
            TurnState::NextPlayer | TurnState::HumanThinkingMove => Ok(()),
            TurnState::ComputerThinkingMove => {
                if self.coordinator.is_running() {
                    return Err(SessionError::SearchRunning);
                }
                // Drop the finished search
                if let Err(e) = self.coordinator.result() {
                    tracing::warn!("discarded failed search: {}", e);
                }
                Ok(())
            }
            state => Err(SessionError::NotAccepting(state)),
        }
    }

    fn after_history_change(&mut self) {
        self.selected = None;
        self.planned_take = None;
        self.error = None;
        self.state = TurnState::NextPlayer;
        self.clock.resume();
    }

    pub fn undo(&mut self) -> Result<(), SessionError> {
        self.check_history_allowed()?;
        self.history.undo(&mut self.board, &mut self.camera, &mut self.clock)?;
        self.after_history_change();
        tracing::info!("undo: turn {} for {}", self.board.turn_count(), self.board.turn());
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), SessionError> {
        self.check_history_allowed()?;
        self.history.redo(&mut self.board, &mut self.camera, &mut self.clock)?;
        self.after_history_change();
        tracing::info!("redo: turn {} for {}", self.board.turn_count(), self.board.turn());
        Ok(())
    }

    // ========================================================================
    // SAVE
    // ========================================================================

    /// Continue a saved game in this session. The camera binding is kept.
    pub fn load(&mut self, saved: SavedGame) -> Result<(), SessionError> {
        self.check_history_allowed()?;

        let mut board = saved.board;
        let in_flight: Vec<PieceIndex> =
            board.pieces().iter().filter(|p| p.in_flight).map(|p| p.index).collect();
        for piece in in_flight {
            let _ = board.land(piece);
        }

        self.config.mode = board.mode();
        self.board = board;
        self.history = saved.history;
        self.players = [saved.white_player, saved.black_player];
        self.camera.restore(saved.camera);
        self.clock = GameClock::from_deciseconds(saved.time);
        self.cursor = KeyboardNavigator::new();
        self.flight = None;
        self.after_history_change();
        tracing::info!("loaded {} game at turn {} (saved {})", self.board.mode(), self.board.turn_count(), saved.date);
        Ok(())
    }

    /// Snapshot for a save file, stamped with the current time
    pub fn to_saved_game(&self) -> SavedGame {
        let mut saved = SavedGame {
            board: self.board.clone(),
            camera: self.camera.state(),
            time: self.clock.deciseconds(),
            date: String::new(),
            history: self.history.clone(),
            white_player: self.players[0],
            black_player: self.players[1],
        };
        saved.stamp_now();
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morris_core::{Ending, GameMode, SearchRequest};
    use morris_ai::SearchConfig;

    fn humans() -> GameSession {
        let mut session = GameSession::new(SessionConfig::default().instant(), PlayerKind::Human, PlayerKind::Human);
        session.update(0.0);
        session.update(0.0);
        session
    }

    /// Run frames until a human is asked to act or the game ends
    fn settle(session: &mut GameSession) {
        for _ in 0..10_000 {
            if session.awaiting_human() || session.board().is_game_over() || session.error().is_some() {
                return;
            }
            session.update(0.016);
            std::thread::sleep(std::time::Duration::from_micros(100));
        }
        panic!("session did not settle in state {:?}", session.state());
    }

    fn play(session: &mut GameSession, node: NodeIndex) -> Click {
        let click = session.click(node).unwrap();
        settle(session);
        click
    }

    #[test]
    fn test_human_place_mill_and_take() {
        let mut session = humans();
        assert_eq!(session.state(), TurnState::HumanThinkingMove);
        for node in [0, 9, 1, 10] {
            play(&mut session, node);
        }
        assert!(matches!(play(&mut session, 2), Click::Played(Outcome::MustCapture { .. })));
        assert_eq!(session.state(), TurnState::HumanThinkingMove);
        assert_eq!(session.board().turn(), Player::White);

        assert!(matches!(play(&mut session, 9), Click::Played(Outcome::TurnSwitched { .. })));
        assert_eq!(session.board().turn(), Player::Black);
        assert_eq!(session.board().pieces_on_board(Player::Black), 1);
        // One entry per completed placement, none for the capture
        assert_eq!(session.history().undo_len(), 5);
    }

    #[test]
    fn test_rejected_click_keeps_state() {
        let mut session = humans();
        play(&mut session, 4);
        assert_eq!(session.click(4), Err(SessionError::Rejected(Rejection::NodeOccupied(4))));
        assert_eq!(session.state(), TurnState::HumanThinkingMove);
        assert_eq!(session.history().undo_len(), 1);
    }

    #[test]
    fn test_select_and_move() {
        let mut session = humans();
        let white = [0, 2, 4, 9, 13, 15, 17, 19, 23];
        let black = [1, 3, 6, 8, 10, 14, 16, 20, 22];
        for (w, b) in white.into_iter().zip(black) {
            play(&mut session, w);
            play(&mut session, b);
        }
        assert_eq!(session.board().phase(), Phase::MovePieces);
        assert_eq!(session.click(5), Err(SessionError::Rejected(Rejection::NodeEmpty(5))));
        assert_eq!(session.click(1), Err(SessionError::Rejected(Rejection::NotYourPiece(1))));
        assert_eq!(play(&mut session, 4), Click::Selected(4));
        assert_eq!(play(&mut session, 4), Click::Deselected);
        assert_eq!(play(&mut session, 4), Click::Selected(4));
        assert!(matches!(play(&mut session, 5), Click::Played(Outcome::TurnSwitched { .. })));
        assert_eq!(session.board().turn(), Player::Black);
    }

    #[test]
    fn test_animation_blocks_until_landed() {
        let config = SessionConfig { move_animation: 0.4, ..SessionConfig::default() };
        let mut session = GameSession::new(config, PlayerKind::Human, PlayerKind::Human);
        session.update(0.0);
        session.update(0.0);
        session.click(0).unwrap();
        assert_eq!(session.state(), TurnState::HumanDoingMove);
        assert!(session.board().any_in_flight());
        assert!(matches!(session.click(1), Err(SessionError::NotAccepting(TurnState::HumanDoingMove))));

        session.update(0.2);
        assert!(session.board().any_in_flight());
        session.update(0.3);
        assert!(!session.board().any_in_flight());
        assert_eq!(session.state(), TurnState::HumanEndMove);
        session.update(0.0);
        assert_eq!(session.state(), TurnState::NextPlayer);
    }

    #[test]
    fn test_undo_redo_restores_turn() {
        let mut session = humans();
        play(&mut session, 0);
        play(&mut session, 9);
        let before = session.board().clone();

        session.undo().unwrap();
        assert_eq!(session.state(), TurnState::NextPlayer);
        assert_eq!(session.board().turn(), Player::Black);
        settle(&mut session);
        session.redo().unwrap();
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn test_keyboard_select_places_piece() {
        let mut session = humans();
        session.move_cursor(Direction::Right);
        session.move_cursor(Direction::Down);
        assert_eq!(session.cursor(), 4);
        session.select_focused().unwrap();
        assert_eq!(session.board().piece_at(4).map(|p| p.color), Some(Player::White));
    }

    #[test]
    fn test_computer_replies() {
        let config = SessionConfig { ai: crate::AiConfig::alpha_beta(1), ..SessionConfig::default().instant() };
        let mut session = GameSession::new(config, PlayerKind::Human, PlayerKind::Computer);
        settle(&mut session);
        play(&mut session, 0);
        assert_eq!(session.board().turn(), Player::White);
        assert_eq!(session.board().pieces_on_board(Player::Black), 1);
        assert_eq!(session.history().undo_len(), 2);
    }

    #[test]
    fn test_load_keeps_camera_binding() {
        let mut session = humans();
        play(&mut session, 0);
        let saved = session.to_saved_game();

        let mut other = humans();
        other.bind_camera(CameraHandle(7));
        play(&mut other, 4);
        other.load(saved).unwrap();

        assert_eq!(other.camera().camera(), Some(CameraHandle(7)));
        assert_eq!(other.board().piece_at(0).map(|p| p.color), Some(Player::White));
        assert!(other.board().piece_at(4).is_none());
        assert_eq!(other.history().undo_len(), 1);
        assert_eq!(other.state(), TurnState::NextPlayer);
        settle(&mut other);
        assert!(other.awaiting_human());
        assert_eq!(other.board().turn(), Player::Black);
    }

    #[test]
    fn test_load_refused_while_piece_moves() {
        let config = SessionConfig { move_animation: 0.4, ..SessionConfig::default() };
        let mut session = GameSession::new(config, PlayerKind::Human, PlayerKind::Human);
        session.update(0.0);
        session.update(0.0);
        session.click(0).unwrap();
        assert_eq!(
            session.load(SavedGame::default()),
            Err(SessionError::NotAccepting(TurnState::HumanDoingMove))
        );
        assert_eq!(session.board().pieces_on_board(Player::White), 1);
    }

    fn bad_search(_: &SearchRequest, _: &SearchConfig) -> MoveResult {
        MoveResult::Place { node: 99 }
    }

    fn panicking_search(_: &SearchRequest, _: &SearchConfig) -> MoveResult {
        panic!("search failed");
    }

    #[test]
    fn test_illegal_computer_move_aborts_turn() {
        let mut session = GameSession::new(SessionConfig::default().instant(), PlayerKind::Computer, PlayerKind::Human)
            .with_search_fn(bad_search);
        settle(&mut session);
        assert!(matches!(
            session.error(),
            Some(SessionError::IllegalComputerMove { reason: Rejection::NodeOutOfRange(99), .. })
        ));
        assert_eq!(session.state(), TurnState::NextPlayer);
        assert_eq!(session.board().pieces_on_board(Player::White), 0);

        // Paused until the error is acknowledged
        session.update(0.0);
        assert_eq!(session.state(), TurnState::NextPlayer);
        session.set_player(Player::White, PlayerKind::Human);
        assert!(session.take_error().is_some());
        settle(&mut session);
        assert!(session.awaiting_human());
    }

    #[test]
    fn test_search_panic_is_flagged() {
        let mut session = GameSession::new(SessionConfig::default().instant(), PlayerKind::Computer, PlayerKind::Human)
            .with_search_fn(panicking_search);
        settle(&mut session);
        assert_eq!(
            session.error(),
            Some(&SessionError::Search(morris_ai::SearchError::WorkerPanicked))
        );
        assert_eq!(session.state(), TurnState::NextPlayer);
    }

    #[test]
    fn test_undo_discards_failed_search() {
        let mut session = GameSession::new(SessionConfig::default().instant(), PlayerKind::Human, PlayerKind::Computer)
            .with_search_fn(panicking_search);
        settle(&mut session);
        session.click(0).unwrap();
        for _ in 0..10 {
            if session.state() == TurnState::ComputerThinkingMove {
                break;
            }
            session.update(0.0);
        }
        assert_eq!(session.state(), TurnState::ComputerThinkingMove);
        while session.coordinator.is_running() {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }

        session.undo().unwrap();
        assert!(session.error().is_none());
        assert_eq!(session.state(), TurnState::NextPlayer);
        assert_eq!(session.board().pieces_on_board(Player::White), 0);
    }

    #[test]
    fn test_undo_after_game_over() {
        let mut session = GameSession::new(
            SessionConfig { mode: GameMode::Jump, ..SessionConfig::default().instant() },
            PlayerKind::Human,
            PlayerKind::Human,
        );
        settle(&mut session);
        for (from, to) in [(15, 1), (16, 22)] {
            play(&mut session, from);
            play(&mut session, to);
        }
        play(&mut session, 13);
        play(&mut session, 7);
        assert_eq!(session.board().ending(), Some(Ending::WinnerWhite));
        session.update(0.1);
        assert_eq!(session.state(), TurnState::NextPlayer);
        session.update(0.1);
        assert!(!session.clock().is_running());

        session.undo().unwrap();
        assert!(!session.board().is_game_over());
        settle(&mut session);
        assert!(session.awaiting_human());
    }
}
