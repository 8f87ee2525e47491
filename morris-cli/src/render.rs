//! Text rendering of the board for the terminal

use morris_core::{Board, NodeIndex, Phase, Player, NODE_COUNT};

/// Grid cell (column, row) of each node on a 7x7 drawing
const GRID: [(usize, usize); NODE_COUNT] = [
    (0, 0), (3, 0), (6, 0),
    (1, 1), (3, 1), (5, 1),
    (2, 2), (3, 2), (4, 2),
    (0, 3), (1, 3), (2, 3), (4, 3), (5, 3), (6, 3),
    (2, 4), (3, 4), (4, 4),
    (1, 5), (3, 5), (5, 5),
    (0, 6), (3, 6), (6, 6),
];

fn node_at(column: usize, row: usize) -> Option<NodeIndex> {
    GRID.iter().position(|&cell| cell == (column, row))
}

fn symbol(board: &Board, node: NodeIndex) -> char {
    match board.piece_at(node).map(|piece| piece.color) {
        Some(Player::White) => 'W',
        Some(Player::Black) => 'B',
        None => '.',
    }
}

/// Draw the board; the cursor is bracketed and the selected piece starred
pub fn board(board: &Board, cursor: Option<NodeIndex>, selected: Option<NodeIndex>) -> String {
    let mut out = String::new();
    for row in 0..7 {
        for column in 0..7 {
            let cell = match node_at(column, row) {
                Some(node) => {
                    let piece = symbol(board, node);
                    let mark = if selected == Some(node) { '*' } else { ' ' };
                    if cursor == Some(node) {
                        format!("[{piece}{mark}]")
                    } else {
                        format!(" {piece}{mark} ")
                    }
                }
                None => "    ".to_string(),
            };
            out.push_str(&cell);
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

/// Node numbers laid out like the board
pub fn legend() -> String {
    let mut out = String::new();
    for row in 0..7 {
        for column in 0..7 {
            match node_at(column, row) {
                Some(node) => out.push_str(&format!("{node:>3} ")),
                None => out.push_str("    "),
            }
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

/// One-line description of whose turn it is and what they must do
pub fn status(board: &Board) -> String {
    if let Some(ending) = board.ending() {
        let reason = board.end_reason().map(|r| format!(" ({r:?})")).unwrap_or_default();
        return match ending.winner() {
            Some(winner) => format!("{winner} wins{reason}"),
            None => format!("Draw{reason}"),
        };
    }

    let turn = board.turn();
    let action = if board.must_capture() {
        "take an opponent piece".to_string()
    } else {
        match board.phase() {
            Phase::PlacePieces => format!("place a piece ({} left)", board.pieces_to_place(turn)),
            Phase::MovePieces if board.can_fly(turn) => "move a piece anywhere".to_string(),
            Phase::MovePieces => "move a piece".to_string(),
            Phase::GameOver => String::new(),
        }
    };
    format!(
        "Turn {}: {} to {} | W {} on board, {} lost | B {} on board, {} lost",
        board.turn_count() + 1,
        turn,
        action,
        board.pieces_on_board(Player::White),
        board.captured(Player::White),
        board.pieces_on_board(Player::Black),
        board.captured(Player::Black),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use morris_core::GameMode;

    #[test]
    fn test_grid_covers_every_node_once() {
        for node in 0..NODE_COUNT {
            let (column, row) = GRID[node];
            assert_eq!(node_at(column, row), Some(node));
        }
    }

    #[test]
    fn test_board_marks_pieces_and_cursor() {
        let mut game = Board::new(GameMode::Standard);
        game.place_piece(0);
        game.place_piece(23);
        let text = board(&game, Some(4), None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with(" W "));
        assert!(lines[1].contains("[. ]"));
        assert!(lines[6].ends_with('B'));
    }

    #[test]
    fn test_status_reports_pending_capture() {
        let mut game = Board::new(GameMode::Standard);
        for node in [0, 9, 1, 10, 2] {
            game.place_piece(node);
        }
        assert!(status(&game).contains("white to take"));
    }
}
