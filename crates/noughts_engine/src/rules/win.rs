//! Win detection logic for tic-tac-toe.

use super::super::{Board, Mark, Position, Square};

/// Checks if there is a winner on the board.
///
/// Lines are scanned in a fixed order (rows, columns, diagonals) and the
/// mark on the first complete line is returned. Under alternating play only
/// one mark can ever complete a line.
pub fn winner(board: &Board) -> Option<Mark> {
    for [a, b, c] in Position::LINES {
        let sq = board.get(a);
        if sq != Square::Empty && sq == board.get(b) && sq == board.get(c) {
            return sq.mark();
        }
    }

    None
}
