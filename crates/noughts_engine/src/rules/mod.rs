//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating a board snapshot.
//! Rules are separated from board storage so the session controller and
//! the move generators share one definition of "game over".

mod draw;
mod win;

pub use draw::{is_draw, is_full};
pub use win::winner;

use super::phases::{GameStatus, Outcome};
use super::types::{Board, Mark};

/// Checks if the board is terminal: somebody won or no square is left.
pub fn is_terminal(board: &Board) -> bool {
    winner(board).is_some() || is_full(board)
}

/// Returns the outcome of a terminal board, `None` while play can continue.
pub fn outcome(board: &Board) -> Option<Outcome> {
    if let Some(mark) = winner(board) {
        Some(Outcome::Winner(mark))
    } else if is_full(board) {
        Some(Outcome::Draw)
    } else {
        None
    }
}

/// Status of the board given the mark due to move next.
pub fn status(board: &Board, next: Mark) -> GameStatus {
    match outcome(board) {
        Some(Outcome::Winner(mark)) => GameStatus::Won(mark),
        Some(Outcome::Draw) => GameStatus::Draw,
        None => GameStatus::InProgress(next),
    }
}
