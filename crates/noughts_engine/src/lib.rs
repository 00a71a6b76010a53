//! Noughts engine - pure tic-tac-toe logic.
//!
//! This crate holds everything about the game that does not need a clock,
//! a runtime or a terminal:
//!
//! - **Board**: the 9-cell grid and its copy-on-write move application
//! - **Rules**: win, draw and terminal detection
//! - **History**: the snapshot list with a time-travel cursor
//! - **Strategy**: the three computer opponents (random, heuristic, minimax)
//!
//! # Example
//!
//! ```
//! use noughts_engine::{Board, Difficulty, Mark, MoveGenerator};
//!
//! let board = Board::from_marks("XX_OO____");
//! let mut hard = Difficulty::Hard.generator(Some(7));
//! let choice = hard.select_move(&board, Mark::O).unwrap();
//! assert_eq!(choice.to_index(), 5);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod history;
mod invariants;
mod phases;
mod position;
mod rules;
mod strategy;
mod types;

pub use action::{Move, MoveError};
pub use history::{History, InvalidHistory, JumpError};
pub use invariants::{
    AlternatingMarksInvariant, HistoryInvariants, Invariant, InvariantSet, InvariantViolation,
    SingleStepInvariant,
};
pub use phases::{GameStatus, Outcome};
pub use position::Position;
pub use rules::{is_draw, is_full, is_terminal, outcome, status, winner};
pub use strategy::{
    Difficulty, HeuristicMove, MoveGenerator, NoLegalMove, OptimalMove, RandomMove, LOSS_SCORE,
    WIN_SCORE,
};
pub use types::{Board, Mark, Square};
