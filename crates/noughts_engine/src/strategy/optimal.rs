//! Hard tier: exhaustive minimax.
//!
//! The tree is searched to the end with no pruning and no depth discount.
//! That is only affordable because a 3x3 board has at most 9! lines of play;
//! a larger board would need alpha-beta or a depth limit.

use super::heuristic::winning_move;
use super::{MoveGenerator, NoLegalMove};
use crate::{Board, Mark, Position, rules};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Score of a board the computer has won.
pub const WIN_SCORE: i32 = 10;

/// Score of a board the opponent has won.
pub const LOSS_SCORE: i32 = -10;

const DRAW_SCORE: i32 = 0;

/// Minimax player.
///
/// Values are cached per `(board, computer mark, side to move)`. The cache
/// only saves work; every selected move is the one the uncached search
/// would pick.
#[derive(Debug, Clone, Default)]
pub struct OptimalMove {
    memo: HashMap<(Board, Mark, bool), i32>,
}

impl OptimalMove {
    /// Creates a generator with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimax value of `board` for `computer`.
    ///
    /// `maximizing` is true when the computer is the side to move.
    pub fn minimax(&mut self, board: &Board, computer: Mark, maximizing: bool) -> i32 {
        let key = (board.clone(), computer, maximizing);
        if let Some(score) = self.memo.get(&key) {
            return *score;
        }

        let score = match rules::winner(board) {
            Some(mark) if mark == computer => WIN_SCORE,
            Some(_) => LOSS_SCORE,
            None if rules::is_full(board) => DRAW_SCORE,
            None => {
                let mover = if maximizing { computer } else { computer.opponent() };
                let children = board
                    .empty_cells()
                    .into_iter()
                    .filter_map(|pos| board.place(pos, mover).ok());

                let mut best = if maximizing { i32::MIN } else { i32::MAX };
                for child in children {
                    let value = self.minimax(&child, computer, !maximizing);
                    best = if maximizing {
                        best.max(value)
                    } else {
                        best.min(value)
                    };
                }
                best
            }
        };

        self.memo.insert(key, score);
        score
    }

    /// Score of every empty square for `computer`, in ascending index order.
    ///
    /// Each square is scored as the minimax value after the computer plays
    /// there with the opponent to move.
    pub fn scores(&mut self, board: &Board, computer: Mark) -> Vec<(Position, i32)> {
        board
            .empty_cells()
            .into_iter()
            .filter_map(|pos| {
                let child = board.place(pos, computer).ok()?;
                Some((pos, self.minimax(&child, computer, false)))
            })
            .collect()
    }
}

impl MoveGenerator for OptimalMove {
    #[instrument(skip(self, board))]
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<Position, NoLegalMove> {
        // A line completed now beats a forced win later even though both
        // score WIN_SCORE.
        if let Some(pos) = winning_move(board, mark) {
            debug!(position = %pos, "Immediate win");
            return Ok(pos);
        }

        let mut best: Option<(Position, i32)> = None;
        for (pos, score) in self.scores(board, mark) {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
        }

        let (pos, score) = best.ok_or(NoLegalMove)?;
        debug!(position = %pos, score, cached = self.memo.len(), "Minimax choice");
        Ok(pos)
    }

    fn name(&self) -> &str {
        "minimax"
    }
}
