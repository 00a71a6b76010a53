//! Medium tier: win if possible, else block, else random.

use super::random::RandomMove;
use super::{MoveGenerator, NoLegalMove};
use crate::{Board, Mark, Position, rules};
use tracing::{debug, instrument};

/// Looks one move ahead for immediate wins and blocks only.
///
/// Forks and longer traps are invisible to it.
#[derive(Debug, Clone)]
pub struct HeuristicMove {
    fallback: RandomMove,
}

impl HeuristicMove {
    /// Creates the generator with the random source used when neither a win
    /// nor a block exists.
    pub fn new(fallback: RandomMove) -> Self {
        Self { fallback }
    }
}

/// First empty square (ascending) on which `mark` completes a line.
pub(crate) fn winning_move(board: &Board, mark: Mark) -> Option<Position> {
    board.empty_cells().into_iter().find(|&pos| {
        board
            .place(pos, mark)
            .is_ok_and(|next| rules::winner(&next) == Some(mark))
    })
}

impl MoveGenerator for HeuristicMove {
    #[instrument(skip(self, board))]
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<Position, NoLegalMove> {
        if rules::is_full(board) {
            return Err(NoLegalMove);
        }

        if let Some(pos) = winning_move(board, mark) {
            debug!(position = %pos, "Completing own line");
            return Ok(pos);
        }

        if let Some(pos) = winning_move(board, mark.opponent()) {
            debug!(position = %pos, "Blocking opponent line");
            return Ok(pos);
        }

        self.fallback.select_move(board, mark)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
