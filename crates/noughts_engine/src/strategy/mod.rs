//! Computer opponents.
//!
//! All generators share one contract: given a board with at least one empty
//! square and the computer's mark, return an empty position. Ties are broken
//! by ascending position index, which tests rely on.

mod heuristic;
mod optimal;
mod random;

pub use heuristic::HeuristicMove;
pub use optimal::{LOSS_SCORE, OptimalMove, WIN_SCORE};
pub use random::RandomMove;

use super::position::Position;
use super::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A generator was asked to move on a board with no empty square.
///
/// The session never asks for a move on a terminal board, so seeing this
/// means a caller skipped the terminal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("No legal move: the board has no empty square")]
pub struct NoLegalMove;

/// Strategy that picks the computer's next square.
pub trait MoveGenerator: std::fmt::Debug {
    /// Selects an empty square for `mark` to play on `board`.
    ///
    /// # Errors
    ///
    /// Returns [`NoLegalMove`] if the board has no empty square.
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<Position, NoLegalMove>;

    /// Short display name of the strategy.
    fn name(&self) -> &str;
}

/// Difficulty tier of the computer opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random empty square.
    Easy,
    /// Takes immediate wins, blocks immediate losses, otherwise random.
    #[default]
    Medium,
    /// Full minimax search; never loses.
    Hard,
}

impl Difficulty {
    /// Builds the generator for this tier.
    ///
    /// `seed` fixes the random source used by Easy and by Medium's fallback;
    /// without it the generator is seeded from the operating system.
    #[instrument]
    pub fn generator(self, seed: Option<u64>) -> Box<dyn MoveGenerator + Send> {
        match self {
            Difficulty::Easy => Box::new(RandomMove::new(seed)),
            Difficulty::Medium => Box::new(HeuristicMove::new(RandomMove::new(seed))),
            Difficulty::Hard => Box::new(OptimalMove::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_difficulty_parses_and_displays_lowercase() {
        for difficulty in Difficulty::iter() {
            let text = difficulty.to_string();
            assert_eq!(text, text.to_lowercase());
            assert_eq!(text.parse::<Difficulty>().ok(), Some(difficulty));
        }
        assert_eq!("HARD".parse::<Difficulty>().ok(), Some(Difficulty::Hard));
    }

    #[test]
    fn test_difficulty_json_names_are_lowercase() {
        for difficulty in Difficulty::iter() {
            let json = serde_json::to_string(&difficulty).expect("serializable");
            assert_eq!(json, format!("\"{}\"", difficulty));
            let decoded: Difficulty = serde_json::from_str(&json).expect("known tier");
            assert_eq!(decoded, difficulty);
        }
        assert!(serde_json::from_str::<Difficulty>("\"Hard\"").is_err());
    }

    #[test]
    fn test_every_generator_rejects_full_board() {
        let full = Board::from_marks("XOXXOOOXX");
        for difficulty in Difficulty::iter() {
            let mut generator = difficulty.generator(Some(1));
            assert_eq!(generator.select_move(&full, Mark::O), Err(NoLegalMove));
        }
    }

    #[test]
    fn test_every_generator_picks_an_empty_square() {
        let board = Board::from_marks("XO_X_O___");
        for difficulty in Difficulty::iter() {
            let mut generator = difficulty.generator(Some(3));
            let pos = generator.select_move(&board, Mark::X).expect("board has room");
            assert!(board.is_empty(pos), "{} picked {}", generator.name(), pos);
        }
    }
}
