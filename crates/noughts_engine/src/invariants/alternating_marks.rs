//! Alternating marks invariant: X, O, X, O, ...

use super::super::{History, Mark};
use super::Invariant;

/// Invariant: ply `n` places the mark due on ply `n` (X on even, O on odd).
pub struct AlternatingMarksInvariant;

impl Invariant<History> for AlternatingMarksInvariant {
    fn holds(history: &History) -> bool {
        let moves = history.moves();

        moves.len() + 1 == history.len()
            && moves
                .iter()
                .enumerate()
                .all(|(ply, mv)| mv.mark == Mark::for_ply(ply))
    }

    fn description() -> &'static str {
        "Marks alternate starting with X"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_empty_history_holds() {
        assert!(AlternatingMarksInvariant::holds(&History::new()));
    }

    #[test]
    fn test_played_history_holds() {
        let mut history = History::new();
        for pos in [Position::Center, Position::TopLeft, Position::BottomLeft] {
            history.play(pos).expect("legal move");
        }
        assert!(AlternatingMarksInvariant::holds(&history));
    }
}
