//! Single-step invariant: each snapshot adds exactly one mark.

use super::super::{Board, History, Square};
use super::Invariant;

/// Invariant: history starts empty and grows by one Empty -> mark change per ply.
///
/// No snapshot clears a square, overwrites a mark or places two marks.
pub struct SingleStepInvariant;

impl SingleStepInvariant {
    fn one_step(before: &Board, after: &Board) -> bool {
        let mut added = 0;
        for (b, a) in before.squares().iter().zip(after.squares()) {
            match (b, a) {
                (Square::Empty, Square::Occupied(_)) => added += 1,
                (b, a) if b == a => {}
                _ => return false,
            }
        }
        added == 1
    }
}

impl Invariant<History> for SingleStepInvariant {
    fn holds(history: &History) -> bool {
        let snapshots = history.snapshots();
        let starts_empty = snapshots.first() == Some(&Board::new());

        starts_empty
            && history.step() < snapshots.len()
            && snapshots
                .windows(2)
                .all(|pair| Self::one_step(&pair[0], &pair[1]))
    }

    fn description() -> &'static str {
        "Each snapshot adds exactly one mark to the previous one"
    }
}
