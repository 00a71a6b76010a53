//! Snapshot history with a time-travel cursor.
//!
//! Every accepted move appends a new board snapshot. Rewinding only moves
//! the cursor; playing from a rewound position discards the forward
//! snapshots before appending, so there is only ever one timeline.

use super::action::{Move, MoveError};
use super::invariants::{HistoryInvariants, InvariantSet, InvariantViolation};
use super::position::Position;
use super::rules;
use super::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Error returned when jumping to a ply that was never played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum JumpError {
    /// Requested step is past the end of the history.
    #[display("Step {} is out of range (history has {} entries)", step, len)]
    OutOfRange {
        /// Requested step.
        step: usize,
        /// History length at the time of the request.
        len: usize,
    },
}

impl std::error::Error for JumpError {}

/// Serialized history that breaks a history invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHistory {
    /// Every invariant the data failed.
    pub violations: Vec<InvariantViolation>,
}

impl std::fmt::Display for InvalidHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid history")?;
        for violation in &self.violations {
            write!(f, "; {}", violation.description)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidHistory {}

#[derive(Deserialize)]
struct RawHistory {
    snapshots: Vec<Board>,
    step: usize,
}

/// Ordered board snapshots plus the current ply cursor.
///
/// Invariants:
/// - `snapshots[0]` is the empty board
/// - each snapshot adds exactly one mark to the previous one
/// - `step < snapshots.len()`
///
/// Deserialization re-checks all three, so a decoded history is as safe to
/// use as one built by [`History::play`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHistory")]
pub struct History {
    snapshots: Vec<Board>,
    step: usize,
}

impl History {
    /// Creates a history holding only the empty board.
    pub fn new() -> Self {
        Self {
            snapshots: vec![Board::new()],
            step: 0,
        }
    }

    /// Board at the cursor.
    pub fn current(&self) -> &Board {
        &self.snapshots[self.step]
    }

    /// Current ply index.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of snapshots, including the empty board.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: the empty board is never removed.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot at `step`, if it exists.
    pub fn get(&self, step: usize) -> Option<&Board> {
        self.snapshots.get(step)
    }

    /// All snapshots in play order.
    pub fn snapshots(&self) -> &[Board] {
        &self.snapshots
    }

    /// True when the cursor sits on the newest snapshot.
    pub fn is_latest(&self) -> bool {
        self.step + 1 == self.snapshots.len()
    }

    /// Mark due to move at the cursor (even ply: X, odd ply: O).
    pub fn next_mark(&self) -> Mark {
        Mark::for_ply(self.step)
    }

    /// Moves the cursor to `step` without touching the snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`JumpError::OutOfRange`] if `step` was never played.
    #[instrument(skip(self), fields(len = self.snapshots.len()))]
    pub fn jump_to(&mut self, step: usize) -> Result<(), JumpError> {
        if step >= self.snapshots.len() {
            return Err(JumpError::OutOfRange {
                step,
                len: self.snapshots.len(),
            });
        }
        self.step = step;
        Ok(())
    }

    /// Plays the mark due at the cursor on `pos`.
    ///
    /// Any snapshots after the cursor are discarded first, then the new
    /// snapshot is appended and the cursor advances onto it.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameOver`] if the board at the cursor is terminal
    /// - [`MoveError::SquareOccupied`] if `pos` already holds a mark
    #[instrument(skip(self), fields(step = self.step))]
    pub fn play(&mut self, pos: Position) -> Result<Move, MoveError> {
        let current = self.current();
        if rules::is_terminal(current) {
            return Err(MoveError::GameOver);
        }
        let mark = self.next_mark();
        let next = current.place(pos, mark)?;

        let discarded = self.snapshots.len() - (self.step + 1);
        if discarded > 0 {
            debug!(discarded, "Discarding forward history");
            self.snapshots.truncate(self.step + 1);
        }
        self.snapshots.push(next);
        self.step += 1;

        Ok(Move::new(mark, pos))
    }

    /// Moves that produced each snapshot after the first.
    pub fn moves(&self) -> Vec<Move> {
        self.snapshots
            .windows(2)
            .filter_map(|pair| {
                let [before, after] = pair else {
                    return None;
                };
                Position::ALL.iter().copied().find_map(|pos| {
                    match (before.get(pos).mark(), after.get(pos).mark()) {
                        (None, Some(mark)) => Some(Move::new(mark, pos)),
                        _ => None,
                    }
                })
            })
            .collect()
    }

    /// Returns to the single empty-board snapshot.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.snapshots.push(Board::new());
        self.step = 0;
    }
}

impl TryFrom<RawHistory> for History {
    type Error = InvalidHistory;

    fn try_from(raw: RawHistory) -> Result<Self, Self::Error> {
        let history = Self {
            snapshots: raw.snapshots,
            step: raw.step,
        };
        HistoryInvariants::check_all(&history).map_err(|violations| InvalidHistory { violations })?;
        Ok(history)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
