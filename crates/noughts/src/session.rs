//! Game session state machine.
//!
//! `GameSession` is synchronous and deterministic. It decides who may move,
//! applies moves to the history and tracks which computer turn is current.
//! Timing lives in [`crate::SessionHandle`].

use crate::config::SessionConfig;
use noughts_engine::{
    Board, Difficulty, GameStatus, History, HistoryInvariants, InvariantSet, JumpError, Mark,
    Move, MoveError, MoveGenerator, NoLegalMove, Outcome, Position,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// Phase of the session's turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the human.
    HumanToMove,
    /// The computer owes a move.
    ComputerThinking,
    /// The board at the cursor is finished.
    Terminal(Outcome),
}

/// Identifies one scheduled computer turn.
///
/// Any transition that makes a pending computer move obsolete (human move,
/// jump, new game, difficulty change) retires the current ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnTicket(u64);

/// The computer failed to produce a legal move.
///
/// Both variants are programming errors: the session never asks for a move
/// on a finished board, and generators only return empty squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum ComputerMoveError {
    /// Generator found no empty square.
    #[display("{}", _0)]
    NoLegalMove(NoLegalMove),
    /// Generator returned a square the board rejected.
    #[display("Generator chose an illegal square: {}", _0)]
    IllegalChoice(MoveError),
}

impl std::error::Error for ComputerMoveError {}

/// Serializable view of a session for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Board at the cursor.
    pub board: Board,
    /// Status of the board at the cursor.
    pub status: GameStatus,
    /// Turn phase.
    pub phase: Phase,
    /// Cursor position.
    pub step: usize,
    /// Number of snapshots, including the empty board.
    pub history_len: usize,
    /// Active difficulty.
    pub difficulty: Difficulty,
    /// Mark played by the human.
    pub human_mark: Mark,
    /// Every move in the history, cursor or not.
    pub moves: Vec<Move>,
}

/// One game between a human and the computer.
#[derive(Debug)]
pub struct GameSession {
    history: History,
    phase: Phase,
    human_mark: Mark,
    difficulty: Difficulty,
    seed: Option<u64>,
    generator: Box<dyn MoveGenerator + Send>,
    epoch: u64,
}

impl GameSession {
    /// Creates a session at the empty board.
    #[instrument(
        skip(config),
        fields(difficulty = %config.difficulty(), human_mark = %config.human_mark())
    )]
    pub fn new(config: &SessionConfig) -> Self {
        let human_mark = *config.human_mark();
        let history = History::new();
        let phase = Self::phase_for(&history, human_mark);
        info!(?phase, "Creating new game session");
        Self {
            history,
            phase,
            human_mark,
            difficulty: *config.difficulty(),
            seed: *config.seed(),
            generator: config.difficulty().generator(*config.seed()),
            epoch: 0,
        }
    }

    fn phase_for(history: &History, human_mark: Mark) -> Phase {
        match noughts_engine::outcome(history.current()) {
            Some(outcome) => Phase::Terminal(outcome),
            None if history.next_mark() == human_mark => Phase::HumanToMove,
            None => Phase::ComputerThinking,
        }
    }

    /// Recomputes the phase from the cursor and retires the current ticket.
    fn advance(&mut self) {
        self.epoch += 1;
        self.phase = Self::phase_for(&self.history, self.human_mark);
    }

    fn check_invariants(&self) {
        if let Err(violations) = HistoryInvariants::check_all(&self.history) {
            for violation in &violations {
                error!(description = %violation.description, "History invariant violated");
            }
            debug_assert!(false, "History invariants violated: {:?}", violations);
        }
    }

    /// Board at the cursor.
    pub fn current_board(&self) -> &Board {
        self.history.current()
    }

    /// Status of the board at the cursor.
    pub fn status(&self) -> GameStatus {
        noughts_engine::status(self.history.current(), self.history.next_mark())
    }

    /// Turn phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The snapshot history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Cursor position.
    pub fn step(&self) -> usize {
        self.history.step()
    }

    /// Number of snapshots, including the empty board.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Active difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Mark played by the human.
    pub fn human_mark(&self) -> Mark {
        self.human_mark
    }

    /// Mark played by the computer.
    pub fn computer_mark(&self) -> Mark {
        self.human_mark.opponent()
    }

    /// Plays the human's mark on board index `index`.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameOver`] if the board at the cursor is finished
    /// - [`MoveError::NotYourTurn`] while the computer owes a move
    /// - [`MoveError::OutOfRange`] if `index` is not in `0..=8`
    /// - [`MoveError::SquareOccupied`] if the square holds a mark
    ///
    /// A rejected move changes nothing.
    #[instrument(skip(self), fields(step = self.history.step(), phase = ?self.phase))]
    pub fn play_human(&mut self, index: usize) -> Result<Move, MoveError> {
        let result = match self.phase {
            Phase::Terminal(_) => Err(MoveError::GameOver),
            Phase::ComputerThinking => Err(MoveError::NotYourTurn),
            Phase::HumanToMove => Position::from_index(index)
                .ok_or(MoveError::OutOfRange(index))
                .and_then(|pos| self.history.play(pos)),
        };

        let mv = result.inspect_err(|e| warn!(index, error = %e, "Rejected human move"))?;
        self.advance();
        self.check_invariants();
        info!(%mv, phase = ?self.phase, "Human move accepted");
        Ok(mv)
    }

    /// Ticket for the computer turn that is due, if any.
    pub fn computer_turn(&self) -> Option<TurnTicket> {
        (self.phase == Phase::ComputerThinking).then_some(TurnTicket(self.epoch))
    }

    /// Runs the active generator and commits its move.
    ///
    /// Returns `Ok(None)` without touching anything if `ticket` has been
    /// retired since it was issued.
    ///
    /// # Errors
    ///
    /// Returns [`ComputerMoveError`] if the generator misbehaves. State is
    /// unchanged in that case.
    #[instrument(skip(self), fields(step = self.history.step(), difficulty = %self.difficulty))]
    pub fn play_computer(&mut self, ticket: TurnTicket) -> Result<Option<Move>, ComputerMoveError> {
        if self.computer_turn() != Some(ticket) {
            debug!(?ticket, current = self.epoch, "Discarding stale computer turn");
            return Ok(None);
        }

        let mark = self.computer_mark();
        let pos = self.generator.select_move(self.history.current(), mark)?;
        let mv = self.history.play(pos)?;
        self.advance();
        self.check_invariants();
        info!(
            %mv,
            generator = self.generator.name(),
            phase = ?self.phase,
            "Computer move committed"
        );
        Ok(Some(mv))
    }

    /// Switches the computer tier from the next computer move on.
    ///
    /// Returns true if the tier changed. A change retires any pending
    /// computer turn so it can be recomputed with the new tier.
    #[instrument(skip(self), fields(previous = %self.difficulty))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if difficulty == self.difficulty {
            return false;
        }
        self.difficulty = difficulty;
        self.generator = difficulty.generator(self.seed);
        self.epoch += 1;
        info!("Difficulty changed");
        true
    }

    /// Moves the cursor to `step` and recomputes the phase.
    ///
    /// The history is not modified and no generator runs.
    ///
    /// # Errors
    ///
    /// Returns [`JumpError::OutOfRange`] if `step` was never played.
    #[instrument(skip(self), fields(from = self.history.step()))]
    pub fn jump_to(&mut self, step: usize) -> Result<(), JumpError> {
        self.history
            .jump_to(step)
            .inspect_err(|e| warn!(error = %e, "Rejected jump"))?;
        self.advance();
        info!(phase = ?self.phase, "Jumped");
        Ok(())
    }

    /// Discards the game and starts again at the empty board.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) {
        self.history.reset();
        self.advance();
        info!(phase = ?self.phase, "New game");
    }

    /// Serializable view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.current_board().clone(),
            status: self.status(),
            phase: self.phase,
            step: self.step(),
            history_len: self.history_len(),
            difficulty: self.difficulty,
            human_mark: self.human_mark,
            moves: self.history.moves(),
        }
    }
}
