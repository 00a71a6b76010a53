//! Async session handle with the computer's thinking delay.
//!
//! The handle wraps a [`GameSession`] and, whenever the computer owes a
//! move, schedules a tokio task that sleeps for the configured delay and
//! then commits the move. Anything that retires the turn (rewind, reset,
//! difficulty change) aborts the task; if the task already woke up, the
//! session's ticket check drops its result.

use crate::config::SessionConfig;
use crate::session::{GameSession, Phase, SessionSnapshot, TurnTicket};
use noughts_engine::{Board, Difficulty, GameStatus, JumpError, Move, MoveError, Outcome};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Messages sent from the session to its front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The computer started thinking about ply `step`.
    ComputerThinking {
        /// Ply the computer is moving on.
        step: usize,
    },
    /// A move was committed.
    MoveMade {
        /// The move.
        mv: Move,
        /// True if the computer made it.
        by_computer: bool,
    },
    /// The board at the cursor is finished.
    GameOver(Outcome),
    /// The cursor moved to `step`.
    Rewound {
        /// New cursor position.
        step: usize,
    },
    /// A new game started.
    Reset,
    /// The computer tier changed.
    DifficultyChanged(Difficulty),
}

#[derive(Debug)]
struct Shared {
    session: GameSession,
    pending: Option<JoinHandle<()>>,
}

/// Cloneable handle to one game session.
///
/// Methods that can make the computer's move due must be called from
/// within a tokio runtime.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Shared>>,
    delay: Duration,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl SessionHandle {
    /// Starts a new game.
    #[instrument(skip(config))]
    pub fn new(config: &SessionConfig) -> Self {
        Self::build(config, None)
    }

    /// Starts a new game that reports its events on `events`.
    #[instrument(skip(config, events))]
    pub fn with_events(
        config: &SessionConfig,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self::build(config, Some(events))
    }

    fn build(config: &SessionConfig, events: Option<mpsc::UnboundedSender<SessionEvent>>) -> Self {
        let handle = Self {
            inner: Arc::new(Mutex::new(Shared {
                session: GameSession::new(config),
                pending: None,
            })),
            delay: config.thinking_delay(),
            events,
        };
        {
            let mut shared = handle.lock();
            handle.schedule(&mut shared);
        }
        handle
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }

    /// Aborts the pending computer move, if any.
    fn cancel(shared: &mut Shared) {
        if let Some(task) = shared.pending.take() {
            debug!("Cancelling pending computer move");
            task.abort();
        }
    }

    /// Replaces any pending computer move with one for the current ticket.
    fn schedule(&self, shared: &mut Shared) {
        Self::cancel(shared);
        let Some(ticket) = shared.session.computer_turn() else {
            return;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "No tokio runtime; computer move not scheduled");
                return;
            }
        };

        self.emit(SessionEvent::ComputerThinking {
            step: shared.session.step(),
        });
        let handle = self.clone();
        let delay = self.delay;
        shared.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            handle.finish_computer_turn(ticket);
        }));
    }

    #[instrument(skip(self))]
    fn finish_computer_turn(&self, ticket: TurnTicket) {
        let mut shared = self.lock();
        match shared.session.play_computer(ticket) {
            Ok(Some(mv)) => {
                shared.pending = None;
                self.emit(SessionEvent::MoveMade {
                    mv,
                    by_computer: true,
                });
                if let Phase::Terminal(outcome) = shared.session.phase() {
                    info!(%outcome, "Game over");
                    self.emit(SessionEvent::GameOver(outcome));
                }
            }
            Ok(None) => debug!("Computer move superseded"),
            Err(e) => {
                shared.pending = None;
                error!(error = %e, "Computer failed to move");
                debug_assert!(false, "computer failed to move: {e}");
            }
        }
    }

    /// Board at the cursor.
    pub fn current_board(&self) -> Board {
        self.lock().session.current_board().clone()
    }

    /// Status of the board at the cursor.
    pub fn current_status(&self) -> GameStatus {
        self.lock().session.status()
    }

    /// Turn phase.
    pub fn phase(&self) -> Phase {
        self.lock().session.phase()
    }

    /// True while a computer move is scheduled but not committed.
    ///
    /// False after [`SessionHandle::shutdown`], or when no runtime was
    /// available to schedule the move, even though the phase is still
    /// [`Phase::ComputerThinking`].
    pub fn is_thinking(&self) -> bool {
        let shared = self.lock();
        shared.session.phase() == Phase::ComputerThinking && shared.pending.is_some()
    }

    /// Cursor position.
    pub fn step(&self) -> usize {
        self.lock().session.step()
    }

    /// Number of snapshots, including the empty board.
    pub fn history_len(&self) -> usize {
        self.lock().session.history_len()
    }

    /// Every snapshot in play order.
    pub fn history(&self) -> Vec<Board> {
        self.lock().session.history().snapshots().to_vec()
    }

    /// Every move in the history.
    pub fn moves(&self) -> Vec<Move> {
        self.lock().session.history().moves()
    }

    /// Active difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.lock().session.difficulty()
    }

    /// Serializable view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().session.snapshot()
    }

    /// Plays the human's mark on board index `index`.
    ///
    /// On success the computer's reply is scheduled unless the game ended.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] if the move is rejected; nothing changes.
    #[instrument(skip(self))]
    pub fn play_human(&self, index: usize) -> Result<(), MoveError> {
        let mut shared = self.lock();
        let mv = shared.session.play_human(index)?;
        self.emit(SessionEvent::MoveMade {
            mv,
            by_computer: false,
        });
        if let Phase::Terminal(outcome) = shared.session.phase() {
            info!(%outcome, "Game over");
            self.emit(SessionEvent::GameOver(outcome));
        }
        self.schedule(&mut shared);
        Ok(())
    }

    /// Switches the computer tier from the next computer move on.
    ///
    /// A computer move that is already pending is restarted with the new tier.
    #[instrument(skip(self))]
    pub fn set_difficulty(&self, difficulty: Difficulty) {
        let mut shared = self.lock();
        if shared.session.set_difficulty(difficulty) {
            self.emit(SessionEvent::DifficultyChanged(difficulty));
            if shared.session.computer_turn().is_some() {
                self.schedule(&mut shared);
            }
        }
    }

    /// Moves the cursor to `step`.
    ///
    /// Any pending computer move is discarded. If the computer is due at the
    /// new cursor its move is scheduled afresh.
    ///
    /// # Errors
    ///
    /// Returns [`JumpError::OutOfRange`] if `step` was never played.
    #[instrument(skip(self))]
    pub fn jump_to(&self, step: usize) -> Result<(), JumpError> {
        let mut shared = self.lock();
        shared.session.jump_to(step)?;
        self.emit(SessionEvent::Rewound { step });
        self.schedule(&mut shared);
        Ok(())
    }

    /// Starts again at the empty board, discarding any pending computer move.
    #[instrument(skip(self))]
    pub fn new_game(&self) {
        let mut shared = self.lock();
        shared.session.new_game();
        self.emit(SessionEvent::Reset);
        self.schedule(&mut shared);
    }

    /// Aborts any pending computer move without changing the game.
    pub fn shutdown(&self) {
        Self::cancel(&mut self.lock());
    }
}
