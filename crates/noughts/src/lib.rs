//! Noughts - tic-tac-toe sessions against a computer opponent.
//!
//! Builds on [`noughts_engine`] with everything that involves time or
//! more than one game:
//!
//! - [`GameSession`]: turn ownership, history cursor and ticketed computer turns
//! - [`SessionHandle`]: the async wrapper that delays and cancels computer moves
//! - [`SessionManager`]: a registry of independent sessions
//! - [`play_match`]: computer-vs-computer tallies
//! - [`SessionConfig`]: TOML configuration
//!
//! # Example
//!
//! ```no_run
//! use noughts::{SessionConfig, SessionHandle};
//! use noughts_engine::Difficulty;
//!
//! # async fn demo() {
//! let config = SessionConfig::default().with_difficulty(Difficulty::Hard);
//! let session = SessionHandle::new(&config);
//! session.play_human(4).unwrap();
//! assert!(session.is_thinking());
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod arena;
pub mod cli;
mod config;
mod handle;
mod manager;
pub mod play;
mod session;

pub use arena::{MatchReport, play_match};
pub use config::{ConfigError, SessionConfig};
pub use handle::{SessionEvent, SessionHandle};
pub use manager::{SessionError, SessionId, SessionManager};
pub use session::{ComputerMoveError, GameSession, Phase, SessionSnapshot, TurnTicket};
