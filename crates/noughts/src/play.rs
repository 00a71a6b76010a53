//! Interactive terminal game.

use crate::config::SessionConfig;
use crate::handle::{SessionEvent, SessionHandle};
use crate::session::Phase;
use anyhow::{Context, Result};
use noughts_engine::{Difficulty, GameStatus, Position};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

const HELP: &str = "Commands:
  1-9 or a cell name (e.g. top-left)  place your mark
  jump N                              rewind or fast-forward to step N
  history                             list every step
  difficulty easy|medium|hard         change the computer tier
  new                                 start a new game
  json                                print the session as JSON
  help                                show this text
  quit                                leave";

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Place the human's mark.
    Place(Position),
    /// Move the cursor.
    Jump(usize),
    /// List the history.
    History,
    /// Change the computer tier.
    SetDifficulty(Difficulty),
    /// Start a new game.
    NewGame,
    /// Print the snapshot as JSON.
    Json,
    /// Show the command list.
    Help,
    /// Leave.
    Quit,
}

/// Input line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Unrecognised input '{}', type 'help' for commands", line)]
pub struct InputError {
    /// The offending line.
    pub line: String,
}

impl std::str::FromStr for Input {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = || InputError {
            line: line.trim().to_string(),
        };
        let mut words = line.split_whitespace();
        let command = words.next().ok_or_else(err)?.to_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(err());
        }

        match (command.as_str(), arg) {
            ("quit" | "q" | "exit", None) => Ok(Input::Quit),
            ("help" | "?", None) => Ok(Input::Help),
            ("history" | "h", None) => Ok(Input::History),
            ("new", None) => Ok(Input::NewGame),
            ("json", None) => Ok(Input::Json),
            ("jump" | "j", Some(step)) => step.parse().map(Input::Jump).map_err(|_| err()),
            ("difficulty" | "d", Some(level)) => {
                level.parse().map(Input::SetDifficulty).map_err(|_| err())
            }
            (cell, None) => Position::parse_cell(cell).map(Input::Place).ok_or_else(err),
            _ => Err(err()),
        }
    }
}

fn status_line(handle: &SessionHandle) -> String {
    match handle.current_status() {
        GameStatus::Won(mark) => format!("{} wins!", mark),
        GameStatus::Draw => "It's a draw.".to_string(),
        GameStatus::InProgress(mark) => match handle.phase() {
            Phase::ComputerThinking => format!("Computer ({}) is thinking...", mark),
            _ => format!("Your move ({}).", mark),
        },
    }
}

fn render(handle: &SessionHandle) {
    println!(
        "\nStep {}/{}  [{}]\n{}\n{}",
        handle.step(),
        handle.history_len() - 1,
        handle.difficulty(),
        handle.current_board().display(),
        status_line(handle)
    );
}

fn render_history(handle: &SessionHandle) {
    let step = handle.step();
    println!("  0: start{}", if step == 0 { "  <" } else { "" });
    for (i, mv) in handle.moves().iter().enumerate() {
        let marker = if i + 1 == step { "  <" } else { "" };
        println!("{:>3}: {}{}", i + 1, mv, marker);
    }
}

/// Handles one command. Returns false when the player quits.
fn dispatch(handle: &SessionHandle, input: Input) -> Result<bool> {
    match input {
        Input::Place(pos) => {
            if let Err(e) = handle.play_human(pos.to_index()) {
                println!("{}", e);
            }
        }
        Input::Jump(step) => {
            if let Err(e) = handle.jump_to(step) {
                println!("{}", e);
            }
        }
        Input::History => render_history(handle),
        Input::SetDifficulty(level) => {
            handle.set_difficulty(level);
            println!("Difficulty: {}", level);
        }
        Input::NewGame => handle.new_game(),
        Input::Json => {
            let json = serde_json::to_string_pretty(&handle.snapshot())
                .context("Failed to serialize session")?;
            println!("{}", json);
        }
        Input::Help => println!("{}", HELP),
        Input::Quit => return Ok(false),
    }
    Ok(true)
}

/// Runs the interactive game until the player quits or stdin closes.
#[instrument(skip(config))]
pub async fn run(config: SessionConfig) -> Result<()> {
    info!(
        difficulty = %config.difficulty(),
        human_mark = %config.human_mark(),
        "Starting interactive game"
    );
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let handle = SessionHandle::with_events(&config, event_tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    render(&handle);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    debug!("Stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Input>() {
                    Ok(input) => {
                        if !dispatch(&handle, input)? {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
            Some(event) = event_rx.recv() => {
                debug!(?event, "Session event");
                match event {
                    SessionEvent::MoveMade { by_computer: true, mv } => {
                        println!("Computer plays {}", mv.position);
                        render(&handle);
                    }
                    SessionEvent::MoveMade { by_computer: false, .. }
                    | SessionEvent::Rewound { .. }
                    | SessionEvent::Reset => render(&handle),
                    SessionEvent::GameOver(outcome) => println!("Game over: {}", outcome),
                    SessionEvent::ComputerThinking { .. }
                    | SessionEvent::DifficultyChanged(_) => {}
                }
            }
        }
    }

    handle.shutdown();
    info!("Interactive game finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cells() {
        assert_eq!("5".parse::<Input>(), Ok(Input::Place(Position::Center)));
        assert_eq!(
            "top-left".parse::<Input>(),
            Ok(Input::Place(Position::TopLeft))
        );
        assert!("0".parse::<Input>().is_err());
        assert!("10".parse::<Input>().is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("jump 3".parse::<Input>(), Ok(Input::Jump(3)));
        assert_eq!(
            "difficulty HARD".parse::<Input>(),
            Ok(Input::SetDifficulty(Difficulty::Hard))
        );
        assert_eq!("  Quit ".parse::<Input>(), Ok(Input::Quit));
        assert_eq!("history".parse::<Input>(), Ok(Input::History));
        assert_eq!("new".parse::<Input>(), Ok(Input::NewGame));
        assert_eq!("json".parse::<Input>(), Ok(Input::Json));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("jump".parse::<Input>().is_err());
        assert!("jump x".parse::<Input>().is_err());
        assert!("difficulty impossible".parse::<Input>().is_err());
        assert!("quit now".parse::<Input>().is_err());
        assert_eq!(
            "dance".parse::<Input>(),
            Err(InputError {
                line: "dance".to_string()
            })
        );
    }
}
