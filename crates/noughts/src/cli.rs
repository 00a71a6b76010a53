//! Command-line interface for noughts.

use crate::config::{ConfigError, SessionConfig};
use clap::{Parser, Subcommand};
use noughts_engine::{Difficulty, Mark};
use std::path::PathBuf;
use tracing::debug;

/// Noughts - tic-tac-toe against a computer opponent with time travel
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe against a computer opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game in the terminal
    Play {
        /// Path to a TOML session config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Computer tier (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Mark you play (X moves first)
        #[arg(long)]
        human_mark: Option<Mark>,

        /// Computer thinking delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Seed for the random opponents
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Pit two computer tiers against each other
    Match {
        /// Tier playing X
        #[arg(long, default_value = "hard")]
        x: Difficulty,

        /// Tier playing O
        #[arg(long, default_value = "easy")]
        o: Difficulty,

        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Seed for the random opponents
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Builds the session config for `play`: file values first, flags on top.
pub fn resolve_config(
    config: Option<PathBuf>,
    difficulty: Option<Difficulty>,
    human_mark: Option<Mark>,
    delay_ms: Option<u64>,
    seed: Option<u64>,
) -> Result<SessionConfig, ConfigError> {
    let mut resolved = match config {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(difficulty) = difficulty {
        resolved = resolved.with_difficulty(difficulty);
    }
    if let Some(mark) = human_mark {
        resolved = resolved.with_human_mark(mark);
    }
    if let Some(delay) = delay_ms {
        resolved = resolved.with_thinking_delay_ms(delay);
    }
    if seed.is_some() {
        resolved = resolved.with_seed(seed);
    }
    debug!(?resolved, "Resolved session config");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_play_flags_parse() {
        let cli = Cli::try_parse_from([
            "noughts",
            "play",
            "--difficulty",
            "HARD",
            "--human-mark",
            "o",
            "--delay-ms",
            "0",
        ])
        .expect("valid args");
        match cli.command {
            Command::Play {
                difficulty,
                human_mark,
                delay_ms,
                ..
            } => {
                assert_eq!(difficulty, Some(Difficulty::Hard));
                assert_eq!(human_mark, Some(Mark::O));
                assert_eq!(delay_ms, Some(0));
            }
            other => panic!("expected play, got {other:?}"),
        }
    }

    #[test]
    fn test_match_defaults() {
        let cli = Cli::try_parse_from(["noughts", "match"]).expect("valid args");
        match cli.command {
            Command::Match { x, o, games, json, .. } => {
                assert_eq!(x, Difficulty::Hard);
                assert_eq!(o, Difficulty::Easy);
                assert_eq!(games, 100);
                assert!(!json);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        assert!(Cli::try_parse_from(["noughts", "play", "--difficulty", "brutal"]).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "difficulty = \"easy\"\nthinking_delay_ms = 900\nseed = 5")
            .expect("write config");

        let config = resolve_config(
            Some(file.path().to_path_buf()),
            Some(Difficulty::Hard),
            None,
            None,
            None,
        )
        .expect("valid config");
        assert_eq!(*config.difficulty(), Difficulty::Hard);
        assert_eq!(*config.thinking_delay_ms(), 900);
        assert_eq!(*config.seed(), Some(5));
    }
}
