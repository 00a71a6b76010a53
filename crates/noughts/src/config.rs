//! Session configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use noughts_engine::{Difficulty, Mark};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for one game session.
///
/// Every key is optional in the TOML file; missing keys take the defaults
/// below.
///
/// ```toml
/// difficulty = "hard"
/// human_mark = "O"
/// thinking_delay_ms = 250
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct SessionConfig {
    /// Computer opponent tier.
    difficulty: Difficulty,

    /// Mark the human plays. X moves first.
    human_mark: Mark,

    /// Pause before the computer's move is committed.
    thinking_delay_ms: u64,

    /// Seed for the random source of Easy and Medium.
    seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            human_mark: Mark::X,
            thinking_delay_ms: 500,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            difficulty = %config.difficulty,
            human_mark = %config.human_mark,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Mark the computer plays.
    pub fn computer_mark(&self) -> Mark {
        self.human_mark.opponent()
    }

    /// Thinking delay as a duration.
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(*config.difficulty(), Difficulty::Medium);
        assert_eq!(*config.human_mark(), Mark::X);
        assert_eq!(config.computer_mark(), Mark::O);
        assert_eq!(config.thinking_delay(), Duration::from_millis(500));
        assert_eq!(*config.seed(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml("difficulty = \"hard\"\n").expect("valid toml");
        assert_eq!(*config.difficulty(), Difficulty::Hard);
        assert_eq!(*config.thinking_delay_ms(), 500);
    }

    #[test]
    fn test_full_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "difficulty = \"easy\"\nhuman_mark = \"O\"\nthinking_delay_ms = 10\nseed = 7"
        )
        .expect("write config");

        let config = SessionConfig::from_file(file.path()).expect("valid config");
        assert_eq!(
            config,
            SessionConfig::default()
                .with_difficulty(Difficulty::Easy)
                .with_human_mark(Mark::O)
                .with_thinking_delay_ms(10)
                .with_seed(Some(7))
        );
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let err = SessionConfig::from_toml("difficulty = \"impossible\"").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = SessionConfig::from_file("/nonexistent/noughts.toml").unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
    }
}
