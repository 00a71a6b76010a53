//! Noughts - unified CLI
//!
//! Interactive play against the computer, or computer-vs-computer matches.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use noughts::cli::{Cli, Command, resolve_config};
use noughts_engine::Difficulty;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so the board on stdout stays readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play {
            config,
            difficulty,
            human_mark,
            delay_ms,
            seed,
        } => {
            let config = resolve_config(config, difficulty, human_mark, delay_ms, seed)
                .context("Failed to load session config")?;
            noughts::play::run(config).await
        }
        Command::Match {
            x,
            o,
            games,
            seed,
            json,
        } => run_match(x, o, games, seed, json),
    }
}

/// Run a computer-vs-computer match and print the tally
#[instrument]
fn run_match(
    x: Difficulty,
    o: Difficulty,
    games: u32,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    info!("Starting match");
    let report = noughts::play_match(x, o, games, seed).context("Match aborted")?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        println!("{}", report);
    }
    Ok(())
}
