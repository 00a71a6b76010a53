//! Computer-vs-computer matches.

use noughts_engine::{Difficulty, History, Mark, MoveGenerator, NoLegalMove, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Tally of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Tier playing X.
    pub x: Difficulty,
    /// Tier playing O.
    pub o: Difficulty,
    /// Games played.
    pub games: u32,
    /// Games won by X.
    pub x_wins: u32,
    /// Games won by O.
    pub o_wins: u32,
    /// Drawn games.
    pub draws: u32,
}

impl MatchReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Winner(Mark::X) => self.x_wins += 1,
            Outcome::Winner(Mark::O) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

impl std::fmt::Display for MatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (X) vs {} (O) over {} games: X won {}, O won {}, {} drawn",
            self.x, self.o, self.games, self.x_wins, self.o_wins, self.draws
        )
    }
}

/// Plays one game from the empty board to its end.
fn play_game<'a>(
    x: &'a mut dyn MoveGenerator,
    o: &'a mut dyn MoveGenerator,
) -> Result<Outcome, NoLegalMove> {
    let mut history = History::new();
    loop {
        if let Some(outcome) = noughts_engine::outcome(history.current()) {
            return Ok(outcome);
        }
        let mark = history.next_mark();
        let generator = match mark {
            Mark::X => &mut *x,
            Mark::O => &mut *o,
        };
        let pos = generator.select_move(history.current(), mark)?;
        let mv = history.play(pos).map_err(|_| NoLegalMove)?;
        debug!(%mv, generator = generator.name(), "Arena move");
    }
}

/// Plays `games` games between two tiers and tallies the results.
///
/// X is seeded with `seed` and O with `seed + 1`, so a seeded match is
/// reproducible. Generators keep their state across games.
///
/// # Errors
///
/// Returns [`NoLegalMove`] if a generator fails to produce a legal square.
#[instrument]
pub fn play_match(
    x: Difficulty,
    o: Difficulty,
    games: u32,
    seed: Option<u64>,
) -> Result<MatchReport, NoLegalMove> {
    let mut x_gen = x.generator(seed);
    let mut o_gen = o.generator(seed.map(|s| s.wrapping_add(1)));
    let mut report = MatchReport {
        x,
        o,
        games,
        x_wins: 0,
        o_wins: 0,
        draws: 0,
    };

    for game in 0..games {
        let outcome = play_game(x_gen.as_mut(), o_gen.as_mut())?;
        debug!(game, %outcome, "Game finished");
        report.record(outcome);
    }

    info!(
        x_wins = report.x_wins,
        o_wins = report.o_wins,
        draws = report.draws,
        "Match finished"
    );
    Ok(report)
}
