//! Easy tier: uniformly random empty square.

use super::{MoveGenerator, NoLegalMove};
use crate::{Board, Mark, Position};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// Picks uniformly among the empty squares.
///
/// Stateless apart from its random source; seed it for reproducible games.
#[derive(Debug, Clone)]
pub struct RandomMove {
    rng: SmallRng,
}

impl RandomMove {
    /// Seeded when `seed` is given, otherwise seeded from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self {
                rng: SmallRng::from_os_rng(),
            },
        }
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub(crate) fn pick(&mut self, cells: &[Position]) -> Option<Position> {
        cells.choose(&mut self.rng).copied()
    }
}

impl MoveGenerator for RandomMove {
    #[instrument(skip(self, board))]
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<Position, NoLegalMove> {
        let cells = board.empty_cells();
        let pos = self.pick(&cells).ok_or(NoLegalMove)?;
        debug!(position = %pos, candidates = cells.len(), "Random pick");
        Ok(pos)
    }

    fn name(&self) -> &str {
        "random"
    }
}
