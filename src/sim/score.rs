//! Score accumulator

use serde::{Deserialize, Serialize};

/// Session score. Only ever grows until the run is reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    score: u64,
}

impl ScoreBoard {
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Add a fixed award
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}
