//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Exploration constant used by both searches.
///
/// The UCB1 term is `C * sqrt(2 ln N / n)`, so `C = 1` already gives the
/// classic `sqrt(2)` exploration weight.
pub const DEFAULT_EXPLORATION: f64 = 1.0;

/// Configuration shared by the sequential and decoupled UCT searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UctConfig {
    /// Exploration constant `C` in front of the confidence term.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration: f64,
}

impl Default for UctConfig {
    fn default() -> Self {
        Self {
            exploration: DEFAULT_EXPLORATION,
        }
    }
}

impl UctConfig {
    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Confidence term `C * sqrt(2 ln(max(1, parent)) / max(1, visits))`.
    #[inline]
    pub fn exploration_bonus(&self, parent_visits: u32, visits: u32) -> f64 {
        let parent = f64::from(parent_visits.max(1));
        let visits = f64::from(visits.max(1));
        self.exploration * (2.0 * parent.ln() / visits).sqrt()
    }
}
