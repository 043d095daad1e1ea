//! Uniform tie-breaking by reservoir sampling.
//!
//! Both searches pick maxima with the same primitive: candidates are streamed
//! in, the first best is kept, and the `k`-th candidate equal to the current
//! best replaces it with probability `1/k`. Every tied candidate ends up
//! chosen with equal probability without the tie set ever being stored.

use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Whether the `ties`-th equally-best candidate should replace the current one.
#[inline]
pub fn choose_uniform_among_current_ties(ties: u32, rng: &mut ChaCha20Rng) -> bool {
    ties <= 1 || rng.gen_range(0..ties) == 0
}

/// Streaming arg-max with uniform tie-breaking.
#[derive(Debug, Clone)]
pub struct ReservoirArgmax<T> {
    best: Option<T>,
    best_value: f64,
    ties: u32,
}

impl<T> Default for ReservoirArgmax<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReservoirArgmax<T> {
    pub fn new() -> Self {
        Self {
            best: None,
            best_value: f64::NEG_INFINITY,
            ties: 0,
        }
    }

    /// Offer a candidate with its score.
    pub fn offer(&mut self, candidate: T, value: f64, rng: &mut ChaCha20Rng) {
        if self.best.is_none() || value > self.best_value {
            self.best = Some(candidate);
            self.best_value = value;
            self.ties = 1;
        } else if value == self.best_value {
            self.ties += 1;
            if choose_uniform_among_current_ties(self.ties, rng) {
                self.best = Some(candidate);
            }
        }
    }

    /// Best score seen so far (`-inf` before any candidate).
    pub fn best_value(&self) -> f64 {
        self.best_value
    }

    /// Number of candidates currently tied for best.
    pub fn ties(&self) -> u32 {
        self.ties
    }

    pub fn into_best(self) -> Option<T> {
        self.best
    }
}
