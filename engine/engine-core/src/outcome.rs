//! Terminal outcomes and per-player utilities.

use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::moves::PlayerId;

/// Terminal status reported by the host.
///
/// `winner` is `0` for a draw and `p > 0` for a sole winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: PlayerId,
}

impl Outcome {
    pub const fn draw() -> Self {
        Self { winner: 0 }
    }

    pub const fn win(player: PlayerId) -> Self {
        Self { winner: player }
    }

    #[inline]
    pub fn is_draw(&self) -> bool {
        self.winner == 0
    }
}

/// Per-player utilities at a terminal state.
///
/// Players are 1-indexed, so the vector has `N + 1` entries and entry 0 is
/// unused. Every entry lies in `[-1.0, 1.0]`; `0.0` is a draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Utilities(Vec<f64>);

impl Utilities {
    /// All players at `0.0`.
    pub fn zeros(num_players: usize) -> Self {
        Self(vec![0.0; num_players + 1])
    }

    /// `+1.0` for `winner`, `-1.0` for everyone else; `winner == 0` is a draw.
    pub fn from_winner(num_players: usize, winner: PlayerId) -> Self {
        if winner == 0 {
            return Self::zeros(num_players);
        }
        let mut values = vec![-1.0; num_players + 1];
        values[0] = 0.0;
        if winner <= num_players {
            values[winner] = 1.0;
        }
        Self(values)
    }

    /// Wrap a raw 1-indexed vector (entry 0 is ignored).
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of real players covered by this vector.
    pub fn num_players(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Utility for `player`, `0.0` if the player is out of range.
    #[inline]
    pub fn get(&self, player: PlayerId) -> f64 {
        if player == 0 {
            return 0.0;
        }
        self.0.get(player).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, player: PlayerId, value: f64) {
        if let Some(slot) = self.0.get_mut(player) {
            *slot = value;
        }
    }

    /// Length matches `num_players` and every entry is within `[-1, 1]`.
    pub fn is_valid_for(&self, num_players: usize) -> bool {
        self.0.len() == num_players + 1
            && self.0[1..].iter().all(|u| (-1.0..=1.0).contains(u))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Index<PlayerId> for Utilities {
    type Output = f64;

    fn index(&self, player: PlayerId) -> &f64 {
        &self.0[player]
    }
}
