//! Agent facade the host drives once per decision.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::moves::{Move, PlayerId};
use crate::typed::Game;

/// Thinking budget for one `select_action` call.
///
/// Uses the host's sentinel conventions: `max_seconds <= 0` disables the wall
/// clock, `max_iterations < 0` disables the iteration cap. `max_depth` is
/// carried for the host's benefit and ignored by the bundled agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_seconds: f64,
    pub max_iterations: i64,
    pub max_depth: i64,
}

impl SearchLimits {
    pub fn new(max_seconds: f64, max_iterations: i64, max_depth: i64) -> Self {
        Self {
            max_seconds,
            max_iterations,
            max_depth,
        }
    }

    /// Wall-clock budget only.
    pub fn seconds(max_seconds: f64) -> Self {
        Self::new(max_seconds, -1, -1)
    }

    /// Iteration budget only.
    pub fn iterations(max_iterations: i64) -> Self {
        Self::new(0.0, max_iterations, -1)
    }

    /// `None` when there is no wall-clock limit.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.max_seconds > 0.0 && self.max_seconds.is_finite() {
            Some(Duration::from_secs_f64(self.max_seconds))
        } else {
            None
        }
    }

    /// `None` when there is no iteration cap.
    pub fn iteration_cap(&self) -> Option<u64> {
        u64::try_from(self.max_iterations).ok()
    }

    /// Neither a wall clock nor an iteration cap is set.
    pub fn is_unbounded(&self) -> bool {
        self.time_limit().is_none() && self.iteration_cap().is_none()
    }
}

/// Shared cancellation flag.
///
/// The host raises it (for instance when the user interrupts a decision) and
/// the agent polls it at the top of every search iteration. Reads and writes
/// use relaxed ordering: a missed update only delays cancellation by one
/// iteration.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A decision-making agent for games of type `G`.
///
/// The host calls [`init`](Agent::init) once before play, then
/// [`select_action`](Agent::select_action) whenever the agent must decide.
/// Agents never fail across this boundary: with no legal move they return a
/// pass attributed to their own player, and with no completed search they
/// return a uniformly random legal move.
pub trait Agent<G: Game>: Send {
    /// Unique human-readable name used for registration
    fn friendly_name(&self) -> &str;

    /// Record `player` and reset any per-game state.
    fn init(&mut self, game: &G, player: PlayerId);

    /// Pick a move at `ctx` within `limits`.
    ///
    /// `ctx` is never mutated; the agent clones it as needed.
    fn select_action(&mut self, game: &G, ctx: &G::Context, limits: SearchLimits)
        -> Move<G::Action>;

    /// Advisory precondition: whether this agent can play `game`.
    fn supports_game(&self, game: &G) -> bool;

    /// Handle to the flag the host raises to cut a decision short.
    fn wants_interrupt(&self) -> InterruptFlag;

    /// Restart the agent's random stream from `seed`; agents without one
    /// ignore it.
    fn reseed(&mut self, _seed: u64) {}

    /// Release resources at the end of a match.
    fn close(&mut self) {}
}
