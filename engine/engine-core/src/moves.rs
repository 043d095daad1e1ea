//! Move values exchanged between the host game and the agents.
//!
//! A move always records the player who makes it. Simultaneous-move games
//! combine one move per active player into a single combined move whose mover
//! is the reserved marker `N + 1`, one past the last real player id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Player identifier. Real players are numbered `1..=N`; index 0 is unused.
pub type PlayerId = usize;

/// What a move does once the host applies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveBody<A> {
    /// A regular game action
    Action(A),
    /// Synthetic pass, used when the mover has no legal move
    Pass,
    /// One move per active player, applied together
    Combined(Vec<Move<A>>),
}

/// A move tagged with the player making it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move<A> {
    mover: PlayerId,
    body: MoveBody<A>,
}

impl<A> Move<A> {
    /// Create a regular move for `mover`.
    pub fn new(mover: PlayerId, action: A) -> Self {
        Self {
            mover,
            body: MoveBody::Action(action),
        }
    }

    /// Create a pass move attributed to `mover`.
    pub fn pass(mover: PlayerId) -> Self {
        Self {
            mover,
            body: MoveBody::Pass,
        }
    }

    /// Combine per-player moves into one simultaneous move.
    ///
    /// The mover of the result is `num_players + 1`, which no real player
    /// can carry, so the host can tell it apart from single-player moves.
    pub fn combined(parts: Vec<Move<A>>, num_players: usize) -> Self {
        Self {
            mover: Self::combined_mover(num_players),
            body: MoveBody::Combined(parts),
        }
    }

    /// Mover marker used for combined moves in an `num_players` game.
    #[inline]
    pub const fn combined_mover(num_players: usize) -> PlayerId {
        num_players + 1
    }

    #[inline]
    pub fn mover(&self) -> PlayerId {
        self.mover
    }

    #[inline]
    pub fn body(&self) -> &MoveBody<A> {
        &self.body
    }

    /// The underlying action, if this is a regular move.
    pub fn action(&self) -> Option<&A> {
        match &self.body {
            MoveBody::Action(action) => Some(action),
            _ => None,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.body, MoveBody::Pass)
    }

    pub fn is_combined(&self) -> bool {
        matches!(self.body, MoveBody::Combined(_))
    }

    /// Per-player parts of a combined move (empty for any other move).
    pub fn parts(&self) -> &[Move<A>] {
        match &self.body {
            MoveBody::Combined(parts) => parts,
            _ => &[],
        }
    }

    /// Part of a combined move played by `player`, if any.
    pub fn part_for(&self, player: PlayerId) -> Option<&Move<A>> {
        self.parts().iter().find(|part| part.mover == player)
    }
}

impl<A: fmt::Display> fmt::Display for Move<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            MoveBody::Action(action) => write!(f, "P{}:{}", self.mover, action),
            MoveBody::Pass => write!(f, "P{}:pass", self.mover),
            MoveBody::Combined(parts) => {
                write!(f, "[")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, "]")
            }
        }
    }
}
