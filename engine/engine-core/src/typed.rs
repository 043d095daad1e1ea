//! Host game interface consumed by the search agents
//!
//! Games implement this trait with their own context and action types. The
//! agents only rely on the capabilities listed here and on deep-copy semantics
//! of the context: they clone a context before applying moves to it and never
//! mutate a context handed to them by the host.

use std::fmt::Debug;
use std::hash::Hash;

use rand_chacha::ChaCha20Rng;

use crate::game_utils;
use crate::metadata::GameMetadata;
use crate::moves::{Move, PlayerId};
use crate::outcome::{Outcome, Utilities};

/// Main trait for game implementations
///
/// # Type Parameters
///
/// * `Context` - Complete game state, cloned whenever a search branches
/// * `Action` - Move payload; hashed when a combined move keys a tree node
///
/// # Example
///
/// ```rust
/// # use engine_core::*;
/// #[derive(Debug)]
/// struct Nim;
///
/// impl Game for Nim {
///     type Context = (u32, PlayerId);
///     type Action = u32;
///
///     fn metadata(&self) -> GameMetadata { GameMetadata::new("nim", "Nim") }
///     fn num_players(&self) -> usize { 2 }
///     fn is_alternating_move_game(&self) -> bool { true }
///     fn initial_context(&self) -> Self::Context { (5, 1) }
///     fn legal_moves(&self, ctx: &Self::Context) -> Vec<Move<u32>> {
///         (1..=ctx.0.min(2)).map(|n| Move::new(ctx.1, n)).collect()
///     }
///     fn apply(&self, ctx: &mut Self::Context, mv: &Move<u32>) {
///         if let Some(n) = mv.action() {
///             ctx.0 -= n;
///             ctx.1 = 3 - ctx.1;
///         }
///     }
///     fn is_over(&self, ctx: &Self::Context) -> bool { ctx.0 == 0 }
///     fn status(&self, ctx: &Self::Context) -> Option<Outcome> {
///         // whoever took the last stone won; the turn has already passed on
///         self.is_over(ctx).then(|| Outcome::win(3 - ctx.1))
///     }
///     fn mover(&self, ctx: &Self::Context) -> PlayerId { ctx.1 }
///     fn utilities(&self, ctx: &Self::Context) -> Utilities {
///         Utilities::from_winner(2, self.status(ctx).map_or(0, |o| o.winner))
///     }
/// }
///
/// let game = Nim;
/// let ctx = game.initial_context();
/// assert_eq!(game.legal_moves(&ctx).len(), 2);
/// ```
pub trait Game: Send + Sync + Debug + 'static {
    /// Full game state; must deep-copy on `clone`
    type Context: Clone + Debug + Send + 'static;

    /// Action payload carried by regular moves
    type Action: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Display-oriented metadata (ids, board size, player names)
    fn metadata(&self) -> GameMetadata;

    /// Number of real players `N`; players are numbered `1..=N`
    fn num_players(&self) -> usize;

    /// `true` when exactly one player decides per ply
    fn is_alternating_move_game(&self) -> bool;

    /// `true` when the game has chance events
    fn is_stochastic_game(&self) -> bool {
        false
    }

    /// Context at the start of a game
    fn initial_context(&self) -> Self::Context;

    /// Legal moves at `ctx`, in a stable order. May be empty.
    ///
    /// Simultaneous-move games return the moves of every active player, each
    /// tagged with its mover; see [`game_utils::moves_for_mover`].
    fn legal_moves(&self, ctx: &Self::Context) -> Vec<Move<Self::Action>>;

    /// Apply `mv` to `ctx` in place.
    ///
    /// Simultaneous-move games expect a combined move (mover `N + 1`).
    fn apply(&self, ctx: &mut Self::Context, mv: &Move<Self::Action>);

    /// Terminal test
    fn is_over(&self, ctx: &Self::Context) -> bool;

    /// Terminal status, `None` while the game is running
    fn status(&self, ctx: &Self::Context) -> Option<Outcome>;

    /// Player to move. Simultaneous-move games report the combined-move
    /// marker `N + 1`.
    fn mover(&self, ctx: &Self::Context) -> PlayerId;

    /// Per-player utilities; only meaningful when `is_over(ctx)` holds
    fn utilities(&self, ctx: &Self::Context) -> Utilities;

    /// Play uniformly random moves until the game is over.
    ///
    /// The default stops early only if no player has a legal move.
    fn playout(&self, ctx: &mut Self::Context, rng: &mut ChaCha20Rng) {
        game_utils::random_playout(self, ctx, rng);
    }
}
