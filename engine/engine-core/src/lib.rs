//! Core traits and types for the game-playing arena
//!
//! This crate provides the abstractions shared by games and search agents:
//! - `Game`: Host game interface (legal moves, apply, terminal test, playout, utilities)
//! - `Move`: Move value tagged with its mover, including passes and combined moves
//! - `Agent`: Decision-making agent facade driven by the host once per decision
//! - `Registry`: Process-scope agent registration keyed by game type and name
//! - `game_utils`: Per-player move filtering and uniform random playouts

pub mod agent;
pub mod game_utils;
pub mod metadata;
pub mod moves;
pub mod outcome;
pub mod registry;
pub mod typed;

// Re-export main types for convenience
pub use agent::{Agent, InterruptFlag, SearchLimits};
pub use game_utils::{moves_for_mover, random_joint_move, random_playout};
pub use metadata::{GameMetadata, TurnStructure};
pub use moves::{Move, MoveBody, PlayerId};
pub use outcome::{Outcome, Utilities};
pub use registry::{
    agents_supporting, clear_registry, create_agent, is_agent_registered,
    list_registered_agents, register_agent, AgentFactory, RegistryError, SupportsGame,
};
pub use typed::Game;

/// Test utilities (internal use only)
#[cfg(test)]
pub(crate) mod test_utils {
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    use crate::{Game, GameMetadata, Move, Outcome, PlayerId, Utilities};

    /// Global mutex to serialize all registry-dependent tests
    pub static REGISTRY_TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    /// Counting game: players alternately add 1 or 2 to a running total and
    /// whoever reaches `target` wins.
    #[derive(Debug, Clone)]
    pub struct CountingGame {
        pub target: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CountingContext {
        pub total: u32,
        pub to_move: PlayerId,
        pub winner: Option<PlayerId>,
    }

    impl Game for CountingGame {
        type Context = CountingContext;
        type Action = u32;

        fn metadata(&self) -> GameMetadata {
            GameMetadata::new("counting", "Counting Game")
        }

        fn num_players(&self) -> usize {
            2
        }

        fn is_alternating_move_game(&self) -> bool {
            true
        }

        fn initial_context(&self) -> Self::Context {
            CountingContext {
                total: 0,
                to_move: 1,
                winner: None,
            }
        }

        fn legal_moves(&self, ctx: &Self::Context) -> Vec<Move<u32>> {
            if ctx.winner.is_some() {
                return Vec::new();
            }
            (1..=2)
                .filter(|step| ctx.total + step <= self.target)
                .map(|step| Move::new(ctx.to_move, step))
                .collect()
        }

        fn apply(&self, ctx: &mut Self::Context, mv: &Move<u32>) {
            if let Some(step) = mv.action() {
                ctx.total += step;
                if ctx.total >= self.target {
                    ctx.winner = Some(ctx.to_move);
                } else {
                    ctx.to_move = 3 - ctx.to_move;
                }
            }
        }

        fn is_over(&self, ctx: &Self::Context) -> bool {
            ctx.winner.is_some()
        }

        fn status(&self, ctx: &Self::Context) -> Option<Outcome> {
            ctx.winner.map(Outcome::win)
        }

        fn mover(&self, ctx: &Self::Context) -> PlayerId {
            ctx.to_move
        }

        fn utilities(&self, ctx: &Self::Context) -> Utilities {
            Utilities::from_winner(2, ctx.winner.unwrap_or(0))
        }
    }
}
