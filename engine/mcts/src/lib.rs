//! Monte Carlo Tree Search agents for general game playing.
//!
//! This crate provides game-agnostic search agents for any game implementing
//! the `engine-core` [`Game`](engine_core::Game) trait:
//!
//! - [`Uct`]: sequential UCT for alternating-move, deterministic games
//! - [`Duct`]: decoupled UCT for simultaneous-move, deterministic games
//! - [`RandomAgent`]: uniform random baseline for any game
//!
//! # Overview
//!
//! Each decision builds a fresh tree rooted at a copy of the host's context
//! and runs iterations of four phases until the budget is spent:
//!
//! 1. **Selection**: descend using UCB1 to balance exploration and exploitation
//! 2. **Expansion**: add exactly one new node
//! 3. **Playout**: play random moves from a copy of the new node's state
//! 4. **Backpropagation**: credit the terminal utilities along the path
//!
//! The budget is the [`SearchLimits`](engine_core::SearchLimits) passed by the
//! host plus the agent's interrupt flag, checked before every iteration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use engine_core::{Agent, Game, SearchLimits};
//! use mcts::Uct;
//!
//! let game = games_tictactoe::TicTacToe::new();
//! let ctx = game.initial_context();
//!
//! let mut agent = Uct::with_seed(42);
//! agent.init(&game, 1);
//! let mv = agent.select_action(&game, &ctx, SearchLimits::iterations(1000));
//! println!("Best move: {}", mv);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  UctSearch / DuctSearch              │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌──────────────┐  ┌─────────────┐  ┌─────────────┐  │
//! │  │ UctTree /    │  │    Game     │  │   Budget    │  │
//! │  │ DuctTree     │  │ (host sim)  │  │ (deadline,  │  │
//! │  │ (arena)      │  │             │  │  interrupt) │  │
//! │  └──────┬───────┘  └──────┬──────┘  └──────┬──────┘  │
//! │         ▼                 ▼                ▼         │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │ select → expand → playout → backpropagate      │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod budget;
pub mod config;
pub mod decoupled;
pub mod node;
pub mod random;
pub mod search;
pub mod ties;
pub mod tree;

// Re-export main types
pub use budget::{Budget, StopReason};
pub use config::{UctConfig, DEFAULT_EXPLORATION};
pub use decoupled::{Duct, DuctNode, DuctSearch, DuctTree};
pub use node::{NodeId, UctNode};
pub use random::RandomAgent;
pub use search::{SearchResult, Uct, UctSearch};
pub use ties::{choose_uniform_among_current_ties, ReservoirArgmax};
pub use tree::{MoveStats, TreeStats, UctTree};
