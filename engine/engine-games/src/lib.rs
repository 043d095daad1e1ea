//! Game catalogue and agent registration for the arena
//!
//! This crate provides a single initialization point for the bundled agents,
//! lookup of the bundled games by name, and the match runner used by the
//! `arena` binary.
//!
//! # Usage
//!
//! ```rust
//! use engine_games::{load_game, register_all_agents, AnyGame};
//! use games_tictactoe::TicTacToe;
//!
//! // Call once at startup - safe to call multiple times
//! register_all_agents::<TicTacToe>();
//! assert!(matches!(load_game("tictactoe"), Ok(AnyGame::TicTacToe(_))));
//! ```

use std::any::{type_name, TypeId};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use engine_core::{create_agent, register_agent, Agent, Game, RegistryError};
use games_amazons::Amazons;
use games_rps::RockPaperScissors;
use games_tictactoe::TicTacToe;
use mcts::{Duct, RandomAgent, Uct, UctConfig};
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::{debug, warn};

mod runner;

pub use runner::{play_match, MatchError, MatchReport, MatchSettings};

/// Names accepted by [`load_game`]
pub const GAME_NAMES: [&str; 4] = ["tictactoe", "amazons", "amazons-small", "rps"];

/// Rounds per Rock-Paper-Scissors game loaded by name
pub const RPS_ROUNDS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("no agent named {name:?} is registered for {game}")]
    Unknown { name: String, game: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game {name:?} (known games: {})", GAME_NAMES.join(", "))]
pub struct UnknownGame {
    pub name: String,
}

/// One of the bundled games, for hosts that pick the game at runtime
#[derive(Debug, Clone)]
pub enum AnyGame {
    TicTacToe(TicTacToe),
    Amazons(Amazons),
    Rps(RockPaperScissors),
}

/// Load a bundled game by name.
pub fn load_game(name: &str) -> Result<AnyGame, UnknownGame> {
    match name {
        "tictactoe" => Ok(AnyGame::TicTacToe(TicTacToe::new())),
        "amazons" => Ok(AnyGame::Amazons(Amazons::new())),
        "amazons-small" => Ok(AnyGame::Amazons(Amazons::small())),
        "rps" => Ok(AnyGame::Rps(RockPaperScissors::new(RPS_ROUNDS))),
        _ => Err(UnknownGame {
            name: name.to_string(),
        }),
    }
}

/// Game types whose bundled agents are already registered
static REGISTERED: Lazy<Mutex<HashSet<TypeId>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Register the bundled agents for games of type `G`.
///
/// Registers, in this order, the random baseline, sequential UCT and
/// decoupled UCT. Only the first call per game type registers anything, so it
/// is safe to call multiple times and from multiple threads. A name clash
/// with an agent registered elsewhere is logged and skipped.
pub fn register_all_agents<G: Game>() {
    let mut registered = REGISTERED.lock().unwrap_or_else(PoisonError::into_inner);
    if !registered.insert(TypeId::of::<G>()) {
        return;
    }

    let results = [
        register_agent::<G>(
            RandomAgent::NAME,
            || -> Box<dyn Agent<G>> { Box::new(RandomAgent::new()) },
            RandomAgent::supports::<G>,
        ),
        register_agent::<G>(
            Uct::NAME,
            || -> Box<dyn Agent<G>> { Box::new(Uct::new()) },
            Uct::supports::<G>,
        ),
        register_agent::<G>(
            Duct::NAME,
            || -> Box<dyn Agent<G>> { Box::new(Duct::new()) },
            Duct::supports::<G>,
        ),
    ];

    for result in results {
        if let Err(RegistryError::DuplicateName { name, game }) = result {
            warn!(agent = %name, game, "Agent name already taken, skipping");
        }
    }
    debug!(game = type_name::<G>(), "Registered bundled agents");
}

/// Settings applied to agents built by [`build_agent`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentOptions {
    /// Seed for the agent's random stream; None keeps the entropy seed
    pub seed: Option<u64>,

    /// Search configuration for the bundled UCT agents
    pub uct: UctConfig,
}

/// Build an agent by registered name.
///
/// The bundled search agents are built with `options.uct`; any other name is
/// looked up in the registry. Either way the agent is reseeded when
/// `options.seed` is set.
pub fn build_agent<G: Game>(
    name: &str,
    options: &AgentOptions,
) -> Result<Box<dyn Agent<G>>, AgentError> {
    register_all_agents::<G>();

    let mut agent: Box<dyn Agent<G>> = match name {
        Uct::NAME => Box::new(Uct::new().with_config(options.uct)),
        Duct::NAME => Box::new(Duct::new().with_config(options.uct)),
        _ => create_agent::<G>(name).ok_or_else(|| AgentError::Unknown {
            name: name.to_string(),
            game: type_name::<G>(),
        })?,
    };
    if let Some(seed) = options.seed {
        agent.reseed(seed);
    }
    Ok(agent)
}
