//! Process-scope agent registry
//!
//! Agents register under a unique human-readable name together with a
//! zero-argument factory and a `supports_game` predicate. Entries are kept per
//! game type, so the same name may be registered once for each game. The
//! registry is only consulted by hosts looking agents up; searches never
//! touch it.

use once_cell::sync::Lazy;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::typed::Game;

/// Factory function type for creating agent instances
pub type AgentFactory<G> = fn() -> Box<dyn Agent<G>>;

/// Predicate deciding whether an agent can play a given game
pub type SupportsGame<G> = fn(&G) -> bool;

/// Errors reported by agent registration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("an agent named {name:?} is already registered for {game}")]
    DuplicateName { name: String, game: &'static str },
}

struct AgentEntry<G: Game> {
    name: String,
    factory: AgentFactory<G>,
    supports: SupportsGame<G>,
}

/// Registration-ordered entries per game type
static REGISTRY: Lazy<Mutex<HashMap<TypeId, Box<dyn Any + Send>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn lock() -> MutexGuard<'static, HashMap<TypeId, Box<dyn Any + Send>>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_entries<G: Game, R>(f: impl FnOnce(&mut Vec<AgentEntry<G>>) -> R) -> R {
    let mut registry = lock();
    let slot = registry
        .entry(TypeId::of::<G>())
        .or_insert_with(|| Box::new(Vec::<AgentEntry<G>>::new()));
    match slot.downcast_mut::<Vec<AgentEntry<G>>>() {
        Some(entries) => f(entries),
        None => unreachable!("registry slot keyed by TypeId holds another game's entries"),
    }
}

/// Register an agent for games of type `G`.
///
/// Fails with [`RegistryError::DuplicateName`] if `name` is already taken for
/// `G`; the existing entry is left untouched. Hosts report the failure and
/// carry on.
///
/// # Example
///
/// ```rust,ignore
/// register_agent::<Amazons>("Example UCT", || Box::new(Uct::new()), Uct::supports)?;
/// ```
pub fn register_agent<G: Game>(
    name: impl Into<String>,
    factory: AgentFactory<G>,
    supports: SupportsGame<G>,
) -> Result<(), RegistryError> {
    let name = name.into();
    with_entries::<G, _>(|entries| {
        if entries.iter().any(|entry| entry.name == name) {
            return Err(RegistryError::DuplicateName {
                name,
                game: type_name::<G>(),
            });
        }
        debug!(agent = %name, game = type_name::<G>(), "Registered agent");
        entries.push(AgentEntry {
            name,
            factory,
            supports,
        });
        Ok(())
    })
}

/// Create a fresh agent instance by name.
///
/// Returns `None` if no agent with that name is registered for `G`.
pub fn create_agent<G: Game>(name: &str) -> Option<Box<dyn Agent<G>>> {
    let factory = with_entries::<G, _>(|entries| {
        entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.factory)
    });
    match factory {
        // Call outside the lock so factories may consult the registry.
        Some(factory) => Some(factory()),
        None => {
            warn!(agent = %name, game = type_name::<G>(), "Attempted to create unregistered agent");
            None
        }
    }
}

/// Names of all agents registered for `G`, in registration order.
pub fn list_registered_agents<G: Game>() -> Vec<String> {
    with_entries::<G, _>(|entries| entries.iter().map(|entry| entry.name.clone()).collect())
}

/// Check if an agent name is registered for `G`.
pub fn is_agent_registered<G: Game>(name: &str) -> bool {
    with_entries::<G, _>(|entries| entries.iter().any(|entry| entry.name == name))
}

/// Names of registered agents whose predicate accepts `game`.
pub fn agents_supporting<G: Game>(game: &G) -> Vec<String> {
    let candidates: Vec<(String, SupportsGame<G>)> = with_entries::<G, _>(|entries| {
        entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.supports))
            .collect()
    });
    candidates
        .into_iter()
        .filter(|(_, supports)| supports(game))
        .map(|(name, _)| name)
        .collect()
}

/// Clear all registered agents for every game type (mainly for testing)
pub fn clear_registry() {
    lock().clear();
}
