//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::{Deserialize, Serialize};

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_max_seconds() -> f64 {
    defaults::max_seconds()
}
fn d_max_iterations() -> i64 {
    defaults::max_iterations()
}
fn d_max_depth() -> i64 {
    defaults::max_depth()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_game() -> String {
    defaults::game().into()
}
fn d_agents() -> Vec<String> {
    defaults::agents().to_vec()
}
fn d_games() -> usize {
    defaults::games()
}
fn d_max_plies() -> usize {
    defaults::max_plies()
}
fn d_rotate_agents() -> bool {
    defaults::rotate_agents()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Base seed for the agents' random streams; 0 seeds from OS entropy
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
        }
    }
}

impl CommonConfig {
    /// `None` when the agents should seed from entropy.
    pub fn fixed_seed(&self) -> Option<u64> {
        (self.seed != 0).then_some(self.seed)
    }
}

/// Per-decision search budget and UCB1 exploration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// `<= 0` disables the wall clock limit
    #[serde(default = "d_max_seconds")]
    pub max_seconds: f64,
    /// `< 0` disables the iteration cap
    #[serde(default = "d_max_iterations")]
    pub max_iterations: i64,
    #[serde(default = "d_max_depth")]
    pub max_depth: i64,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_seconds: defaults::max_seconds(),
            max_iterations: defaults::max_iterations(),
            max_depth: defaults::max_depth(),
            exploration: defaults::exploration(),
        }
    }
}

/// Match played by the arena driver
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    /// Game name, e.g. "amazons"
    #[serde(default = "d_game")]
    pub game: String,
    /// Registered agent names in player order
    #[serde(default = "d_agents")]
    pub agents: Vec<String>,
    #[serde(default = "d_games")]
    pub games: usize,
    #[serde(default = "d_max_plies")]
    pub max_plies: usize,
    /// Shift agents one seat along after each game
    #[serde(default = "d_rotate_agents")]
    pub rotate_agents: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            game: defaults::game().into(),
            agents: defaults::agents().to_vec(),
            games: defaults::games(),
            max_plies: defaults::max_plies(),
            rotate_agents: defaults::rotate_agents(),
        }
    }
}
