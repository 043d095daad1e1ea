//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time, so
//! the documented file and the binary can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    max_seconds: f64,
    max_iterations: i64,
    max_depth: i64,
    exploration: f64,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    game: String,
    agents: Vec<String>,
    games: usize,
    max_plies: usize,
    rotate_agents: bool,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Search
pub fn max_seconds() -> f64 {
    DEFAULTS.search.max_seconds
}
pub fn max_iterations() -> i64 {
    DEFAULTS.search.max_iterations
}
pub fn max_depth() -> i64 {
    DEFAULTS.search.max_depth
}
pub fn exploration() -> f64 {
    DEFAULTS.search.exploration
}

// Arena
pub fn game() -> &'static str {
    &DEFAULTS.arena.game
}
pub fn agents() -> &'static [String] {
    &DEFAULTS.arena.agents
}
pub fn games() -> usize {
    DEFAULTS.arena.games
}
pub fn max_plies() -> usize {
    DEFAULTS.arena.max_plies
}
pub fn rotate_agents() -> bool {
    DEFAULTS.arena.rotate_agents
}
