//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::Path;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by ARENA_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("ARENA_CONFIG") {
        let path = Path::new(&path);
        if path.exists() {
            info!("Loading config from ARENA_CONFIG: {}", path.display());
            return load_from_path(path);
        }
        warn!("ARENA_CONFIG={} not found, searching defaults", path.display());
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u64, f64, usize, etc.); unparseable values are logged and ignored
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={:?}: not a valid value", $key, raw),
            }
        }
    };
    // Comma-separated list field
    ($config:expr, $section:ident . $field:ident, $key:expr, list) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: ARENA_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "ARENA_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "ARENA_COMMON_SEED", parse);

    // Search
    env_override!(config, search.max_seconds, "ARENA_SEARCH_MAX_SECONDS", parse);
    env_override!(
        config,
        search.max_iterations,
        "ARENA_SEARCH_MAX_ITERATIONS",
        parse
    );
    env_override!(config, search.max_depth, "ARENA_SEARCH_MAX_DEPTH", parse);
    env_override!(config, search.exploration, "ARENA_SEARCH_EXPLORATION", parse);

    // Arena
    env_override!(config, arena.game, "ARENA_ARENA_GAME");
    env_override!(config, arena.agents, "ARENA_ARENA_AGENTS", list);
    env_override!(config, arena.games, "ARENA_ARENA_GAMES", parse);
    env_override!(config, arena.max_plies, "ARENA_ARENA_MAX_PLIES", parse);
    env_override!(config, arena.rotate_agents, "ARENA_ARENA_ROTATE_AGENTS", parse);

    config
}
