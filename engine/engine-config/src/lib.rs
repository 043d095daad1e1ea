//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic for the arena
//! driver and the search agents it builds.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`ARENA_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! ARENA_<SECTION>_<KEY>=value
//!
//! Examples:
//!     ARENA_COMMON_LOG_LEVEL=debug
//!     ARENA_COMMON_SEED=42
//!     ARENA_SEARCH_MAX_SECONDS=0.5
//!     ARENA_ARENA_GAME=tictactoe
//!     ARENA_ARENA_AGENTS="Example UCT,Example UCT"
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

#[cfg(test)]
mod tests;
