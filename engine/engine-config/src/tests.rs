//! Tests for the configuration module.

use super::*;
use std::sync::Mutex;

/// Serializes tests that touch process environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.common.seed, 0);
    assert_eq!(config.common.fixed_seed(), None);
    assert_eq!(config.arena.game, "amazons");
    assert_eq!(
        config.arena.agents,
        vec!["Example Random AI".to_string(), "Example UCT".to_string()]
    );
    assert_eq!(config.arena.games, 10);
    assert_eq!(config.arena.max_plies, 1000);
    assert!(!config.arena.rotate_agents);
}

#[test]
fn test_search_defaults() {
    let config = CentralConfig::default();
    assert!((config.search.max_seconds - 1.0).abs() < f64::EPSILON);
    assert_eq!(config.search.max_iterations, -1);
    assert_eq!(config.search.max_depth, -1);
    assert!((config.search.exploration - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"
seed = 42

[search]
max_seconds = 0.0
max_iterations = 2000

[arena]
game = "rps"
agents = ["Example Decoupled UCT", "Example Random AI"]
games = 3
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.common.fixed_seed(), Some(42));
    assert_eq!(config.search.max_seconds, 0.0);
    assert_eq!(config.search.max_iterations, 2000);
    assert_eq!(config.arena.game, "rps");
    assert_eq!(config.arena.agents[0], "Example Decoupled UCT");
    assert_eq!(config.arena.games, 3);
    assert_eq!(config.arena.max_plies, 1000); // Default
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[arena]
game = "tictactoe"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.arena.game, "tictactoe");
    assert_eq!(config.arena.games, 10); // Default
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.search, SearchConfig::default());
}

#[test]
fn test_arena_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("ARENA_ARENA_GAME", "tictactoe");
    std::env::set_var("ARENA_ARENA_AGENTS", "Example UCT, Example UCT");
    std::env::set_var("ARENA_SEARCH_MAX_ITERATIONS", "500");
    std::env::set_var("ARENA_COMMON_SEED", "7");
    std::env::set_var("ARENA_ARENA_ROTATE_AGENTS", "true");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.arena.game, "tictactoe");
    assert_eq!(
        config.arena.agents,
        vec!["Example UCT".to_string(), "Example UCT".to_string()]
    );
    assert_eq!(config.search.max_iterations, 500);
    assert_eq!(config.common.seed, 7);
    assert!(config.arena.rotate_agents);

    std::env::remove_var("ARENA_ARENA_GAME");
    std::env::remove_var("ARENA_ARENA_AGENTS");
    std::env::remove_var("ARENA_SEARCH_MAX_ITERATIONS");
    std::env::remove_var("ARENA_COMMON_SEED");
    std::env::remove_var("ARENA_ARENA_ROTATE_AGENTS");
}

#[test]
fn test_invalid_env_override_is_ignored() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("ARENA_SEARCH_MAX_SECONDS", "soon");

    let config = apply_env_overrides(CentralConfig::default());
    assert!((config.search.max_seconds - 1.0).abs() < f64::EPSILON);

    std::env::remove_var("ARENA_SEARCH_MAX_SECONDS");
}

#[test]
fn test_unreadable_file_falls_back_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let config = load_from_path(std::path::Path::new("/definitely/not/here/config.toml"));
    assert_eq!(config, CentralConfig::default());
}

#[test]
fn test_config_file_round_trip_through_disk() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let path = std::env::temp_dir().join(format!("arena-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[search]\nexploration = 0.5\n").unwrap();

    let config = load_from_path(&path);
    assert!((config.search.exploration - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.arena, ArenaConfig::default());

    std::fs::remove_file(&path).unwrap();
}
