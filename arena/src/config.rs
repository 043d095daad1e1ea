//! Command-line configuration for the arena
//!
//! Defaults come from config.toml (with `ARENA_*` environment overrides
//! already applied by `engine_config`). CLI arguments take highest priority.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use engine_config::{load_config, CentralConfig};
use engine_core::SearchLimits;
use mcts::UctConfig;
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_game() -> String {
    CENTRAL_CONFIG.arena.game.clone()
}

fn default_agents() -> Vec<String> {
    CENTRAL_CONFIG.arena.agents.clone()
}

fn default_games() -> usize {
    CENTRAL_CONFIG.arena.games
}

fn default_max_plies() -> usize {
    CENTRAL_CONFIG.arena.max_plies
}

fn default_rotate_agents() -> bool {
    CENTRAL_CONFIG.arena.rotate_agents
}

fn default_seconds() -> f64 {
    CENTRAL_CONFIG.search.max_seconds
}

fn default_iterations() -> i64 {
    CENTRAL_CONFIG.search.max_iterations
}

fn default_max_depth() -> i64 {
    CENTRAL_CONFIG.search.max_depth
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.search.exploration
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "arena")]
#[command(about = "Play matches between MCTS agents")]
#[command(
    long_about = "Plays a series of games between registered agents and reports the results.

Configuration is loaded from config.toml with ARENA_* environment variable
overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Game to play (tictactoe, amazons, amazons-small, rps)
    #[arg(long, default_value_t = default_game())]
    pub game: String,

    /// Agent names in player order, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = default_agents())]
    pub agents: Vec<String>,

    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: usize,

    /// Seconds per decision (0 or less for no time limit)
    #[arg(long, default_value_t = default_seconds())]
    pub seconds: f64,

    /// Search iterations per decision (negative for no limit)
    #[arg(long, default_value_t = default_iterations())]
    pub iterations: i64,

    /// Depth limit handed to agents (negative for no limit)
    #[arg(long, default_value_t = default_max_depth())]
    pub max_depth: i64,

    /// UCB exploration constant for the UCT agents
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Plies after which a game is scored as a draw
    #[arg(long, default_value_t = default_max_plies())]
    pub max_plies: usize,

    /// Shift agents one seat along after each game
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        default_value_t = default_rotate_agents()
    )]
    pub rotate_agents: bool,

    /// Base seed for the agents' random streams (0 seeds from entropy)
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Write the match report as JSON to this path
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.game.is_empty() {
            return Err(anyhow!("game cannot be empty"));
        }

        if self.agents.is_empty() || self.agents.iter().any(|a| a.trim().is_empty()) {
            return Err(anyhow!("agents must name at least one agent"));
        }

        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        if self.max_plies == 0 {
            return Err(anyhow!("max_plies must be greater than 0"));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration must be a finite non-negative number, got {}",
                self.exploration
            ));
        }

        if self.limits().is_unbounded() {
            return Err(anyhow!(
                "seconds and iterations are both unlimited; a search would never return"
            ));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Budget for every decision
    pub fn limits(&self) -> SearchLimits {
        SearchLimits::new(self.seconds, self.iterations, self.max_depth)
    }

    pub fn uct_config(&self) -> UctConfig {
        UctConfig::default().with_exploration(self.exploration)
    }

    /// Seed for the `n`-th agent (1-based), or None to seed from entropy.
    pub fn agent_seed(&self, n: usize) -> Option<u64> {
        (self.seed != 0).then(|| self.seed.wrapping_add(n as u64))
    }

    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(|a| a.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            game: "tictactoe".into(),
            agents: vec!["Example UCT".into(), "Example Random AI".into()],
            games: 2,
            seconds: 0.5,
            iterations: -1,
            max_depth: -1,
            exploration: 1.0,
            max_plies: 100,
            rotate_agents: false,
            seed: 0,
            log_level: "info".into(),
            summary_json: None,
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_game() {
        let mut cfg = base_config();
        cfg.game.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("game"));
    }

    #[test]
    fn validate_rejects_missing_agents() {
        let mut cfg = base_config();
        cfg.agents.clear();
        assert!(cfg.validate().is_err());

        cfg.agents = vec!["Example UCT".into(), " ".into()];
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("agents"));
    }

    #[test]
    fn validate_rejects_zero_games() {
        let mut cfg = base_config();
        cfg.games = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("games"));
    }

    #[test]
    fn validate_rejects_zero_max_plies() {
        let mut cfg = base_config();
        cfg.max_plies = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("max_plies"));
    }

    #[test]
    fn validate_rejects_bad_exploration() {
        let mut cfg = base_config();
        cfg.exploration = -0.5;
        assert!(cfg.validate().is_err());
        cfg.exploration = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_unbounded_search() {
        let mut cfg = base_config();
        cfg.seconds = 0.0;
        cfg.iterations = -1;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("never return"));

        cfg.iterations = 500;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn limits_follow_the_flags() {
        let mut cfg = base_config();
        cfg.seconds = 2.0;
        cfg.iterations = 300;
        let limits = cfg.limits();
        assert_eq!(limits.time_limit(), Some(std::time::Duration::from_secs(2)));
        assert_eq!(limits.iteration_cap(), Some(300));
    }

    #[test]
    fn agent_seed_is_offset_per_player() {
        let mut cfg = base_config();
        assert_eq!(cfg.agent_seed(1), None);

        cfg.seed = 40;
        assert_eq!(cfg.agent_seed(1), Some(41));
        assert_eq!(cfg.agent_seed(2), Some(42));
    }

    #[test]
    fn parses_comma_separated_agents() {
        let cfg = Config::parse_from([
            "arena",
            "--game",
            "rps",
            "--agents",
            "Example Random AI,Example Decoupled UCT",
            "--games",
            "3",
        ]);
        assert_eq!(cfg.game, "rps");
        assert_eq!(cfg.games, 3);
        assert!(!cfg.rotate_agents);
        assert_eq!(
            cfg.agent_names().collect::<Vec<_>>(),
            ["Example Random AI", "Example Decoupled UCT"]
        );
    }

    #[test]
    fn parses_rotate_agents_flag() {
        let cfg = Config::parse_from(["arena", "--rotate-agents", "--games", "4"]);
        assert!(cfg.rotate_agents);
        assert_eq!(cfg.games, 4);

        let cfg = Config::parse_from(["arena", "--rotate-agents", "false"]);
        assert!(!cfg.rotate_agents);
    }
}
