//! Arena - plays matches between registered agents
//!
//! Loads a bundled game by name, builds one agent per player from the agent
//! registry, plays the requested number of games and reports the results.
//! Ctrl+C interrupts the decision in progress and ends the match early.

use anyhow::{Context, Result};
use clap::Parser;
use engine_core::{Agent, Game, InterruptFlag};
use engine_games::{build_agent, load_game, play_match, AgentOptions, AnyGame, MatchSettings};
use tokio::signal;
use tracing::{error, info};

mod config;
mod stats;

use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    match load_game(&config.game)? {
        AnyGame::TicTacToe(game) => run(game, config).await,
        AnyGame::Amazons(game) => run(game, config).await,
        AnyGame::Rps(game) => run(game, config).await,
    }
}

async fn run<G: Game>(game: G, config: Config) -> Result<()> {
    let mut agents = build_agents::<G>(&config)?;

    let cancel = InterruptFlag::new();
    let mut flags: Vec<InterruptFlag> = agents.iter().map(|a| a.wants_interrupt()).collect();
    flags.push(cancel.clone());

    // Setup graceful shutdown
    let shutdown_handle = tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        info!("Shutdown signal received, stopping match...");
        for flag in &flags {
            flag.raise();
        }
    });

    info!(
        game = %game.metadata().env_id,
        agents = ?config.agents,
        games = config.games,
        rotate_agents = config.rotate_agents,
        "Starting match"
    );

    let settings = MatchSettings::new(config.games, config.limits())
        .with_max_plies(config.max_plies)
        .with_cancel(cancel)
        .with_rotate_agents(config.rotate_agents)
        .with_seed(config.seed);
    let report = tokio::task::spawn_blocking(move || play_match(&game, &mut agents, &settings))
        .await
        .context("match thread panicked")??;

    shutdown_handle.abort();

    stats::log_summary(&report);
    if let Some(path) = &config.summary_json {
        stats::write_summary(&report, path)?;
        info!("Match summary written to {}", path.display());
    }

    Ok(())
}

fn build_agents<G: Game>(config: &Config) -> Result<Vec<Box<dyn Agent<G>>>> {
    config
        .agent_names()
        .enumerate()
        .map(|(i, name)| {
            let options = AgentOptions {
                seed: config.agent_seed(i + 1),
                uct: config.uct_config(),
            };
            build_agent::<G>(name, &options).map_err(Into::into)
        })
        .collect()
}
