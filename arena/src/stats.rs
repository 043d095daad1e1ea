//! Match summary output.
//!
//! The summary is logged when the match ends and can also be written as JSON
//! for scripts that compare agents across runs.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use engine_games::MatchReport;
use tracing::{debug, info};

/// Log one line per agent plus the match totals.
pub fn log_summary(report: &MatchReport) {
    info!(
        game = %report.game,
        games = report.games_played(),
        draws = report.draws,
        truncated = report.truncated,
        plies = report.total_plies,
        elapsed_secs = format!("{:.2}", report.elapsed_secs),
        illegal_moves = report.illegal_moves,
        cancelled = report.cancelled,
        "Match finished"
    );
    for (index, agent) in report.agents.iter().enumerate() {
        info!(
            agent = %agent,
            wins = report.agent_wins(index),
            win_rate = format!("{:.3}", win_rate(report, index)),
            "Agent result"
        );
    }
    for player in 1..report.wins_per_player.len() {
        debug!(player, wins = report.wins(player), "Seat result");
    }
}

/// Share of played games won by the agent at `index`, 0 when nothing was
/// played.
pub fn win_rate(report: &MatchReport, index: usize) -> f64 {
    match report.games_played() {
        0 => 0.0,
        n => report.agent_wins(index) as f64 / n as f64,
    }
}

/// Write `report` to `path` as pretty JSON (atomic write-then-rename).
pub fn write_summary(report: &MatchReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing match report")?;

    let temp_path = temp_path_for(path);
    let written = fs::File::create(&temp_path)
        .and_then(|mut file| file.write_all(json.as_bytes()))
        .with_context(|| format!("writing {}", temp_path.display()));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("renaming summary to {}", path.display()));
    }

    debug!("Wrote match summary to {}", path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
