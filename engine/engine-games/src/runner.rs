//! Match runner: plays a series of games between agents.

use std::any::type_name;
use std::time::Instant;

use engine_core::game_utils::random_move;
use engine_core::{moves_for_mover, Agent, Game, InterruptFlag, Move, Outcome, PlayerId, SearchLimits};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("{game} needs {expected} agents, got {actual}")]
    WrongAgentCount {
        game: String,
        expected: usize,
        actual: usize,
    },
}

/// How a match is played
#[derive(Debug, Clone)]
pub struct MatchSettings {
    /// Games to play
    pub games: usize,

    /// Budget handed to every `select_action` call
    pub limits: SearchLimits,

    /// Plies after which a running game is stopped and scored as a draw
    pub max_plies: usize,

    /// Raised by the host to stop the match; the current decision is cut
    /// short through the agents' own flags and no further game starts
    pub cancel: InterruptFlag,

    /// Shift every agent one seat along after each game, so that over `N`
    /// games each agent plays every player number once
    pub rotate_agents: bool,

    /// Seed for the legal moves substituted for illegal answers
    pub seed: u64,
}

impl MatchSettings {
    pub fn new(games: usize, limits: SearchLimits) -> Self {
        Self {
            games,
            limits,
            max_plies: 1000,
            cancel: InterruptFlag::new(),
            rotate_agents: false,
            seed: 0,
        }
    }

    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = max_plies;
        self
    }

    pub fn with_cancel(mut self, cancel: InterruptFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_rotate_agents(mut self, rotate_agents: bool) -> Self {
        self.rotate_agents = rotate_agents;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Agent index seated as each player (`seating[p - 1]` plays `p`) in
    /// game `game_index`.
    pub fn seating(&self, game_index: usize, num_players: usize) -> Vec<usize> {
        let shift = if self.rotate_agents && num_players > 0 {
            game_index % num_players
        } else {
            0
        };
        (0..num_players).map(|seat| (seat + shift) % num_players).collect()
    }
}

/// Result of a finished (or cancelled) match
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// `env_id` of the game
    pub game: String,

    /// Agent names in the order they were passed in
    pub agents: Vec<String>,

    /// One outcome per completed game
    pub outcomes: Vec<Outcome>,

    /// Per completed game, the agent index seated as each player
    pub seatings: Vec<Vec<usize>>,

    /// Wins indexed by player id (entry 0 unused)
    pub wins_per_player: Vec<usize>,

    /// Wins indexed like `agents`
    pub wins_per_agent: Vec<usize>,

    pub draws: usize,

    /// Games stopped at `max_plies`, also counted in `draws`
    pub truncated: usize,

    pub total_plies: usize,

    /// Agent answers that were not legal and were replaced by a random
    /// legal move
    pub illegal_moves: usize,

    /// The match was stopped before all games were played
    pub cancelled: bool,

    pub elapsed_secs: f64,
}

impl MatchReport {
    /// Wins of `player`, 0 for unknown players.
    pub fn wins(&self, player: PlayerId) -> usize {
        self.wins_per_player.get(player).copied().unwrap_or(0)
    }

    /// Wins of the agent at `index` in `agents`, whatever seats it took.
    pub fn agent_wins(&self, index: usize) -> usize {
        self.wins_per_agent.get(index).copied().unwrap_or(0)
    }

    pub fn games_played(&self) -> usize {
        self.outcomes.len()
    }
}

/// Play `settings.games` games of `game`.
///
/// `agents[i]` plays player `i + 1` unless `settings.rotate_agents` shifts
/// the seats between games. Every agent is initialized before each game. Alternating-move games ask
/// the mover's agent; simultaneous-move games ask every player that has a
/// legal move and combine the answers. Each agent receives its own copy of
/// the current context.
pub fn play_match<G: Game>(
    game: &G,
    agents: &mut [Box<dyn Agent<G>>],
    settings: &MatchSettings,
) -> Result<MatchReport, MatchError> {
    let metadata = game.metadata();
    let num_players = game.num_players();
    if agents.len() != num_players {
        return Err(MatchError::WrongAgentCount {
            game: metadata.env_id,
            expected: num_players,
            actual: agents.len(),
        });
    }

    for (i, agent) in agents.iter().enumerate() {
        if !agent.supports_game(game) {
            warn!(
                agent = agent.friendly_name(),
                agent_index = i,
                game = %metadata.env_id,
                "Agent does not support this game, playing anyway"
            );
        }
    }

    let mut rng = ChaCha20Rng::seed_from_u64(settings.seed);
    let started = Instant::now();
    let mut report = MatchReport {
        game: metadata.env_id.clone(),
        agents: agents.iter().map(|a| a.friendly_name().to_string()).collect(),
        outcomes: Vec::with_capacity(settings.games),
        seatings: Vec::with_capacity(settings.games),
        wins_per_player: vec![0; num_players + 1],
        wins_per_agent: vec![0; num_players],
        draws: 0,
        truncated: 0,
        total_plies: 0,
        illegal_moves: 0,
        cancelled: false,
        elapsed_secs: 0.0,
    };

    for game_index in 0..settings.games {
        if settings.cancel.is_raised() {
            report.cancelled = true;
            break;
        }

        let seating = settings.seating(game_index, num_players);
        for (seat, &agent) in seating.iter().enumerate() {
            agents[agent].init(game, seat + 1);
        }

        let Some(record) = play_game(game, agents, &seating, settings, &mut rng) else {
            report.cancelled = true;
            break;
        };
        let outcome = record.outcome;

        let winner_agent = outcome.winner.checked_sub(1).and_then(|seat| seating.get(seat).copied());
        if outcome.is_draw() {
            report.draws += 1;
        } else if let Some(wins) = report.wins_per_player.get_mut(outcome.winner) {
            *wins += 1;
            if let Some(agent) = winner_agent {
                report.wins_per_agent[agent] += 1;
            }
        }
        if record.truncated {
            report.truncated += 1;
        }
        report.total_plies += record.plies;
        report.illegal_moves += record.illegal_moves;
        report.outcomes.push(outcome);

        info!(
            game = game_index + 1,
            of = settings.games,
            winner = outcome.winner,
            winner_name = %winner_agent.map_or("draw", |agent| report.agents[agent].as_str()),
            ?seating,
            plies = record.plies,
            truncated = record.truncated,
            "Game finished"
        );
        report.seatings.push(seating);
    }

    for agent in agents.iter_mut() {
        agent.close();
    }

    report.elapsed_secs = started.elapsed().as_secs_f64();
    Ok(report)
}

/// One finished game
struct GameRecord {
    outcome: Outcome,
    plies: usize,
    truncated: bool,
    illegal_moves: usize,
}

/// Play one game from the initial context; `seating[p - 1]` is the index
/// of the agent playing `p`.
///
/// Returns `None` if the match was cancelled mid-game.
fn play_game<G: Game>(
    game: &G,
    agents: &mut [Box<dyn Agent<G>>],
    seating: &[usize],
    settings: &MatchSettings,
    rng: &mut ChaCha20Rng,
) -> Option<GameRecord> {
    let num_players = game.num_players();
    let mut ctx = game.initial_context();
    let mut plies = 0;
    let mut illegal_moves = 0;

    while !game.is_over(&ctx) {
        if settings.cancel.is_raised() {
            return None;
        }
        if plies >= settings.max_plies {
            warn!(plies, game = type_name::<G>(), "Ply cap reached, scoring as a draw");
            return Some(GameRecord {
                outcome: Outcome::draw(),
                plies,
                truncated: true,
                illegal_moves,
            });
        }

        let legal = game.legal_moves(&ctx);
        let mv = if game.is_alternating_move_game() {
            let mover = game.mover(&ctx);
            let Some(&agent) = mover.checked_sub(1).and_then(|seat| seating.get(seat)) else {
                warn!(mover, "Mover has no agent, stopping the game");
                break;
            };
            if legal.is_empty() {
                break;
            }
            let answer = agents[agent].select_action(game, &ctx.clone(), settings.limits);
            checked_move(agents[agent].as_ref(), answer, &legal, rng, &mut illegal_moves)
        } else {
            let mut parts = Vec::with_capacity(num_players);
            for player in 1..=num_players {
                let own = moves_for_mover(&legal, player);
                if own.is_empty() {
                    continue;
                }
                let agent = seating[player - 1];
                let answer = agents[agent].select_action(game, &ctx.clone(), settings.limits);
                parts.push(checked_move(agents[agent].as_ref(), answer, &own, rng, &mut illegal_moves));
            }
            if parts.is_empty() {
                break;
            }
            Move::combined(parts, num_players)
        };

        debug!(ply = plies, mover = mv.mover(), ?mv, "Applying move");
        game.apply(&mut ctx, &mv);
        plies += 1;
    }

    // A stuck, non-terminal game scores as a draw
    Some(GameRecord {
        outcome: game.status(&ctx).unwrap_or_else(Outcome::draw),
        plies,
        truncated: false,
        illegal_moves,
    })
}

/// `answer` if it is among `legal` (never empty), otherwise a uniformly
/// random move from `legal`.
fn checked_move<G: Game>(
    agent: &dyn Agent<G>,
    answer: Move<G::Action>,
    legal: &[Move<G::Action>],
    rng: &mut ChaCha20Rng,
    illegal_moves: &mut usize,
) -> Move<G::Action> {
    if legal.contains(&answer) {
        return answer;
    }
    *illegal_moves += 1;
    match random_move(legal, rng) {
        Some(substitute) => {
            warn!(
                agent = agent.friendly_name(),
                ?answer,
                ?substitute,
                "Agent returned an illegal move, playing a random legal move instead"
            );
            substitute
        }
        None => answer,
    }
}
