//! Sequential UCT search for alternating-move games.
//!
//! Implements the four-phase loop, run until the budget is spent:
//! 1. Selection: descend by UCB1 until a node with unexpanded moves or a terminal node
//! 2. Expansion: pop the next unexpanded move and add exactly one child
//! 3. Playout: uniform random playout from a copy of the new node's state
//! 4. Backpropagation: credit every node on the path with the utility of the
//!    player who chose it
//!
//! The final move is the root child with the highest mean score.

use std::time::Duration;

use engine_core::game_utils::random_move;
use engine_core::{Agent, Game, InterruptFlag, Move, PlayerId, SearchLimits, Utilities};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::budget::{Budget, StopReason};
use crate::config::UctConfig;
use crate::node::{NodeId, UctNode};
use crate::tree::{MoveStats, UctTree};

/// Result of one decision.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<A> {
    /// Move to play; always legal at the searched state, or a pass if there
    /// was no legal move
    pub chosen: Move<A>,

    /// Completed iterations (each one reached backup)
    pub iterations: u64,

    /// Wall-clock time spent searching
    pub elapsed: Duration,

    /// What ended the loop; None if the loop never ran
    pub stop_reason: Option<StopReason>,

    /// `true` when `chosen` was drawn uniformly at random because the search
    /// produced no statistics
    pub fallback: bool,

    /// Root statistics; for decoupled search, one entry per move of every player
    pub root_stats: Vec<MoveStats<A>>,

    /// Nodes allocated by the search
    pub nodes: usize,

    /// Playouts that stopped in a non-terminal state with nobody able to move
    pub stuck_playouts: u64,
}

impl<A> SearchResult<A> {
    /// Root statistics for the moves of `player`.
    pub fn stats_for(&self, player: PlayerId) -> impl Iterator<Item = &MoveStats<A>> {
        self.root_stats
            .iter()
            .filter(move |stats| stats.mv.mover() == player)
    }
}

/// Sequential UCT search state for one decision.
pub struct UctSearch<'a, G: Game> {
    game: &'a G,
    tree: UctTree<G::Context, G::Action>,
    config: UctConfig,
    player: PlayerId,
    stuck_playouts: u64,
    root_moves: Vec<Move<G::Action>>,
}

impl<'a, G: Game> UctSearch<'a, G> {
    /// Build the root from a private copy of `ctx`.
    pub fn new(game: &'a G, ctx: &G::Context, player: PlayerId, config: UctConfig) -> Self {
        let context = ctx.clone();
        let is_terminal = game.is_over(&context);
        let root_moves = if is_terminal {
            Vec::new()
        } else {
            game.legal_moves(&context)
        };
        let mover = game.mover(&context);
        let root = UctNode::new_root(context, mover, root_moves.clone(), is_terminal);

        Self {
            game,
            tree: UctTree::new(root),
            config,
            player,
            stuck_playouts: 0,
            root_moves,
        }
    }

    /// Run iterations until the budget is exhausted or `interrupt` is raised.
    pub fn run(
        &mut self,
        limits: &SearchLimits,
        interrupt: &InterruptFlag,
        rng: &mut ChaCha20Rng,
    ) -> SearchResult<G::Action> {
        let budget = Budget::start(limits, interrupt.clone());

        if self.root_moves.is_empty() {
            return SearchResult {
                chosen: Move::pass(self.player),
                iterations: 0,
                elapsed: budget.elapsed(),
                stop_reason: None,
                fallback: false,
                root_stats: Vec::new(),
                nodes: self.tree.len(),
                stuck_playouts: 0,
            };
        }

        let mut iterations = 0u64;
        let stop_reason = loop {
            if let Some(reason) = budget.exhausted(iterations) {
                break reason;
            }
            self.iterate(rng);
            iterations += 1;
        };

        if self.stuck_playouts > 0 {
            warn!(
                stuck_playouts = self.stuck_playouts,
                iterations,
                "Playouts ended in a non-terminal state with no legal moves; scored as they stood"
            );
        }

        let (chosen, fallback) = match self.tree.best_move_by_mean(rng) {
            Some(mv) => (mv, false),
            None => (
                random_move(&self.root_moves, rng).unwrap_or_else(|| Move::pass(self.player)),
                true,
            ),
        };

        let stats = self.tree.stats();
        debug!(
            iterations,
            elapsed_ms = budget.elapsed().as_millis() as u64,
            nodes = stats.total_nodes,
            max_depth = stats.max_depth,
            ?stop_reason,
            fallback,
            "UCT search finished"
        );

        SearchResult {
            chosen,
            iterations,
            elapsed: budget.elapsed(),
            stop_reason: Some(stop_reason),
            fallback,
            root_stats: self.tree.root_stats(),
            nodes: stats.total_nodes,
            stuck_playouts: self.stuck_playouts,
        }
    }

    /// Run a single iteration (select -> expand -> playout -> backpropagate).
    fn iterate(&mut self, rng: &mut ChaCha20Rng) {
        let selected = self.select(rng);
        let leaf = self.expand(selected);
        let utilities = self.playout(leaf, rng);
        self.tree.backpropagate(leaf, &utilities);

        trace!(
            leaf = leaf.0,
            expanded = leaf != selected,
            nodes = self.tree.len(),
            "UCT iteration complete"
        );
    }

    /// Descend by UCB1 until a node that still has moves to expand, or a
    /// terminal node.
    fn select(&self, rng: &mut ChaCha20Rng) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_terminal || node.has_unexpanded() {
                return current;
            }

            match self.tree.select_child(current, &self.config, rng) {
                Some(child_id) => current = child_id,
                // Stuck non-terminal state
                None => return current,
            }
        }
    }

    /// Add one child for the next unexpanded move; returns the node to play
    /// out from.
    fn expand(&mut self, node_id: NodeId) -> NodeId {
        let node = self.tree.get_mut(node_id);
        if node.is_terminal {
            return node_id;
        }
        let Some(mv) = node.unexpanded.pop_front() else {
            return node_id;
        };

        let mut context = node.context.clone();
        self.game.apply(&mut context, &mv);

        let is_terminal = self.game.is_over(&context);
        let legal_moves = if is_terminal {
            Vec::new()
        } else {
            self.game.legal_moves(&context)
        };
        let mover = self.game.mover(&context);

        self.tree.add_child(UctNode::new_child(
            node_id,
            mv,
            context,
            mover,
            legal_moves,
            is_terminal,
        ))
    }

    /// Utilities at the end of a random playout from `node_id`.
    fn playout(&mut self, node_id: NodeId, rng: &mut ChaCha20Rng) -> Utilities {
        let node = self.tree.get(node_id);
        let utilities = if node.is_terminal {
            self.game.utilities(&node.context)
        } else {
            let mut context = node.context.clone();
            self.game.playout(&mut context, rng);
            if !self.game.is_over(&context) {
                // Scored as it stands; reported once the search ends
                self.stuck_playouts += 1;
            }
            self.game.utilities(&context)
        };

        debug_assert!(
            utilities.is_valid_for(self.game.num_players()),
            "utilities must hold one value in [-1, 1] per player: {:?}",
            utilities
        );
        utilities
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &UctTree<G::Context, G::Action> {
        &self.tree
    }
}

/// UCT agent for alternating-move, deterministic games.
#[derive(Debug)]
pub struct Uct {
    player: PlayerId,
    config: UctConfig,
    rng: ChaCha20Rng,
    interrupt: InterruptFlag,
}

impl Uct {
    pub const NAME: &'static str = "Example UCT";

    /// Agent seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(ChaCha20Rng::from_entropy())
    }

    /// Agent with a reproducible random stream.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha20Rng) -> Self {
        Self {
            player: 0,
            config: UctConfig::default(),
            rng,
            interrupt: InterruptFlag::new(),
        }
    }

    /// Builder pattern: set the search configuration.
    pub fn with_config(mut self, config: UctConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &UctConfig {
        &self.config
    }

    /// Player recorded by the last `init` (0 before any).
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Rejects stochastic games and simultaneous-move games.
    pub fn supports<G: Game>(game: &G) -> bool {
        !game.is_stochastic_game() && game.is_alternating_move_game()
    }

    /// Search `ctx` and return the full result, not just the move.
    pub fn search<G: Game>(
        &mut self,
        game: &G,
        ctx: &G::Context,
        limits: SearchLimits,
    ) -> SearchResult<G::Action> {
        let mut search = UctSearch::new(game, ctx, self.player, self.config);
        search.run(&limits, &self.interrupt, &mut self.rng)
    }
}

impl Default for Uct {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> Agent<G> for Uct {
    fn friendly_name(&self) -> &str {
        Self::NAME
    }

    fn init(&mut self, _game: &G, player: PlayerId) {
        self.player = player;
        self.interrupt.clear();
    }

    fn select_action(
        &mut self,
        game: &G,
        ctx: &G::Context,
        limits: SearchLimits,
    ) -> Move<G::Action> {
        self.search(game, ctx, limits).chosen
    }

    fn supports_game(&self, game: &G) -> bool {
        Self::supports(game)
    }

    fn wants_interrupt(&self) -> InterruptFlag {
        self.interrupt.clone()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }
}
