//! Decoupled UCT search loop and agent.

use engine_core::{Agent, Game, InterruptFlag, Move, PlayerId, SearchLimits, Utilities};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace, warn};

use super::node::{DuctNode, DuctTree};
use crate::budget::Budget;
use crate::config::UctConfig;
use crate::node::NodeId;
use crate::search::SearchResult;

/// Decoupled UCT search state for one decision.
pub struct DuctSearch<'a, G: Game> {
    game: &'a G,
    tree: DuctTree<G::Context, G::Action>,
    config: UctConfig,
    player: PlayerId,
    stuck_playouts: u64,
}

impl<'a, G: Game> DuctSearch<'a, G> {
    /// Build the root from a private copy of `ctx`.
    pub fn new(game: &'a G, ctx: &G::Context, player: PlayerId, config: UctConfig) -> Self {
        let root = Self::make_node(game, NodeId::NONE, ctx.clone());
        Self {
            game,
            tree: DuctTree::new(root),
            config,
            player,
            stuck_playouts: 0,
        }
    }

    fn make_node(game: &G, parent: NodeId, context: G::Context) -> DuctNode<G::Context, G::Action> {
        let is_terminal = game.is_over(&context);
        let legal = if is_terminal {
            Vec::new()
        } else {
            game.legal_moves(&context)
        };
        DuctNode::new(parent, context, game.num_players(), &legal, is_terminal)
    }

    /// Run iterations until the budget is exhausted or `interrupt` is raised.
    pub fn run(
        &mut self,
        limits: &SearchLimits,
        interrupt: &InterruptFlag,
        rng: &mut ChaCha20Rng,
    ) -> SearchResult<G::Action> {
        let budget = Budget::start(limits, interrupt.clone());

        if !self.tree.get(self.tree.root()).has_moves(self.player) {
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

        let root = self.tree.get(self.tree.root());
        let fallback = root.visits[self.player].iter().all(|&v| v == 0);
        let chosen = self
            .tree
            .best_move_for(self.player, rng)
            .unwrap_or_else(|| Move::pass(self.player));

        debug!(
            iterations,
            elapsed_ms = budget.elapsed().as_millis() as u64,
            nodes = self.tree.len(),
            root_visits = root.total_visits,
            ?stop_reason,
            fallback,
            "DUCT search finished"
        );

        SearchResult {
            chosen,
            iterations,
            elapsed: budget.elapsed(),
            stop_reason: Some(stop_reason),
            fallback,
            root_stats: self.tree.root_stats(),
            nodes: self.tree.len(),
            stuck_playouts: self.stuck_playouts,
        }
    }

    fn iterate(&mut self, rng: &mut ChaCha20Rng) {
        let leaf = self.select_and_expand(rng);
        let utilities = self.playout(leaf, rng);
        self.tree.backpropagate(leaf, &utilities);

        trace!(leaf = leaf.0, nodes = self.tree.len(), "DUCT iteration complete");
    }

    /// Descend by per-player UCB1 until a terminal or stuck node, or until a
    /// move tuple with no child yet, which is expanded and returned.
    fn select_and_expand(&mut self, rng: &mut ChaCha20Rng) -> NodeId {
        let num_players = self.game.num_players();
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_terminal || !node.any_moves() {
                return current;
            }

            let mut picks = vec![0usize; num_players + 1];
            let mut key = Vec::with_capacity(num_players);
            for player in 1..=num_players {
                if let Some(index) = node.select_index(player, &self.config, rng) {
                    picks[player] = index;
                    key.push(node.legal_moves[player][index].clone());
                }
            }

            if let Some(&child) = node.children.get(&key) {
                self.tree.get_mut(current).last_selected = picks;
                current = child;
                continue;
            }

            let combined = Move::combined(key.clone(), num_players);
            let mut context = node.context.clone();
            self.game.apply(&mut context, &combined);

            self.tree.get_mut(current).last_selected = picks;
            let child = Self::make_node(self.game, current, context);
            return self.tree.add_child(key, child);
        }
    }

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

    pub fn tree(&self) -> &DuctTree<G::Context, G::Action> {
        &self.tree
    }
}

/// Decoupled UCT agent for simultaneous-move, deterministic games.
#[derive(Debug)]
pub struct Duct {
    player: PlayerId,
    config: UctConfig,
    rng: ChaCha20Rng,
    interrupt: InterruptFlag,
}

impl Duct {
    pub const NAME: &'static str = "Example Decoupled UCT";

    pub fn new() -> Self {
        Self::from_rng(ChaCha20Rng::from_entropy())
    }

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

    pub fn with_config(mut self, config: UctConfig) -> Self {
        self.config = config;
        self
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Rejects stochastic games and alternating-move games.
    pub fn supports<G: Game>(game: &G) -> bool {
        !game.is_stochastic_game() && !game.is_alternating_move_game()
    }

    /// Search `ctx` and return the full result; `chosen` is this agent's own
    /// move, never a combined one.
    pub fn search<G: Game>(
        &mut self,
        game: &G,
        ctx: &G::Context,
        limits: SearchLimits,
    ) -> SearchResult<G::Action> {
        let mut search = DuctSearch::new(game, ctx, self.player, self.config);
        search.run(&limits, &self.interrupt, &mut self.rng)
    }
}

impl Default for Duct {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> Agent<G> for Duct {
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
