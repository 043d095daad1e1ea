//! Uniform random baseline agent.

use engine_core::game_utils::random_move;
use engine_core::{moves_for_mover, Agent, Game, InterruptFlag, Move, PlayerId, SearchLimits};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Plays a uniformly random legal move of its own player; ignores limits.
#[derive(Debug)]
pub struct RandomAgent {
    player: PlayerId,
    rng: ChaCha20Rng,
    interrupt: InterruptFlag,
}

impl RandomAgent {
    pub const NAME: &'static str = "Example Random AI";

    pub fn new() -> Self {
        Self::from_rng(ChaCha20Rng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha20Rng) -> Self {
        Self {
            player: 0,
            rng,
            interrupt: InterruptFlag::new(),
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Any game can be played at random.
    pub fn supports<G: Game>(_game: &G) -> bool {
        true
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> Agent<G> for RandomAgent {
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
        _limits: SearchLimits,
    ) -> Move<G::Action> {
        let mut moves = game.legal_moves(ctx);
        if !game.is_alternating_move_game() {
            moves = moves_for_mover(&moves, self.player);
        }
        random_move(&moves, &mut self.rng).unwrap_or_else(|| Move::pass(self.player))
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
