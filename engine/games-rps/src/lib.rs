//! Rock-Paper-Scissors as a simultaneous-move game
//!
//! Both players throw at once every round. The host lists the throws of both
//! players, each tagged with its mover, and advances only on a combined move
//! holding one throw per player. After the configured number of rounds the
//! player with more round wins takes the match; equal counts are a draw.

use std::fmt;

use engine_core::{
    Game, GameMetadata, Move, Outcome, PlayerId, TurnStructure, Utilities,
};

/// One throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Throw {
    Rock,
    Paper,
    Scissors,
}

impl Throw {
    pub const ALL: [Throw; 3] = [Throw::Rock, Throw::Paper, Throw::Scissors];

    /// Whether `self` wins against `other`.
    pub fn beats(self, other: Throw) -> bool {
        matches!(
            (self, other),
            (Throw::Rock, Throw::Scissors)
                | (Throw::Paper, Throw::Rock)
                | (Throw::Scissors, Throw::Paper)
        )
    }
}

impl fmt::Display for Throw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Throw::Rock => "rock",
            Throw::Paper => "paper",
            Throw::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

/// Match state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RpsState {
    round: u32,
    /// Round wins, indexed by player (entry 0 unused)
    wins: [u32; 3],
    /// Throws of the last round, player 1 first
    last: Option<[Throw; 2]>,
}

impl RpsState {
    /// Rounds played so far
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn wins(&self, player: PlayerId) -> u32 {
        self.wins.get(player).copied().unwrap_or(0)
    }

    pub fn last_throws(&self) -> Option<[Throw; 2]> {
        self.last
    }
}

/// Rock-Paper-Scissors over a fixed number of rounds
#[derive(Debug, Clone, Copy)]
pub struct RockPaperScissors {
    rounds: u32,
}

impl RockPaperScissors {
    /// Match of `rounds` rounds (at least one).
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl Default for RockPaperScissors {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Game for RockPaperScissors {
    type Context = RpsState;
    type Action = Throw;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("rps", "Rock-Paper-Scissors")
            .with_turns(TurnStructure::Simultaneous)
            .with_description(format!(
                "Both players throw at once; best of {} rounds.",
                self.rounds
            ))
    }

    fn num_players(&self) -> usize {
        2
    }

    fn is_alternating_move_game(&self) -> bool {
        false
    }

    fn initial_context(&self) -> RpsState {
        RpsState::default()
    }

    fn legal_moves(&self, ctx: &RpsState) -> Vec<Move<Throw>> {
        if self.is_over(ctx) {
            return Vec::new();
        }
        (1..=2)
            .flat_map(|player| Throw::ALL.into_iter().map(move |t| Move::new(player, t)))
            .collect()
    }

    /// Resolve one round; anything but a combined move with a throw from
    /// each player is ignored.
    fn apply(&self, ctx: &mut RpsState, mv: &Move<Throw>) {
        if self.is_over(ctx) || !mv.is_combined() {
            return;
        }
        let throw_of = |player| mv.part_for(player).and_then(|part| part.action()).copied();
        let (Some(first), Some(second)) = (throw_of(1), throw_of(2)) else {
            return;
        };

        if first.beats(second) {
            ctx.wins[1] += 1;
        } else if second.beats(first) {
            ctx.wins[2] += 1;
        }
        ctx.round += 1;
        ctx.last = Some([first, second]);
    }

    fn is_over(&self, ctx: &RpsState) -> bool {
        ctx.round >= self.rounds
    }

    fn status(&self, ctx: &RpsState) -> Option<Outcome> {
        if !self.is_over(ctx) {
            return None;
        }
        Some(match ctx.wins[1].cmp(&ctx.wins[2]) {
            std::cmp::Ordering::Greater => Outcome::win(1),
            std::cmp::Ordering::Less => Outcome::win(2),
            std::cmp::Ordering::Equal => Outcome::draw(),
        })
    }

    fn mover(&self, _ctx: &RpsState) -> PlayerId {
        Move::<Throw>::combined_mover(2)
    }

    fn utilities(&self, ctx: &RpsState) -> Utilities {
        Utilities::from_winner(2, self.status(ctx).map_or(0, |o| o.winner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::moves_for_mover;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn round(p1: Throw, p2: Throw) -> Move<Throw> {
        Move::combined(vec![Move::new(1, p1), Move::new(2, p2)], 2)
    }

    #[test]
    fn test_beats_is_cyclic() {
        for a in Throw::ALL {
            assert!(!a.beats(a));
            let wins = Throw::ALL.iter().filter(|&&b| a.beats(b)).count();
            assert_eq!(wins, 1);
        }
        assert!(Throw::Paper.beats(Throw::Rock));
    }

    #[test]
    fn test_legal_moves_per_player() {
        let game = RockPaperScissors::new(1);
        let ctx = game.initial_context();
        let moves = game.legal_moves(&ctx);
        assert_eq!(moves.len(), 6);
        assert_eq!(moves_for_mover(&moves, 1).len(), 3);
        assert_eq!(moves_for_mover(&moves, 2).len(), 3);
        assert_eq!(moves[0], Move::new(1, Throw::Rock));
        assert_eq!(game.mover(&ctx), 3);
        assert!(!game.is_alternating_move_game());
    }

    #[test]
    fn test_combined_move_advances_both_players() {
        let game = RockPaperScissors::new(3);
        let mut ctx = game.initial_context();
        let mv = round(Throw::Scissors, Throw::Paper);
        assert_eq!(mv.mover(), 3);

        game.apply(&mut ctx, &mv);
        assert_eq!(ctx.round(), 1);
        assert_eq!(ctx.wins(1), 1);
        assert_eq!(ctx.wins(2), 0);
        assert_eq!(ctx.last_throws(), Some([Throw::Scissors, Throw::Paper]));
        assert!(!game.is_over(&ctx));
    }

    #[test]
    fn test_single_player_moves_are_ignored() {
        let game = RockPaperScissors::new(1);
        let mut ctx = game.initial_context();
        game.apply(&mut ctx, &Move::new(1, Throw::Rock));
        game.apply(&mut ctx, &Move::combined(vec![Move::new(1, Throw::Rock)], 2));
        assert_eq!(ctx, game.initial_context());
    }

    #[test]
    fn test_match_outcomes() {
        let game = RockPaperScissors::new(3);
        let mut ctx = game.initial_context();
        game.apply(&mut ctx, &round(Throw::Rock, Throw::Paper));
        game.apply(&mut ctx, &round(Throw::Rock, Throw::Rock));
        game.apply(&mut ctx, &round(Throw::Rock, Throw::Scissors));

        assert!(game.is_over(&ctx));
        assert!(game.legal_moves(&ctx).is_empty());
        assert_eq!(game.status(&ctx), Some(Outcome::draw()));
        assert_eq!(game.utilities(&ctx).as_slice(), &[0.0, 0.0, 0.0]);

        let game = RockPaperScissors::new(1);
        let mut ctx = game.initial_context();
        game.apply(&mut ctx, &round(Throw::Rock, Throw::Paper));
        assert_eq!(game.status(&ctx), Some(Outcome::win(2)));
        assert_eq!(game.utilities(&ctx)[2], 1.0);

        // No further rounds once over
        game.apply(&mut ctx, &round(Throw::Paper, Throw::Rock));
        assert_eq!(ctx.round(), 1);
    }

    #[test]
    fn test_default_playout_finishes() {
        let game = RockPaperScissors::new(5);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut ctx = game.initial_context();
        game.playout(&mut ctx, &mut rng);
        assert!(game.is_over(&ctx));
        assert_eq!(ctx.round(), 5);
        assert!(game.utilities(&ctx).is_valid_for(2));
    }

    #[test]
    fn test_metadata() {
        let game = RockPaperScissors::new(2);
        let metadata = game.metadata();
        assert_eq!(metadata.env_id, "rps");
        assert_eq!(metadata.turns, TurnStructure::Simultaneous);
        assert_eq!(RockPaperScissors::new(0).rounds(), 1);
    }
}
