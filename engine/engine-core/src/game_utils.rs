//! Shared helpers for games and agents
//!
//! Per-player move filtering for simultaneous-move games and the uniform
//! random move source used both by baseline agents and as the default
//! playout policy.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::moves::{Move, PlayerId};
use crate::typed::Game;

/// Moves in `moves` whose mover is `player`, in their original order.
///
/// # Example
/// ```
/// use engine_core::{moves_for_mover, Move};
///
/// let moves = vec![Move::new(1, 'a'), Move::new(2, 'b'), Move::new(1, 'c')];
/// let mine = moves_for_mover(&moves, 1);
/// assert_eq!(mine, vec![Move::new(1, 'a'), Move::new(1, 'c')]);
/// assert!(moves_for_mover(&moves, 3).is_empty());
/// ```
pub fn moves_for_mover<A: Clone>(moves: &[Move<A>], player: PlayerId) -> Vec<Move<A>> {
    moves
        .iter()
        .filter(|mv| mv.mover() == player)
        .cloned()
        .collect()
}

/// Uniformly random element of `moves`, `None` when empty.
#[inline]
pub fn random_move<A: Clone>(moves: &[Move<A>], rng: &mut ChaCha20Rng) -> Option<Move<A>> {
    moves.choose(rng).cloned()
}

/// One uniformly random move for the whole ply.
///
/// Alternating-move games pick among all of `moves`. Simultaneous-move games
/// pick one move per player that has any and combine them. Returns `None`
/// when nobody can move.
pub fn random_joint_move<G: Game + ?Sized>(
    game: &G,
    moves: &[Move<G::Action>],
    rng: &mut ChaCha20Rng,
) -> Option<Move<G::Action>> {
    if game.is_alternating_move_game() {
        return random_move(moves, rng);
    }

    let num_players = game.num_players();
    let parts: Vec<_> = (1..=num_players)
        .filter_map(|player| random_move(&moves_for_mover(moves, player), rng))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(Move::combined(parts, num_players))
    }
}

/// Play uniformly random moves on `ctx` until the game is over or stuck.
pub fn random_playout<G: Game + ?Sized>(game: &G, ctx: &mut G::Context, rng: &mut ChaCha20Rng) {
    while !game.is_over(ctx) {
        let moves = game.legal_moves(ctx);
        match random_joint_move(game, &moves, rng) {
            Some(mv) => game.apply(ctx, &mv),
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CountingGame;
    use rand::SeedableRng;

    #[test]
    fn test_moves_for_mover_preserves_order() {
        let moves = vec![
            Move::new(2, 10u8),
            Move::new(1, 11u8),
            Move::new(2, 12u8),
            Move::pass(1),
        ];
        assert_eq!(
            moves_for_mover(&moves, 2),
            vec![Move::new(2, 10u8), Move::new(2, 12u8)]
        );
        assert_eq!(
            moves_for_mover(&moves, 1),
            vec![Move::new(1, 11u8), Move::pass(1)]
        );
    }

    #[test]
    fn test_random_move_empty() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let moves: Vec<Move<u8>> = Vec::new();
        assert!(random_move(&moves, &mut rng).is_none());
    }

    #[test]
    fn test_random_move_is_roughly_uniform() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let moves: Vec<_> = (0..4u8).map(|a| Move::new(1, a)).collect();
        let mut counts = [0u32; 4];
        for _ in 0..4000 {
            let mv = random_move(&moves, &mut rng).unwrap();
            counts[*mv.action().unwrap() as usize] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "counts = {:?}", counts);
        }
    }

    #[test]
    fn test_random_playout_reaches_terminal() {
        let game = CountingGame { target: 15 };
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..20 {
            let mut ctx = game.initial_context();
            game.playout(&mut ctx, &mut rng);
            assert!(game.is_over(&ctx));
            assert_eq!(ctx.total, 15);
            assert!(game.status(&ctx).is_some());
        }
    }

    #[test]
    fn test_random_playout_is_deterministic_for_seed() {
        let game = CountingGame { target: 21 };
        let run = |seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut ctx = game.initial_context();
            game.playout(&mut ctx, &mut rng);
            ctx
        };
        assert_eq!(run(3), run(3));
    }
}
