use super::*;
use rand::{Rng, SeedableRng};

fn sq(game_width: u16, col: u16, row: u16) -> Square {
    row * game_width + col
}

/// Total (queen move, arrow) pairs available to the player to move.
fn full_turns(game: &Amazons, ctx: &State) -> usize {
    game.legal_moves(ctx)
        .iter()
        .map(|mv| {
            let mut next = ctx.clone();
            game.apply(&mut next, mv);
            game.legal_moves(&next).len()
        })
        .sum()
}

#[test]
fn test_initial_position() {
    let game = Amazons::new();
    let ctx = game.initial_context();

    assert_eq!(ctx.queens(1), vec![3, 6, 30, 39]);
    assert_eq!(ctx.queens(2), vec![60, 69, 93, 96]);
    assert_eq!(ctx.arrows(), 0);
    assert_eq!(game.mover(&ctx), 1);
    assert_eq!(game.status(&ctx), None);
    assert!(ctx.pending_shot().is_none());
}

#[test]
fn test_opening_move_counts() {
    let game = Amazons::new();
    let ctx = game.initial_context();
    assert_eq!(game.legal_moves(&ctx).len(), 80);
    // Well-known count of complete first turns on the standard board
    assert_eq!(full_turns(&game, &ctx), 2176);

    let small = Amazons::small();
    let ctx = small.initial_context();
    assert_eq!(small.legal_moves(&ctx).len(), 22);
    assert_eq!(full_turns(&small, &ctx), 334);
}

#[test]
fn test_moves_in_square_order() {
    let game = Amazons::new();
    let ctx = game.initial_context();
    let moves = game.legal_moves(&ctx);
    assert_eq!(moves[0], Move::new(1, Action::Queen { from: 3, to: 2 }));
    assert!(moves.iter().all(|mv| mv.mover() == 1));
}

#[test]
fn test_turn_is_queen_then_arrow() {
    let game = Amazons::new();
    let mut ctx = game.initial_context();
    let from = sq(10, 3, 0);
    let to = sq(10, 3, 5);

    game.apply(&mut ctx, &Move::new(1, Action::Queen { from, to }));
    assert_eq!(ctx.cell(from), 0);
    assert_eq!(ctx.cell(to), 1);
    assert_eq!(ctx.pending_shot(), Some(to));
    // Same player shoots next
    assert_eq!(game.mover(&ctx), 1);

    let shots = game.legal_moves(&ctx);
    assert!(shots.iter().all(|mv| matches!(mv.action(), Some(Action::Arrow { .. }))));
    // Shooting back to the vacated square is always possible
    assert!(shots.contains(&Move::new(1, Action::Arrow { to: from })));

    game.apply(&mut ctx, &Move::new(1, Action::Arrow { to: from }));
    assert_eq!(ctx.cell(from), 3);
    assert_eq!(ctx.arrows(), 1);
    assert_eq!(game.mover(&ctx), 2);
    assert!(ctx.pending_shot().is_none());
}

#[test]
fn test_illegal_actions_are_ignored() {
    let game = Amazons::new();
    let ctx = game.initial_context();

    // Arrow before any queen move
    let mut after = ctx.clone();
    game.apply(&mut after, &Move::new(1, Action::Arrow { to: 44 }));
    assert_eq!(after, ctx);

    // Moving the opponent's queen
    game.apply(&mut after, &Move::new(1, Action::Queen { from: 60, to: 50 }));
    assert_eq!(after, ctx);

    // Out of turn
    game.apply(&mut after, &Move::new(2, Action::Queen { from: 60, to: 50 }));
    assert_eq!(after, ctx);

    game.apply(&mut after, &Move::pass(1));
    assert_eq!(after, ctx);
}

#[test]
fn test_queens_and_arrows_block_lines() {
    let game = Amazons::new();
    let mut ctx = game.initial_context();
    // Queen from d1 (3,0) up to d9 (3,8); it cannot jump d10's black queen
    let from = sq(10, 3, 0);
    let to = sq(10, 3, 8);
    game.apply(&mut ctx, &Move::new(1, Action::Queen { from, to }));

    let shots = game.legal_moves(&ctx);
    assert!(!shots.contains(&Move::new(1, Action::Arrow { to: sq(10, 3, 9) })));
    assert!(shots.contains(&Move::new(1, Action::Arrow { to: sq(10, 3, 1) })));

    // Burn d5; moves down the d file now stop at d6
    game.apply(&mut ctx, &Move::new(1, Action::Arrow { to: sq(10, 3, 4) }));
    let mut blocked = ctx.clone();
    blocked.to_move = 1;
    let reach: Vec<_> = game
        .legal_moves(&blocked)
        .into_iter()
        .filter_map(|mv| match mv.action() {
            Some(&Action::Queen { from, to }) if from == sq(10, 3, 8) => Some(to),
            _ => None,
        })
        .collect();
    assert!(reach.contains(&sq(10, 3, 5)));
    assert!(!reach.contains(&sq(10, 3, 4)));
}

#[test]
fn test_stuck_player_loses() {
    // 3x3 board: black queen boxed in a corner after white's shot
    let game = Amazons {
        width: 3,
        height: 3,
        queens: [vec![(2, 2)], vec![(0, 0)]],
    };
    let mut ctx = game.initial_context();
    ctx.cells[sq(3, 0, 1) as usize] = ARROW;
    ctx.cells[sq(3, 1, 0) as usize] = ARROW;

    // White moves next to the corner and burns the last exit
    game.apply(&mut ctx, &Move::new(1, Action::Queen { from: 8, to: 5 }));
    assert!(!game.is_over(&ctx));
    game.apply(&mut ctx, &Move::new(1, Action::Arrow { to: 4 }));

    assert!(game.is_over(&ctx));
    assert_eq!(game.status(&ctx), Some(Outcome::win(1)));
    assert!(game.legal_moves(&ctx).is_empty());
    let utilities = game.utilities(&ctx);
    assert_eq!(utilities[1], 1.0);
    assert_eq!(utilities[2], -1.0);
}

#[test]
fn test_playout_always_finishes() {
    for game in [Amazons::new(), Amazons::small()] {
        for seed in 0..10 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut ctx = game.initial_context();
            game.playout(&mut ctx, &mut rng);

            assert!(game.is_over(&ctx), "seed {}", seed);
            let winner = game.status(&ctx).map(|o| o.winner);
            assert!(matches!(winner, Some(1) | Some(2)), "seed {}", seed);
            assert!(game.utilities(&ctx).is_valid_for(2));
            // Amazons never ends in a draw, and the board only fills up
            assert!(ctx.arrows() < ctx.cells.len());
        }
    }
}

#[test]
fn test_random_games_alternate_turns() {
    let game = Amazons::small();
    for seed in 0..20 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut ctx = game.initial_context();
        let mut plies = 0;

        while !game.is_over(&ctx) {
            let moves = game.legal_moves(&ctx);
            assert!(!moves.is_empty(), "seed {} ply {}", seed, plies);
            let mover = game.mover(&ctx);
            let half_turn = ctx.pending_shot().is_none();

            let mv = moves[rng.gen_range(0..moves.len())].clone();
            game.apply(&mut ctx, &mv);
            plies += 1;

            if half_turn {
                assert_eq!(game.mover(&ctx), mover);
            } else if !game.is_over(&ctx) {
                assert_ne!(game.mover(&ctx), mover);
            }
        }

        // Every full turn burns one of the 32 free squares
        assert!(plies <= 2 * 32, "seed {}", seed);
        assert_eq!(plies % 2, 0, "games end after an arrow");
    }
}

#[test]
fn test_metadata() {
    let game = Amazons::new();
    assert!(game.is_alternating_move_game());
    assert_eq!(game.metadata().env_id, "amazons");
    assert_eq!(game.metadata().board_size(), 100);
    assert_eq!(Amazons::small().metadata().env_id, "amazons-small");
    assert_eq!(Action::Queen { from: 3, to: 33 }.to_string(), "Q3-33");
}

#[test]
fn test_display() {
    let game = Amazons::small();
    let ctx = game.initial_context();
    let rendered = ctx.to_string();
    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[2], "B....B");
    assert_eq!(lines[3], "W....W");
}
