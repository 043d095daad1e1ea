//! Game of the Amazons for the arena
//!
//! Two players each move a set of queens on a square board. A turn is a queen
//! move (any distance in one of eight directions, like a chess queen) followed
//! by an arrow shot from the queen's new square, again like a chess queen. The
//! arrow burns the square it lands on for the rest of the game. Nothing may
//! pass through or land on a queen or a burnt square. A player who cannot move
//! any queen at the start of their turn loses.
//!
//! The two halves of a turn are separate plies with the same mover: first a
//! [`Action::Queen`] move, then an [`Action::Arrow`] shot. An arrow can always
//! be shot back to the square the queen just left, so the second ply is never
//! empty.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use games_amazons::Amazons;
//!
//! let game = Amazons::new();
//! let ctx = game.initial_context();
//! assert_eq!(game.mover(&ctx), 1);
//! assert!(game.legal_moves(&ctx).iter().all(|mv| mv.mover() == 1));
//! ```

use std::fmt;

use engine_core::{Game, GameMetadata, Move, Outcome, PlayerId, Utilities};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

const EMPTY: u8 = 0;
const ARROW: u8 = 3;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Board square, `row * width + col` with row 0 at the bottom
pub type Square = u16;

/// Amazons action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move the queen standing on `from` to `to`
    Queen { from: Square, to: Square },
    /// Burn `to` with an arrow shot from the queen that just moved
    Arrow { to: Square },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Queen { from, to } => write!(f, "Q{}-{}", from, to),
            Action::Arrow { to } => write!(f, "A{}", to),
        }
    }
}

/// Amazons game state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    width: u16,
    height: u16,
    /// 0=empty, 1/2=queen of that player, 3=arrow
    cells: Vec<u8>,
    /// Player to move: 1 or 2
    to_move: u8,
    /// Square of the queen that moved and still has to shoot
    pending_shot: Option<Square>,
    /// 0 while running, otherwise the winning player
    winner: u8,
}

impl State {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cell contents: 0=empty, 1/2=queen of that player, 3=arrow
    pub fn cell(&self, square: Square) -> u8 {
        self.cells[square as usize]
    }

    pub fn to_move(&self) -> u8 {
        self.to_move
    }

    /// Square of the queen that must shoot next, if the turn is half done
    pub fn pending_shot(&self) -> Option<Square> {
        self.pending_shot
    }

    pub fn winner(&self) -> u8 {
        self.winner
    }

    pub fn is_done(&self) -> bool {
        self.winner != 0
    }

    /// Number of burnt squares
    pub fn arrows(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == ARROW).count()
    }

    /// Squares holding a queen of `player`, in square order
    pub fn queens(&self, player: u8) -> Vec<Square> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == player)
            .map(|(square, _)| square as Square)
            .collect()
    }

    /// Step one square from `square` in `(dx, dy)`, None at the edge.
    #[inline]
    fn step(&self, square: Square, (dx, dy): (i32, i32)) -> Option<Square> {
        let col = (square % self.width) as i32 + dx;
        let row = (square / self.width) as i32 + dy;
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        Some(row as Square * self.width + col as Square)
    }

    /// Append every empty square a queen on `from` can reach to `out`.
    fn reachable(&self, from: Square, out: &mut Vec<Square>) {
        for dir in DIRECTIONS {
            let mut current = from;
            while let Some(next) = self.step(current, dir) {
                if self.cells[next as usize] != EMPTY {
                    break;
                }
                out.push(next);
                current = next;
            }
        }
    }

    /// Whether any queen of `player` has an empty neighbour.
    fn can_move(&self, player: u8) -> bool {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == player)
            .any(|(square, _)| {
                DIRECTIONS.iter().any(|&dir| {
                    self.step(square as Square, dir)
                        .is_some_and(|next| self.cells[next as usize] == EMPTY)
                })
            })
    }

    /// Queen moves of the player to move as `(from, to)` pairs, in square order.
    fn queen_moves(&self, out: &mut Vec<(Square, Square)>) {
        let mut targets = Vec::new();
        for from in self.queens(self.to_move) {
            targets.clear();
            self.reachable(from, &mut targets);
            out.extend(targets.iter().map(|&to| (from, to)));
        }
    }

    fn move_queen(&mut self, from: Square, to: Square) -> bool {
        if self.pending_shot.is_some()
            || self.cells[from as usize] != self.to_move
            || self.cells[to as usize] != EMPTY
        {
            return false;
        }
        self.cells[to as usize] = self.to_move;
        self.cells[from as usize] = EMPTY;
        self.pending_shot = Some(to);
        true
    }

    /// Burn `to` and hand the turn over; the opponent loses if it is stuck.
    fn shoot(&mut self, to: Square) -> bool {
        if self.pending_shot.is_none() || self.cells[to as usize] != EMPTY {
            return false;
        }
        self.cells[to as usize] = ARROW;
        self.pending_shot = None;

        let shooter = self.to_move;
        self.to_move = 3 - shooter;
        if !self.can_move(self.to_move) {
            self.winner = shooter;
        }
        true
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height).rev() {
            let line: String = (0..self.width)
                .map(|col| match self.cells[(row * self.width + col) as usize] {
                    1 => 'W',
                    2 => 'B',
                    ARROW => '#',
                    _ => '.',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Amazons game: board size and starting queens
#[derive(Debug, Clone)]
pub struct Amazons {
    width: u16,
    height: u16,
    /// Starting `(col, row)` of each player's queens
    queens: [Vec<(u16, u16)>; 2],
}

impl Amazons {
    /// Standard 10x10 board with four queens each.
    pub fn new() -> Self {
        Self {
            width: 10,
            height: 10,
            queens: [
                vec![(0, 3), (3, 0), (6, 0), (9, 3)],
                vec![(0, 6), (3, 9), (6, 9), (9, 6)],
            ],
        }
    }

    /// 6x6 board with two queens each; games are short enough for quick
    /// matches.
    pub fn small() -> Self {
        Self {
            width: 6,
            height: 6,
            queens: [vec![(0, 2), (5, 2)], vec![(0, 3), (5, 3)]],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}

impl Default for Amazons {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Amazons {
    type Context = State;
    type Action = Action;

    fn metadata(&self) -> GameMetadata {
        let env_id = if self.width == 10 && self.height == 10 {
            "amazons"
        } else {
            "amazons-small"
        };
        GameMetadata::new(env_id, "Amazons")
            .with_board(self.width as usize, self.height as usize)
            .with_players(vec!["White".to_string(), "Black".to_string()])
            .with_description("Move a queen, then shoot an arrow. The last player able to move wins.")
    }

    fn num_players(&self) -> usize {
        2
    }

    fn is_alternating_move_game(&self) -> bool {
        true
    }

    fn initial_context(&self) -> State {
        let mut cells = vec![EMPTY; self.width as usize * self.height as usize];
        for (player, queens) in self.queens.iter().enumerate() {
            for &(col, row) in queens {
                cells[(row * self.width + col) as usize] = player as u8 + 1;
            }
        }
        State {
            width: self.width,
            height: self.height,
            cells,
            to_move: 1,
            pending_shot: None,
            winner: 0,
        }
    }

    fn legal_moves(&self, ctx: &State) -> Vec<Move<Action>> {
        if ctx.is_done() {
            return Vec::new();
        }
        let mover = ctx.to_move as PlayerId;

        match ctx.pending_shot {
            Some(queen) => {
                let mut targets = Vec::new();
                ctx.reachable(queen, &mut targets);
                targets
                    .into_iter()
                    .map(|to| Move::new(mover, Action::Arrow { to }))
                    .collect()
            }
            None => {
                let mut pairs = Vec::new();
                ctx.queen_moves(&mut pairs);
                pairs
                    .into_iter()
                    .map(|(from, to)| Move::new(mover, Action::Queen { from, to }))
                    .collect()
            }
        }
    }

    fn apply(&self, ctx: &mut State, mv: &Move<Action>) {
        if ctx.is_done() || mv.mover() != ctx.to_move as PlayerId {
            return;
        }
        match mv.action() {
            Some(&Action::Queen { from, to }) => {
                ctx.move_queen(from, to);
            }
            Some(&Action::Arrow { to }) => {
                ctx.shoot(to);
            }
            None => {}
        }
    }

    fn is_over(&self, ctx: &State) -> bool {
        ctx.is_done()
    }

    fn status(&self, ctx: &State) -> Option<Outcome> {
        ctx.is_done().then(|| Outcome::win(ctx.winner as PlayerId))
    }

    fn mover(&self, ctx: &State) -> PlayerId {
        ctx.to_move as PlayerId
    }

    fn utilities(&self, ctx: &State) -> Utilities {
        Utilities::from_winner(2, ctx.winner as PlayerId)
    }

    /// Random playout reusing scratch buffers instead of building move lists.
    fn playout(&self, ctx: &mut State, rng: &mut ChaCha20Rng) {
        let mut pairs = Vec::new();
        let mut targets = Vec::new();

        while !ctx.is_done() {
            if let Some(queen) = ctx.pending_shot {
                targets.clear();
                ctx.reachable(queen, &mut targets);
                match targets.choose(rng) {
                    Some(&to) => {
                        ctx.shoot(to);
                    }
                    None => break,
                }
            } else {
                pairs.clear();
                ctx.queen_moves(&mut pairs);
                match pairs.choose(rng) {
                    Some(&(from, to)) => {
                        ctx.move_queen(from, to);
                    }
                    None => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
