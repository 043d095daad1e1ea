//! TicTacToe game implementation for the arena
//!
//! This crate provides a complete reference implementation of TicTacToe
//! demonstrating how to implement the Game trait for the search agents.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Game, Move};
//! use games_tictactoe::{Action, TicTacToe};
//!
//! let game = TicTacToe::new();
//! let mut ctx = game.initial_context();
//! game.apply(&mut ctx, &Move::new(1, Action::Place(4)));
//! assert_eq!(game.mover(&ctx), 2);
//! assert_eq!(game.legal_moves(&ctx).len(), 8);
//! ```

use std::fmt;

use engine_core::{Game, GameMetadata, Move, Outcome, PlayerId, Utilities};
use rand_chacha::ChaCha20Rng;

/// TicTacToe game state
///
/// Represents the complete state of a TicTacToe game including the board,
/// current player, and winner information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    /// Board representation: 0=empty, 1=X, 2=O
    board: [u8; 9],
    /// Current player: 1=X, 2=O
    current_player: u8,
    /// Winner: 0=none/ongoing, 1=X, 2=O, 3=draw
    winner: u8,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [0; 9],
            current_player: 1, // X goes first
            winner: 0,
        }
    }

    pub fn board(&self) -> &[u8; 9] {
        &self.board
    }

    /// Player to move (1=X, 2=O); after a win, the winner
    pub fn current_player(&self) -> u8 {
        self.current_player
    }

    /// 0=ongoing, 1=X, 2=O, 3=draw
    pub fn winner(&self) -> u8 {
        self.winner
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner != 0
    }

    /// Get legal moves (empty positions)
    pub fn legal_moves(&self) -> Vec<u8> {
        if self.is_done() {
            return Vec::new();
        }

        (0..9u8)
            .filter(|&pos| self.board[pos as usize] == 0)
            .collect()
    }

    /// Make a move and return the new state
    pub fn make_move(&self, position: u8) -> State {
        if self.is_done() || position >= 9 || self.board[position as usize] != 0 {
            return *self; // Invalid move, return unchanged state
        }

        let mut new_state = *self;
        new_state.board[position as usize] = self.current_player;
        new_state.winner = Self::check_winner(&new_state.board);

        // Switch player if game not over
        if new_state.winner == 0 {
            new_state.current_player = if self.current_player == 1 { 2 } else { 1 };
        }

        new_state
    }

    /// Check for winner on the board
    fn check_winner(board: &[u8; 9]) -> u8 {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8], // rows
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8], // columns
            [0, 4, 8],
            [2, 4, 6], // diagonals
        ];

        for line in &LINES {
            let [a, b, c] = *line;
            if board[a] != 0 && board[a] == board[b] && board[b] == board[c] {
                return board[a];
            }
        }

        // Board full but no winner
        if board.iter().all(|&cell| cell != 0) {
            return 3;
        }

        0
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.board.chunks(3) {
            let cells: Vec<&str> = row
                .iter()
                .map(|&cell| match cell {
                    1 => "X",
                    2 => "O",
                    _ => ".",
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// TicTacToe action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Place a piece at the given position (0-8)
    Place(u8),
}

impl Action {
    /// Get the position for this action
    pub fn position(&self) -> u8 {
        match self {
            Action::Place(pos) => *pos,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position())
    }
}

/// TicTacToe game implementation
#[derive(Debug, Clone, Copy)]
pub struct TicTacToe;

impl TicTacToe {
    /// Create a new TicTacToe game
    pub fn new() -> Self {
        Self
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TicTacToe {
    type Context = State;
    type Action = Action;

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("tictactoe", "Tic-Tac-Toe")
            .with_board(3, 3)
            .with_players(vec!["X".to_string(), "O".to_string()])
            .with_description("Get three in a row to win!")
    }

    fn num_players(&self) -> usize {
        2
    }

    fn is_alternating_move_game(&self) -> bool {
        true
    }

    fn initial_context(&self) -> State {
        State::new()
    }

    fn legal_moves(&self, ctx: &State) -> Vec<Move<Action>> {
        let mover = ctx.current_player as PlayerId;
        ctx.legal_moves()
            .into_iter()
            .map(|pos| Move::new(mover, Action::Place(pos)))
            .collect()
    }

    fn apply(&self, ctx: &mut State, mv: &Move<Action>) {
        if let Some(action) = mv.action() {
            *ctx = ctx.make_move(action.position());
        }
    }

    fn is_over(&self, ctx: &State) -> bool {
        ctx.is_done()
    }

    fn status(&self, ctx: &State) -> Option<Outcome> {
        match ctx.winner {
            0 => None,
            3 => Some(Outcome::draw()),
            w => Some(Outcome::win(w as PlayerId)),
        }
    }

    fn mover(&self, ctx: &State) -> PlayerId {
        ctx.current_player as PlayerId
    }

    fn utilities(&self, ctx: &State) -> Utilities {
        let winner = match ctx.winner {
            w @ (1 | 2) => w as PlayerId,
            _ => 0,
        };
        Utilities::from_winner(2, winner)
    }

    /// Random playout on the raw state, without building move lists.
    fn playout(&self, ctx: &mut State, rng: &mut ChaCha20Rng) {
        use rand::seq::SliceRandom;

        while !ctx.is_done() {
            match ctx.legal_moves().choose(rng) {
                Some(&pos) => *ctx = ctx.make_move(pos),
                None => break,
            }
        }
    }
}
