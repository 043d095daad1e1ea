//! Game metadata for display and match reports
//!
//! Describes a game to hosts and drivers: identifiers, board dimensions,
//! player names and the turn structure.

use serde::{Deserialize, Serialize};

/// Turn structure of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStructure {
    /// One player decides per ply
    Alternating,
    /// Every active player commits a move each ply
    Simultaneous,
}

/// Metadata about a game for display and configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Game identifier used to load it by name (e.g., "amazons")
    pub env_id: String,

    /// Human-readable display name (e.g., "Amazons")
    pub display_name: String,

    /// Board width in cells (0 for boardless games)
    pub board_width: usize,

    /// Board height in cells (0 for boardless games)
    pub board_height: usize,

    /// Number of players
    pub player_count: usize,

    /// Display names for each player, in player-id order
    pub player_names: Vec<String>,

    pub turns: TurnStructure,

    /// Brief description of the rules
    pub description: String,
}

impl GameMetadata {
    /// Create a new GameMetadata with required fields
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            player_count: 2,
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            turns: TurnStructure::Alternating,
            description: String::new(),
        }
    }

    /// Builder method for board dimensions
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Builder method for player information
    pub fn with_players(mut self, names: Vec<String>) -> Self {
        self.player_count = names.len();
        self.player_names = names;
        self
    }

    /// Builder method for the turn structure
    pub fn with_turns(mut self, turns: TurnStructure) -> Self {
        self.turns = turns;
        self
    }

    /// Builder method for description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Get the total number of board cells
    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }

    /// Display name of `player` (1-indexed), falling back to "Player N"
    pub fn player_name(&self, player: usize) -> String {
        player
            .checked_sub(1)
            .and_then(|i| self.player_names.get(i))
            .cloned()
            .unwrap_or_else(|| format!("Player {}", player))
    }
}
