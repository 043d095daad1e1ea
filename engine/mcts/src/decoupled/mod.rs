//! Decoupled UCT for simultaneous-move games.
//!
//! Every node keeps independent statistics per player. At each step every
//! player picks its own move by UCB1 over its own statistics, and the tuple of
//! picks keys the child to descend into. A missing tuple is the expansion
//! step: its combined move is applied and the new child becomes the playout
//! start.

mod node;
mod search;

pub use node::{DuctNode, DuctTree};
pub use search::{Duct, DuctSearch};
