//! Sequential UCT tree node representation.
//!
//! Each node owns a snapshot of the game reached by applying the move from its
//! parent. Statistics are stored from the point of view of the player who
//! moves at the parent, so a parent always maximizes its own return when it
//! selects among its children.

use std::collections::VecDeque;

use engine_core::{Move, PlayerId};

use crate::config::UctConfig;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the sequential UCT tree.
#[derive(Debug, Clone)]
pub struct UctNode<C, A> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Move that led here from the parent (None for root)
    pub move_from_parent: Option<Move<A>>,

    /// Game state at this node
    pub context: C,

    /// Player to move at this node
    pub mover: PlayerId,

    /// Whether this is a terminal state (game over)
    pub is_terminal: bool,

    /// Legal moves not yet expanded, in host order; expansion pops the head
    pub unexpanded: VecDeque<Move<A>>,

    /// Children in expansion order
    pub children: Vec<NodeId>,

    /// Number of backups through this node
    pub visit_count: u32,

    /// Sum of utilities for the parent's mover; stays 0 at the root
    pub score_sum: f64,
}

impl<C, A> UctNode<C, A> {
    /// Create a new root node.
    pub fn new_root(context: C, mover: PlayerId, legal_moves: Vec<Move<A>>, is_terminal: bool) -> Self {
        Self::new(NodeId::NONE, None, context, mover, legal_moves, is_terminal)
    }

    /// Create a new child node.
    pub fn new_child(
        parent: NodeId,
        mv: Move<A>,
        context: C,
        mover: PlayerId,
        legal_moves: Vec<Move<A>>,
        is_terminal: bool,
    ) -> Self {
        Self::new(parent, Some(mv), context, mover, legal_moves, is_terminal)
    }

    fn new(
        parent: NodeId,
        move_from_parent: Option<Move<A>>,
        context: C,
        mover: PlayerId,
        legal_moves: Vec<Move<A>>,
        is_terminal: bool,
    ) -> Self {
        Self {
            parent,
            move_from_parent,
            context,
            mover,
            is_terminal,
            // Terminal nodes never expand, whatever the host reports.
            unexpanded: if is_terminal {
                VecDeque::new()
            } else {
                legal_moves.into()
            },
            children: Vec::new(),
            visit_count: 0,
            score_sum: 0.0,
        }
    }

    /// Mean score from the parent mover's perspective, `-inf` if never visited.
    #[inline]
    pub fn mean_score(&self) -> f64 {
        if self.visit_count == 0 {
            f64::NEG_INFINITY
        } else {
            self.score_sum / f64::from(self.visit_count)
        }
    }

    /// UCB1 value of this node as seen from a parent with `parent_visits`.
    #[inline]
    pub fn ucb1(&self, parent_visits: u32, config: &UctConfig) -> f64 {
        let exploit = if self.visit_count == 0 {
            0.0
        } else {
            self.mean_score()
        };
        exploit + config.exploration_bonus(parent_visits, self.visit_count)
    }

    /// Whether selection should stop here and expand.
    #[inline]
    pub fn has_unexpanded(&self) -> bool {
        !self.unexpanded.is_empty()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_with(moves: Vec<Move<u8>>) -> UctNode<(), u8> {
        UctNode::new_root((), 1, moves, false)
    }

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = root_with(vec![Move::new(1, 0), Move::new(1, 1)]);

        assert!(node.is_root());
        assert!(node.move_from_parent.is_none());
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.unexpanded.len(), 2);
        assert!(node.has_unexpanded());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_terminal_node_has_nothing_to_expand() {
        let node: UctNode<(), u8> = UctNode::new_root((), 1, vec![Move::new(1, 0)], true);
        assert!(!node.has_unexpanded());
    }

    #[test]
    fn test_mean_score() {
        let mut node = UctNode::new_child(NodeId(0), Move::new(1, 0u8), (), 2, vec![], false);

        // Unvisited
        assert_eq!(node.mean_score(), f64::NEG_INFINITY);

        // After visits
        node.visit_count = 4;
        node.score_sum = 2.0;
        assert!((node.mean_score() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ucb1() {
        let mut node = UctNode::new_child(NodeId(0), Move::new(1, 0u8), (), 2, vec![], false);
        node.visit_count = 10;
        node.score_sum = 5.0;

        // UCB1 = 0.5 + sqrt(2 ln 100 / 10) = 0.5 + 0.9597 = 1.4597
        let ucb = node.ucb1(100, &UctConfig::default());
        assert!((ucb - 1.4597).abs() < 1e-3);

        let greedy = node.ucb1(100, &UctConfig::default().with_exploration(0.0));
        assert!((greedy - 0.5).abs() < 1e-12);
    }
}
