//! Sequential UCT tree with arena allocation.
//!
//! Nodes live in a contiguous Vec and refer to each other by NodeId, so the
//! parent link used during backup never owns anything and the whole tree is
//! released at once when the search is dropped.

use engine_core::{Move, Utilities};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::config::UctConfig;
use crate::node::{NodeId, UctNode};
use crate::ties::ReservoirArgmax;

/// Visit statistics of one root move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveStats<A> {
    /// The move; its mover is the player the statistics belong to
    pub mv: Move<A>,
    pub visits: u32,
    /// Mean utility for the mover, 0 when unvisited
    pub mean: f64,
}

/// Sequential UCT tree with arena-based node storage.
#[derive(Debug)]
pub struct UctTree<C, A> {
    /// Arena storing all nodes
    nodes: Vec<UctNode<C, A>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<C, A: Clone> UctTree<C, A> {
    /// Create a new tree around a root node.
    pub fn new(root: UctNode<C, A>) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &UctNode<C, A> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut UctNode<C, A> {
        &mut self.nodes[id.0 as usize]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Link a freshly built child under its parent and return its ID.
    pub fn add_child(&mut self, child: UctNode<C, A>) -> NodeId {
        let parent_id = child.parent;
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(parent_id).children.push(child_id);
        child_id
    }

    /// Child maximizing UCB1, ties broken uniformly at random.
    pub fn select_child(
        &self,
        node_id: NodeId,
        config: &UctConfig,
        rng: &mut ChaCha20Rng,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        let mut best = ReservoirArgmax::new();
        for &child_id in &node.children {
            let value = self.get(child_id).ucb1(node.visit_count, config);
            best.offer(child_id, value, rng);
        }
        best.into_best()
    }

    /// Backpropagate terminal utilities from `leaf` to the root.
    ///
    /// Every node with a parent gains a visit and the utility of the player
    /// who moves at that parent. The root only counts the visit.
    pub fn backpropagate(&mut self, leaf_id: NodeId, utilities: &Utilities) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let parent_id = self.get(current_id).parent;
            let score = if parent_id.is_some() {
                Some(utilities.get(self.get(parent_id).mover))
            } else {
                None
            };

            let node = self.get_mut(current_id);
            node.visit_count += 1;
            if let Some(score) = score {
                node.score_sum += score;
            }

            current_id = parent_id;
        }
    }

    /// Root child with the highest mean score, ties broken uniformly at random.
    ///
    /// Unvisited children count as `-inf`. Returns None if the root has no
    /// children.
    pub fn best_move_by_mean(&self, rng: &mut ChaCha20Rng) -> Option<Move<A>> {
        let mut best = ReservoirArgmax::new();
        for &child_id in &self.get(self.root).children {
            best.offer(child_id, self.get(child_id).mean_score(), rng);
        }
        best.into_best()
            .and_then(|id| self.get(id).move_from_parent.clone())
    }

    /// Per-move statistics of the root's children, in expansion order.
    pub fn root_stats(&self) -> Vec<MoveStats<A>> {
        self.get(self.root)
            .children
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.move_from_parent.clone().map(|mv| MoveStats {
                    mv,
                    visits: child.visit_count,
                    mean: if child.visit_count == 0 {
                        0.0
                    } else {
                        child.mean_score()
                    },
                })
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: self.get(self.root).visit_count,
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        // Children are always allocated after their parent, so one forward
        // pass over the arena sees every parent's depth first.
        let mut depth = vec![0u32; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            if node.parent.is_some() {
                depth[i] = depth[node.parent.0 as usize] + 1;
            }
        }
        depth.into_iter().max().unwrap_or(0)
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    type Tree = UctTree<u8, u8>;

    fn child(parent: NodeId, action: u8, mover: usize) -> UctNode<u8, u8> {
        UctNode::new_child(parent, Move::new(3 - mover, action), action, mover, vec![], false)
    }

    fn two_ply_tree() -> (Tree, NodeId, NodeId, NodeId) {
        let root = UctNode::new_root(0u8, 1, vec![Move::new(1, 0), Move::new(1, 1)], false);
        let mut tree = UctTree::new(root);
        let a = tree.add_child(child(tree.root(), 0, 2));
        let b = tree.add_child(child(tree.root(), 1, 2));
        let grandchild = tree.add_child(child(a, 5, 1));
        (tree, a, b, grandchild)
    }

    #[test]
    fn test_new_tree() {
        let root = UctNode::new_root(7u8, 1, vec![Move::new(1, 0u8)], false);
        let tree = UctTree::new(root);

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).is_root());
        assert_eq!(tree.get(tree.root()).context, 7);
    }

    #[test]
    fn test_add_child() {
        let (tree, a, b, grandchild) = two_ply_tree();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.get(tree.root()).children, vec![a, b]);
        assert_eq!(tree.get(a).children, vec![grandchild]);
        assert_eq!(tree.get(grandchild).parent, a);
    }

    #[test]
    fn test_backpropagate_scores_parent_mover() {
        let (mut tree, a, _b, grandchild) = two_ply_tree();

        // Player 1 wins
        tree.backpropagate(grandchild, &Utilities::from_winner(2, 1));

        // grandchild was chosen by player 2 (mover at `a`), root child by player 1
        assert_eq!(tree.get(grandchild).visit_count, 1);
        assert!((tree.get(grandchild).score_sum - (-1.0)).abs() < 1e-12);
        assert_eq!(tree.get(a).visit_count, 1);
        assert!((tree.get(a).score_sum - 1.0).abs() < 1e-12);

        // Root counts the visit only
        assert_eq!(tree.get(tree.root()).visit_count, 1);
        assert_eq!(tree.get(tree.root()).score_sum, 0.0);
    }

    #[test]
    fn test_visit_conservation() {
        let (mut tree, a, b, grandchild) = two_ply_tree();
        let draw = Utilities::zeros(2);
        tree.backpropagate(a, &draw);
        tree.backpropagate(b, &draw);
        tree.backpropagate(grandchild, &draw);

        let root = tree.get(tree.root());
        let children_visits: u32 = root.children.iter().map(|&c| tree.get(c).visit_count).sum();
        assert_eq!(root.visit_count, children_visits);
        assert_eq!(tree.get(a).visit_count, 1 + tree.get(grandchild).visit_count);
    }

    #[test]
    fn test_select_child_prefers_higher_ucb() {
        let (mut tree, a, b, _) = two_ply_tree();
        tree.get_mut(tree.root()).visit_count = 20;
        tree.get_mut(a).visit_count = 10;
        tree.get_mut(a).score_sum = -5.0;
        tree.get_mut(b).visit_count = 10;
        tree.get_mut(b).score_sum = 5.0;

        let mut rng = ChaCha20Rng::seed_from_u64(42);
        assert_eq!(tree.select_child(tree.root(), &UctConfig::default(), &mut rng), Some(b));
    }

    #[test]
    fn test_select_child_breaks_ties_uniformly() {
        let (mut tree, a, b, _) = two_ply_tree();
        tree.get_mut(tree.root()).visit_count = 2;
        for id in [a, b] {
            tree.get_mut(id).visit_count = 1;
        }

        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let config = UctConfig::default();
        let picks_a = (0..2000)
            .filter(|_| tree.select_child(tree.root(), &config, &mut rng) == Some(a))
            .count();
        assert!((850..1150).contains(&picks_a), "picked a {} times", picks_a);
    }

    #[test]
    fn test_best_move_by_mean() {
        let (mut tree, a, b, _) = two_ply_tree();
        tree.get_mut(a).visit_count = 50;
        tree.get_mut(a).score_sum = 10.0;
        tree.get_mut(b).visit_count = 2;
        tree.get_mut(b).score_sum = 1.0;

        let mut rng = ChaCha20Rng::seed_from_u64(42);
        // Robust by mean: b's 0.5 beats a's 0.2 despite fewer visits
        assert_eq!(tree.best_move_by_mean(&mut rng), Some(Move::new(1, 1)));
    }

    #[test]
    fn test_best_move_ignores_unvisited() {
        let (mut tree, a, _b, _) = two_ply_tree();
        tree.get_mut(a).visit_count = 3;
        tree.get_mut(a).score_sum = -3.0;

        let mut rng = ChaCha20Rng::seed_from_u64(42);
        assert_eq!(tree.best_move_by_mean(&mut rng), Some(Move::new(1, 0)));
    }

    #[test]
    fn test_best_move_without_children() {
        let root = UctNode::new_root(0u8, 1, vec![Move::new(1, 0u8)], false);
        let tree = UctTree::new(root);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        assert_eq!(tree.best_move_by_mean(&mut rng), None);
    }

    #[test]
    fn test_root_stats() {
        let (mut tree, a, _b, _) = two_ply_tree();
        tree.get_mut(a).visit_count = 4;
        tree.get_mut(a).score_sum = 2.0;

        let stats = tree.root_stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].mv, Move::new(1, 0));
        assert_eq!(stats[0].visits, 4);
        assert!((stats[0].mean - 0.5).abs() < 1e-12);
        assert_eq!(stats[1].visits, 0);
        assert_eq!(stats[1].mean, 0.0);
    }

    #[test]
    fn test_tree_stats() {
        let (tree, ..) = two_ply_tree();
        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.max_depth, 2);
    }
}
