//! Decoupled UCT nodes and their arena.

use std::collections::HashMap;
use std::hash::Hash;

use engine_core::{moves_for_mover, Move, PlayerId, Utilities};
use rand_chacha::ChaCha20Rng;

use crate::config::UctConfig;
use crate::node::NodeId;
use crate::ties::ReservoirArgmax;
use crate::tree::MoveStats;

/// A node in the decoupled UCT tree.
///
/// Per-player tables are 1-indexed to match player ids; index 0 is unused.
/// Inner tables are sized once at construction and never resized.
#[derive(Debug, Clone)]
pub struct DuctNode<C, A> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Game state at this node
    pub context: C,

    pub is_terminal: bool,

    /// `legal_moves[p]`: moves of player `p` in host order
    pub legal_moves: Vec<Vec<Move<A>>>,

    /// `visits[p][i]`: times player `p` picked `legal_moves[p][i]` here
    pub visits: Vec<Vec<u32>>,

    /// `score_sums[p][i]`: utilities of player `p` after picking `i`
    pub score_sums: Vec<Vec<f64>>,

    /// Index each player picked during the current iteration (scratch)
    pub last_selected: Vec<usize>,

    /// Backups through this node, including the one that created it
    pub total_visits: u32,

    /// Children keyed by the tuple of picked moves, one per player with moves
    pub children: HashMap<Vec<Move<A>>, NodeId>,
}

impl<C, A: Clone + Eq + Hash> DuctNode<C, A> {
    /// Split the host's flat `legal` list per player and size the tables.
    pub fn new(
        parent: NodeId,
        context: C,
        num_players: usize,
        legal: &[Move<A>],
        is_terminal: bool,
    ) -> Self {
        let legal_moves: Vec<Vec<Move<A>>> = (0..=num_players)
            .map(|p| {
                if p == 0 || is_terminal {
                    Vec::new()
                } else {
                    moves_for_mover(legal, p)
                }
            })
            .collect();
        let visits = legal_moves.iter().map(|m| vec![0; m.len()]).collect();
        let score_sums = legal_moves.iter().map(|m| vec![0.0; m.len()]).collect();

        Self {
            parent,
            context,
            is_terminal,
            legal_moves,
            visits,
            score_sums,
            last_selected: vec![0; num_players + 1],
            total_visits: 0,
            children: HashMap::new(),
        }
    }

    #[inline]
    pub fn num_players(&self) -> usize {
        self.legal_moves.len().saturating_sub(1)
    }

    #[inline]
    pub fn has_moves(&self, player: PlayerId) -> bool {
        self.legal_moves
            .get(player)
            .is_some_and(|moves| !moves.is_empty())
    }

    /// Whether any player can move here.
    pub fn any_moves(&self) -> bool {
        (1..=self.num_players()).any(|p| self.has_moves(p))
    }

    /// Mean utility of player `p` after picking `i`, None if never picked.
    pub fn mean(&self, player: PlayerId, index: usize) -> Option<f64> {
        let visits = self.visits[player][index];
        (visits > 0).then(|| self.score_sums[player][index] / f64::from(visits))
    }

    /// UCB1 pick for `player`; unvisited moves count as an exploit of 1.0.
    ///
    /// None if the player has no move here.
    pub fn select_index(
        &self,
        player: PlayerId,
        config: &UctConfig,
        rng: &mut ChaCha20Rng,
    ) -> Option<usize> {
        let mut best = ReservoirArgmax::new();
        for (i, &visits) in self.visits[player].iter().enumerate() {
            let exploit = self.mean(player, i).unwrap_or(1.0);
            let explore = config.exploration_bonus(self.total_visits, visits);
            best.offer(i, exploit + explore, rng);
        }
        best.into_best()
    }
}

/// Decoupled UCT tree with arena-based node storage.
#[derive(Debug)]
pub struct DuctTree<C, A> {
    nodes: Vec<DuctNode<C, A>>,
    root: NodeId,
}

impl<C, A: Clone + Eq + Hash> DuctTree<C, A> {
    pub fn new(root: DuctNode<C, A>) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &DuctNode<C, A> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut DuctNode<C, A> {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Link `child` under its parent for the move tuple `key`.
    pub fn add_child(&mut self, key: Vec<Move<A>>, child: DuctNode<C, A>) -> NodeId {
        let parent_id = child.parent;
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(parent_id).children.insert(key, child_id);
        child_id
    }

    /// Backpropagate terminal utilities from `leaf` to the root.
    ///
    /// Nodes that already had visits credit each moving player's last pick
    /// with that player's utility; a node seen for the first time (the one
    /// just expanded) only counts the visit.
    pub fn backpropagate(&mut self, leaf_id: NodeId, utilities: &Utilities) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            if node.total_visits > 0 {
                for player in 1..=node.num_players() {
                    if node.legal_moves[player].is_empty() {
                        continue;
                    }
                    let index = node.last_selected[player];
                    node.visits[player][index] += 1;
                    node.score_sums[player][index] += utilities.get(player);
                }
            }
            node.total_visits += 1;
            current_id = node.parent;
        }
    }

    /// `player`'s root move with the highest mean, ties broken uniformly.
    ///
    /// Unvisited moves count as `-1.0`, so with no statistics at all every
    /// move ties and the pick is uniformly random. None if `player` has no
    /// move at the root.
    pub fn best_move_for(&self, player: PlayerId, rng: &mut ChaCha20Rng) -> Option<Move<A>> {
        let root = self.get(self.root);
        if !root.has_moves(player) {
            return None;
        }
        let mut best = ReservoirArgmax::new();
        for i in 0..root.legal_moves[player].len() {
            best.offer(i, root.mean(player, i).unwrap_or(-1.0), rng);
        }
        best.into_best()
            .map(|i| root.legal_moves[player][i].clone())
    }

    /// Root statistics of every player's moves, in player then host order.
    pub fn root_stats(&self) -> Vec<MoveStats<A>> {
        let root = self.get(self.root);
        (1..=root.num_players())
            .flat_map(|player| {
                root.legal_moves[player]
                    .iter()
                    .enumerate()
                    .map(move |(i, mv)| MoveStats {
                        mv: mv.clone(),
                        visits: root.visits[player][i],
                        mean: root.mean(player, i).unwrap_or(0.0),
                    })
            })
            .collect()
    }
}
