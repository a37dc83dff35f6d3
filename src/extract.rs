use std::collections::{HashMap, HashSet, VecDeque};

use crate::dataset::Depth;
use crate::graph::Graph;

/// The induced subgraph produced by [`extract`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subgraph {
    pub node_ids: HashSet<usize>,
    pub edge_ids: HashSet<usize>,
}

/// Bounded-depth traversal from `root_id`, treating edges as undirected.
///
/// Level-synchronous BFS: the root is visited at depth 0 and a node visited
/// at the depth bound is never expanded further. Edge inclusion is decided
/// as a final filter over the whole edge list — an edge belongs to the
/// result iff both endpoints were visited — so boundary edges between two
/// depth-limit nodes are included independent of discovery order.
///
/// Returns `None` when `root_id` is not present in the graph. O(V+E).
pub fn extract(graph: &Graph, root_id: usize, depth: Depth) -> Option<Subgraph> {
    if !graph.contains_node(root_id) {
        return None;
    }

    let mut visited: HashMap<usize, u32> = HashMap::new();
    let mut frontier: VecDeque<(usize, u32)> = VecDeque::new();
    visited.insert(root_id, 0);
    frontier.push_back((root_id, 0));

    while let Some((id, d)) = frontier.pop_front() {
        if !depth.allows(d) {
            continue;
        }
        for neighbor in graph.neighbors(id) {
            if !visited.contains_key(&neighbor) {
                visited.insert(neighbor, d + 1);
                frontier.push_back((neighbor, d + 1));
            }
        }
    }

    let node_ids: HashSet<usize> = visited.into_keys().collect();
    let edge_ids = graph
        .edges_iter()
        .filter(|e| node_ids.contains(&e.source_id()) && node_ids.contains(&e.target_id()))
        .map(crate::elements::Edge::id)
        .collect();

    Some(Subgraph { node_ids, edge_ids })
}
