use std::collections::HashMap;

use egui::{Pos2, Rect};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use serde::{Deserialize, Serialize};

use crate::dataset::{EdgeRecord, GraphData, NodeRecord};
use crate::elements::{Edge, Node};
use crate::extract::Subgraph;

/// Wrapper around [`petgraph::stable_graph::StableUnGraph`] holding the
/// active node and edge set. Built wholesale from a dataset (full or
/// filtered) and replaced on every filter or reset; the only incremental
/// mutation allowed afterwards is position/velocity updates by the layout
/// engine and pin state from the drag interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    g: StableUnGraph<Node, Edge>,

    node_indices: HashMap<usize, NodeIndex>,
    edge_indices: HashMap<usize, EdgeIndex>,

    dropped_nodes: Vec<NodeRecord>,
    dropped_edges: Vec<EdgeRecord>,
}

impl Graph {
    /// Builds a graph from a provider payload.
    ///
    /// Defensive filtering: nodes with a duplicate id and edges referencing
    /// a missing node id are excluded rather than aborting the load. The
    /// rejects stay available through [`Graph::dropped_nodes`] and
    /// [`Graph::dropped_edges`] so the surrounding application can log them.
    pub fn from_dataset(data: &GraphData) -> Self {
        let mut g = StableUnGraph::with_capacity(data.nodes.len(), data.edges.len());
        let mut node_indices = HashMap::with_capacity(data.nodes.len());
        let mut edge_indices = HashMap::with_capacity(data.edges.len());
        let mut dropped_nodes = Vec::new();
        let mut dropped_edges = Vec::new();

        for record in &data.nodes {
            if node_indices.contains_key(&record.id) {
                dropped_nodes.push(record.clone());
                continue;
            }
            let idx = g.add_node(Node::new(record.clone()));
            node_indices.insert(record.id, idx);
        }

        for record in &data.edges {
            let (Some(&source), Some(&target)) = (
                node_indices.get(&record.source_id),
                node_indices.get(&record.target_id),
            ) else {
                dropped_edges.push(record.clone());
                continue;
            };

            let same_author = record.is_same_author
                || g[source].record().author == g[target].record().author;

            let idx = g.add_edge(source, target, Edge::new(record.clone()));
            g[idx].set_same_author(same_author);
            edge_indices.insert(record.id, idx);
        }

        let mut graph = Self {
            g,
            node_indices,
            edge_indices,
            dropped_nodes,
            dropped_edges,
        };
        graph.recompute_degrees();
        graph
    }

    /// Keeps only the elements named by `sub` and recomputes degrees.
    pub fn retain(&mut self, sub: &Subgraph) {
        let stale_edges: Vec<usize> = self
            .edge_indices
            .keys()
            .filter(|id| !sub.edge_ids.contains(id))
            .copied()
            .collect();
        for id in stale_edges {
            if let Some(idx) = self.edge_indices.remove(&id) {
                self.g.remove_edge(idx);
            }
        }

        let stale_nodes: Vec<usize> = self
            .node_indices
            .keys()
            .filter(|id| !sub.node_ids.contains(id))
            .copied()
            .collect();
        for id in stale_nodes {
            if let Some(idx) = self.node_indices.remove(&id) {
                self.g.remove_node(idx);
            }
        }

        self.recompute_degrees();
    }

    /// Copies starting positions from `other` for every node present in
    /// both graphs, so survivors of a filter keep their settled placement.
    pub fn carry_positions_from(&mut self, other: &Graph) {
        let ids: Vec<usize> = self.node_indices.keys().copied().collect();
        for id in ids {
            if let Some(prev) = other.node(id) {
                if prev.placed() {
                    let loc = prev.location();
                    if let Some(n) = self.node_mut(id) {
                        n.set_location(loc);
                    }
                }
            }
        }
    }

    /// Restores the invariant that every node's degree equals its live
    /// incident-edge count. Called whenever the edge set changes.
    pub fn recompute_degrees(&mut self) {
        let counts: Vec<(NodeIndex, usize)> = self
            .g
            .node_indices()
            .map(|idx| (idx, self.g.edges(idx).count()))
            .collect();
        for (idx, degree) in counts {
            self.g[idx].set_degree(degree);
        }
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.g.edge_count()
    }

    pub fn contains_node(&self, id: usize) -> bool {
        self.node_indices.contains_key(&id)
    }

    pub fn contains_edge(&self, id: usize) -> bool {
        self.edge_indices.contains_key(&id)
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.node_indices.get(&id).and_then(|idx| self.g.node_weight(*idx))
    }

    pub fn node_mut(&mut self, id: usize) -> Option<&mut Node> {
        self.node_indices
            .get(&id)
            .copied()
            .and_then(|idx| self.g.node_weight_mut(idx))
    }

    pub fn edge(&self, id: usize) -> Option<&Edge> {
        self.edge_indices.get(&id).and_then(|idx| self.g.edge_weight(*idx))
    }

    pub fn edge_mut(&mut self, id: usize) -> Option<&mut Edge> {
        self.edge_indices
            .get(&id)
            .copied()
            .and_then(|idx| self.g.edge_weight_mut(idx))
    }

    /// Both endpoint ids of an edge, in stored order.
    pub fn endpoints(&self, edge_id: usize) -> Option<(usize, usize)> {
        let e = self.edge(edge_id)?;
        Some((e.source_id(), e.target_id()))
    }

    /// Ids of all nodes adjacent to `id`, ignoring edge direction.
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.node_indices
            .get(&id)
            .into_iter()
            .flat_map(|idx| self.g.neighbors(*idx))
            .map(|n_idx| self.g[n_idx].id())
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = &Node> {
        self.g.node_weights()
    }

    pub fn nodes_iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.g.node_weights_mut()
    }

    pub fn edges_iter(&self) -> impl Iterator<Item = &Edge> {
        self.g.edge_weights()
    }

    pub fn edges_iter_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.g.edge_weights_mut()
    }

    /// First node whose title matches `query` case-insensitively (exact
    /// match, not substring). Unicode-aware, so accented titles match.
    pub fn node_by_title(&self, query: &str) -> Option<&Node> {
        let query = query.to_lowercase();
        self.nodes_iter()
            .find(|n| n.title().to_lowercase() == query)
    }

    /// Finds a node by canvas position. Can be optimized with a spatial
    /// index if needed.
    pub fn node_at(&self, pos: Pos2) -> Option<usize> {
        self.nodes_iter()
            .find(|n| (n.location() - pos).length() <= n.radius())
            .map(Node::id)
    }

    /// Finds an edge whose segment passes within `tolerance` of `pos`.
    pub fn edge_at(&self, pos: Pos2, tolerance: f32) -> Option<usize> {
        self.edges_iter()
            .find(|e| {
                let (Some(a), Some(b)) = (self.node(e.source_id()), self.node(e.target_id()))
                else {
                    return false;
                };
                distance_to_segment(pos, a.location(), b.location()) <= tolerance
            })
            .map(Edge::id)
    }

    /// Axis-aligned bounding box over node centers expanded by each node's
    /// radius. `None` when the graph is empty.
    pub fn bounds(&self) -> Option<Rect> {
        let mut min = Pos2::new(f32::MAX, f32::MAX);
        let mut max = Pos2::new(f32::MIN, f32::MIN);
        let mut any = false;

        for n in self.nodes_iter() {
            any = true;
            let loc = n.location();
            let r = n.radius();
            min.x = min.x.min(loc.x - r);
            min.y = min.y.min(loc.y - r);
            max.x = max.x.max(loc.x + r);
            max.y = max.y.max(loc.y + r);
        }

        any.then(|| Rect::from_min_max(min, max))
    }

    /// Releases any active drag pin. Invoked on every graph replacement so
    /// a pin can never outlive its graph.
    pub fn release_pins(&mut self) {
        for n in self.nodes_iter_mut() {
            n.unpin();
        }
    }

    /// Nodes excluded during build because their id was already taken.
    pub fn dropped_nodes(&self) -> &[NodeRecord] {
        &self.dropped_nodes
    }

    /// Edges excluded during build because an endpoint id was missing.
    pub fn dropped_edges(&self) -> &[EdgeRecord] {
        &self.dropped_edges
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0. {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0., 1.);
    (p - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sentiment;

    pub(crate) fn node_record(id: usize, title: &str, author: &str) -> NodeRecord {
        NodeRecord {
            id,
            title: title.to_string(),
            author: author.to_string(),
            genre: "fiction".to_string(),
            year: "1950".to_string(),
        }
    }

    pub(crate) fn edge_record(id: usize, source_id: usize, target_id: usize) -> EdgeRecord {
        EdgeRecord {
            id,
            source_id,
            target_id,
            quote: String::new(),
            sentiment: Sentiment::Neutral,
            is_same_author: false,
        }
    }

    fn dataset() -> GraphData {
        GraphData {
            nodes: vec![
                node_record(1, "Walden", "Thoreau"),
                node_record(2, "Nature", "Emerson"),
                node_record(3, "Self-Reliance", "Emerson"),
            ],
            edges: vec![
                edge_record(10, 1, 2),
                edge_record(11, 2, 3),
                edge_record(12, 1, 99), // dangling target
            ],
        }
    }

    #[test]
    fn dangling_edges_are_dropped_not_fatal() {
        let g = Graph::from_dataset(&dataset());
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.dropped_edges().len(), 1);
        assert_eq!(g.dropped_edges()[0].id, 12);
    }

    #[test]
    fn duplicate_node_ids_first_wins() {
        let mut data = dataset();
        data.nodes.push(node_record(1, "Impostor", "Nobody"));
        let g = Graph::from_dataset(&data);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.node(1).unwrap().title(), "Walden");
        assert_eq!(g.dropped_nodes().len(), 1);
    }

    #[test]
    fn degrees_match_incident_edges() {
        let g = Graph::from_dataset(&dataset());
        assert_eq!(g.node(1).unwrap().degree(), 1);
        assert_eq!(g.node(2).unwrap().degree(), 2);
        assert_eq!(g.node(3).unwrap().degree(), 1);
    }

    #[test]
    fn same_author_is_derived_when_missing() {
        let g = Graph::from_dataset(&dataset());
        assert!(!g.edge(10).unwrap().is_same_author());
        assert!(g.edge(11).unwrap().is_same_author()); // Emerson -> Emerson
    }

    #[test]
    fn title_lookup_is_case_insensitive_exact() {
        let g = Graph::from_dataset(&dataset());
        assert_eq!(g.node_by_title("wAlDeN").unwrap().id(), 1);
        assert!(g.node_by_title("Wald").is_none());
    }

    #[test]
    fn title_lookup_folds_case_beyond_ascii() {
        let mut data = dataset();
        data.nodes
            .push(node_record(5, "Éducation Sentimentale", "Flaubert"));
        let g = Graph::from_dataset(&data);
        assert_eq!(g.node_by_title("éducation sentimentale").unwrap().id(), 5);
        assert_eq!(g.node_by_title("ÉDUCATION SENTIMENTALE").unwrap().id(), 5);
    }

    #[test]
    fn bounds_expand_by_radius() {
        let mut g = Graph::from_dataset(&dataset());
        for n in g.nodes_iter_mut() {
            n.set_location(Pos2::ZERO);
        }
        let bounds = g.bounds().unwrap();
        let r_max = g.nodes_iter().map(Node::radius).fold(0., f32::max);
        assert_eq!(bounds.min, Pos2::new(-r_max, -r_max));
        assert_eq!(bounds.max, Pos2::new(r_max, r_max));
    }

    #[test]
    fn bounds_empty_graph_is_none() {
        let g = Graph::from_dataset(&GraphData::default());
        assert!(g.bounds().is_none());
    }

    #[test]
    fn carry_positions_copies_placed_survivors() {
        let mut prev = Graph::from_dataset(&dataset());
        prev.node_mut(1).unwrap().set_location(Pos2::new(12., 34.));
        prev.node_mut(2).unwrap().set_location(Pos2::new(-5., 7.));
        // Node 3 never got a position in the previous graph.

        let mut next = Graph::from_dataset(&dataset());
        next.carry_positions_from(&prev);

        assert_eq!(next.node(1).unwrap().location(), Pos2::new(12., 34.));
        assert!(next.node(1).unwrap().placed());
        assert_eq!(next.node(2).unwrap().location(), Pos2::new(-5., 7.));
        assert!(!next.node(3).unwrap().placed());
    }

    #[test]
    fn neighbors_ignore_direction() {
        let g = Graph::from_dataset(&dataset());
        let mut around_2: Vec<usize> = g.neighbors(2).collect();
        around_2.sort_unstable();
        assert_eq!(around_2, vec![1, 3]);
    }
}
