use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::elements::Highlight;
use crate::graph::Graph;

/// Current selection. Variants are mutually exclusive; selecting an edge
/// clears any node selection and vice versa.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Node(usize),
    Edge(usize),
}

/// Tracks the selection and derives per-element highlight tiers from it.
///
/// Every transition recomputes the tiers on the given graph: the selected
/// element (or a selected edge's endpoints) is `Active`, one hop from a
/// selected node is `Neighbor`, everything else is `Dimmed`; with no
/// selection all elements sit at the uniform `Neutral` tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionState {
    current: Selection,
}

impl SelectionState {
    pub fn current(&self) -> Selection {
        self.current
    }

    /// Selects a node if it exists in the graph. Returns whether the
    /// transition happened.
    pub fn select_node(&mut self, g: &mut Graph, id: usize) -> bool {
        if !g.contains_node(id) {
            return false;
        }
        self.current = Selection::Node(id);
        self.apply_highlights(g);
        true
    }

    /// Selects an edge if it exists in the graph. Returns whether the
    /// transition happened.
    pub fn select_edge(&mut self, g: &mut Graph, id: usize) -> bool {
        if !g.contains_edge(id) {
            return false;
        }
        self.current = Selection::Edge(id);
        self.apply_highlights(g);
        true
    }

    /// Background click, reset or search clear: back to no selection.
    pub fn clear(&mut self, g: &mut Graph) {
        self.current = Selection::None;
        self.apply_highlights(g);
    }

    /// Drops a selection whose element vanished after a filter or reset,
    /// so it never dangles. Returns true when the selection was dropped.
    pub fn prune(&mut self, g: &mut Graph) -> bool {
        let stale = match self.current {
            Selection::None => false,
            Selection::Node(id) => !g.contains_node(id),
            Selection::Edge(id) => !g.contains_edge(id),
        };
        if stale {
            self.clear(g);
        } else {
            self.apply_highlights(g);
        }
        stale
    }

    fn apply_highlights(&self, g: &mut Graph) {
        match self.current {
            Selection::None => {
                for n in g.nodes_iter_mut() {
                    n.set_highlight(Highlight::Neutral);
                }
                for e in g.edges_iter_mut() {
                    e.set_highlight(Highlight::Neutral);
                }
            }
            Selection::Node(id) => {
                let neighbors: HashSet<usize> = g.neighbors(id).collect();
                for n in g.nodes_iter_mut() {
                    n.set_highlight(if n.id() == id {
                        Highlight::Active
                    } else if neighbors.contains(&n.id()) {
                        Highlight::Neighbor
                    } else {
                        Highlight::Dimmed
                    });
                }
                for e in g.edges_iter_mut() {
                    e.set_highlight(if e.source_id() == id || e.target_id() == id {
                        Highlight::Neighbor
                    } else {
                        Highlight::Dimmed
                    });
                }
            }
            Selection::Edge(id) => {
                let endpoints = g.endpoints(id);
                for n in g.nodes_iter_mut() {
                    let active = endpoints
                        .is_some_and(|(a, b)| n.id() == a || n.id() == b);
                    n.set_highlight(if active {
                        Highlight::Active
                    } else {
                        Highlight::Dimmed
                    });
                }
                for e in g.edges_iter_mut() {
                    e.set_highlight(if e.id() == id {
                        Highlight::Active
                    } else {
                        Highlight::Dimmed
                    });
                }
            }
        }
    }
}
