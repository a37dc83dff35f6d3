use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::dataset::NodeRecord;

use super::Highlight;

/// Base circle radius for a node with no citations.
pub const BASE_RADIUS: f32 = 8.;
/// Extra radius per incident citation.
pub const DEGREE_RADIUS_SCALE: f32 = 2.;

/// A book in the graph together with its simulation and presentation state.
///
/// Positions and velocities are owned by the layout engine; the only other
/// writer is the drag interaction, which goes through [`Node::pin`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    record: NodeRecord,

    location: Pos2,
    velocity: Vec2,
    /// Set while the user drags the node; exempts it from integration.
    pinned: Option<Pos2>,
    /// True once the layout engine has assigned a starting position.
    placed: bool,

    degree: usize,
    highlight: Highlight,
}

impl Node {
    pub fn new(record: NodeRecord) -> Self {
        Self {
            record,
            location: Pos2::ZERO,
            velocity: Vec2::ZERO,
            pinned: None,
            placed: false,
            degree: 0,
            highlight: Highlight::Neutral,
        }
    }

    pub fn id(&self) -> usize {
        self.record.id
    }

    pub fn record(&self) -> &NodeRecord {
        &self.record
    }

    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn location(&self) -> Pos2 {
        self.location
    }

    pub fn set_location(&mut self, location: Pos2) {
        self.location = location;
        self.placed = true;
    }

    /// Whether a starting position has been assigned yet.
    pub fn placed(&self) -> bool {
        self.placed
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Fixes the node at `location` for the duration of a drag gesture.
    pub fn pin(&mut self, location: Pos2) {
        self.pinned = Some(location);
        self.location = location;
        self.velocity = Vec2::ZERO;
        self.placed = true;
    }

    pub fn unpin(&mut self) {
        self.pinned = None;
    }

    pub fn pinned(&self) -> Option<Pos2> {
        self.pinned
    }

    /// Count of incident citations; maintained by the owning graph.
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub(crate) fn set_degree(&mut self, degree: usize) {
        self.degree = degree;
    }

    /// Visual radius, scaled by how cited the book is.
    pub fn radius(&self) -> f32 {
        BASE_RADIUS + DEGREE_RADIUS_SCALE * self.degree as f32
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub(crate) fn set_highlight(&mut self, highlight: Highlight) {
        self.highlight = highlight;
    }
}
