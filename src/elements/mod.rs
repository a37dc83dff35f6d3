mod edge;
mod node;

pub use edge::Edge;
pub use node::Node;

use serde::{Deserialize, Serialize};

/// Presentation tier derived from the current selection. Purely visual;
/// never feeds back into layout or traversal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Highlight {
    /// No selection is active.
    #[default]
    Neutral,
    /// The selected element, or an endpoint of the selected edge.
    Active,
    /// One hop away from the selected node.
    Neighbor,
    /// Everything else while a selection is active.
    Dimmed,
}
