use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    None,
    Node,
    Edge,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadSelectionChanged {
    pub kind: SelectionKind,
    pub id: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadSearchNotFound {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadViewportTransformChanged {
    pub zoom: f32,
    pub pan: [f32; 2],
}

/// Notifications emitted to the host UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    SelectionChanged(PayloadSelectionChanged),
    SearchNotFound(PayloadSearchNotFound),
    ViewportTransformChanged(PayloadViewportTransformChanged),
}
