//! Core of an interactive book-citation graph viewer.
//!
//! The crate is headless: it owns graph state, a force-directed layout
//! simulation, bounded-depth subgraph extraction ("N degrees of
//! connection"), selection highlighting and camera transforms, and leaves
//! rendering, data retrieval and widgets to the host application. See
//! [`Asterism`] for the host-facing surface.

mod controller;
mod dataset;
mod elements;
mod extract;
mod graph;
mod layout;
mod selection;
mod viewport;

pub mod events;

pub use controller::Asterism;
pub use dataset::{Depth, EdgeRecord, GraphData, NodeRecord, Sentiment};
pub use elements::{Edge, Highlight, Node};
pub use extract::{extract, Subgraph};
pub use graph::Graph;
pub use layout::{ForceLayout, ForceLayoutState, REHEAT_ALPHA, WARMUP_TICKS};
pub use selection::{Selection, SelectionState};
pub use viewport::{
    fit_to_bounds, focus_on, Camera, Transform, FOCUS_ZOOM, MAX_FIT_ZOOM, TWEEN_DURATION,
};
