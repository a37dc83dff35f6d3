use egui::{Pos2, Rect};

use crate::dataset::{Depth, GraphData};
use crate::events::{
    Event, EventSink, PayloadSearchNotFound, PayloadSelectionChanged,
    PayloadViewportTransformChanged, SelectionKind,
};
use crate::extract::extract;
use crate::graph::Graph;
use crate::layout::{ForceLayout, ForceLayoutState};
use crate::selection::{Selection, SelectionState};
use crate::viewport::{fit_to_bounds, focus_on, Camera, Transform, FOCUS_ZOOM};

/// Padding around the graph when framing it after a load, filter or reset.
const FIT_PADDING: f32 = 60.;

/// Headless core of the citation-graph view. Owns the active graph, its
/// simulation, the selection machine and the camera; the host UI drives it
/// through the public operations and renders from the committed state after
/// each [`Asterism::tick`].
///
/// Replacing the graph (load, filter, reset) discards the previous
/// simulation state outright, releases any drag pin, re-seeds and settles
/// the layout synchronously, then reframes the camera — so fit and focus
/// targets always read fully committed positions.
pub struct Asterism {
    dataset: GraphData,
    /// Unfiltered graph; topology source for title lookup and extraction.
    full: Graph,
    /// The graph currently simulated and rendered.
    g: Graph,

    layout: ForceLayout,
    camera: Camera,
    selection: SelectionState,

    viewport: Rect,
    dragged: Option<usize>,
    sink: Option<Box<dyn EventSink>>,
}

impl Asterism {
    pub fn new(viewport: Rect) -> Self {
        Self {
            dataset: GraphData::default(),
            full: Graph::default(),
            g: Graph::default(),
            layout: ForceLayout::default(),
            camera: Camera::default(),
            selection: SelectionState::default(),
            viewport,
            dragged: None,
            sink: None,
        }
    }

    /// Supplies a sink that will receive [`Event`]s. Works with
    /// `crossbeam::channel::Sender<Event>`, closures, or custom impls.
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Replaces the dataset wholesale and frames the settled result.
    pub fn load_graph(&mut self, data: GraphData) {
        self.full = Graph::from_dataset(&data);
        self.dataset = data;
        let next = self.full.clone();
        self.replace_active(next, false);
    }

    /// Restricts the view to the books within `depth` connections of the
    /// one titled `title` (case-insensitive exact match). An unknown title
    /// emits [`Event::SearchNotFound`] and leaves all state unchanged.
    /// Returns whether the filter was applied.
    pub fn filter_by_root(&mut self, title: &str, depth: Depth) -> bool {
        let Some(root_id) = self.full.node_by_title(title).map(crate::elements::Node::id)
        else {
            self.publish(Event::SearchNotFound(PayloadSearchNotFound {
                query: title.to_string(),
            }));
            return false;
        };

        // Root presence was just checked, so extraction cannot miss.
        let Some(sub) = extract(&self.full, root_id, depth) else {
            return false;
        };

        let mut next = self.full.clone();
        next.retain(&sub);
        self.replace_active(next, true);
        true
    }

    /// Back to the unfiltered graph with no selection.
    pub fn reset_view(&mut self) {
        let next = self.full.clone();
        self.replace_active(next, true);
        self.clear_selection();
    }

    /// Selects a node, recomputes highlight tiers and focuses the camera
    /// on it. Unknown ids are ignored.
    pub fn select_node(&mut self, id: usize) {
        if !self.selection.select_node(&mut self.g, id) {
            return;
        }
        self.publish_selection();

        if let Some(n) = self.g.node(id) {
            let target = focus_on(n.location(), self.viewport, FOCUS_ZOOM);
            self.animate_camera(target);
        }
    }

    /// Selects an edge and focuses the camera on the midpoint between its
    /// endpoints. Unknown ids are ignored.
    pub fn select_edge(&mut self, id: usize) {
        if !self.selection.select_edge(&mut self.g, id) {
            return;
        }
        self.publish_selection();

        if let Some((a, b)) = self.g.endpoints(id) {
            if let (Some(a), Some(b)) = (self.g.node(a), self.g.node(b)) {
                let midpoint = a.location() + (b.location() - a.location()) / 2.;
                let target = focus_on(midpoint, self.viewport, FOCUS_ZOOM);
                self.animate_camera(target);
            }
        }
    }

    /// Background click, reset or search clear.
    pub fn clear_selection(&mut self) {
        if self.selection.current() == Selection::None {
            return;
        }
        self.selection.clear(&mut self.g);
        self.publish_selection();
    }

    /// Moves the camera to a node without changing the selection.
    pub fn focus(&mut self, node_id: usize) {
        if let Some(n) = self.g.node(node_id) {
            let target = focus_on(n.location(), self.viewport, FOCUS_ZOOM);
            self.animate_camera(target);
        }
    }

    /// Pins a node for a drag gesture and re-energizes the simulation.
    /// Returns whether the node exists.
    pub fn begin_drag(&mut self, id: usize) -> bool {
        let Some(n) = self.g.node_mut(id) else {
            return false;
        };
        let loc = n.location();
        n.pin(loc);
        self.dragged = Some(id);
        self.layout.reheat();
        true
    }

    /// Moves the active drag pin. No-op without an active drag.
    pub fn drag_to(&mut self, pos: Pos2) {
        if let Some(id) = self.dragged {
            if let Some(n) = self.g.node_mut(id) {
                n.pin(pos);
            }
        }
    }

    /// Releases the drag pin and lets the layout cool back down. Safe to
    /// call on every gesture exit path, including cancellation.
    pub fn end_drag(&mut self) {
        if let Some(id) = self.dragged.take() {
            if let Some(n) = self.g.node_mut(id) {
                n.unpin();
            }
            self.layout.cool();
        }
    }

    /// Advances simulation and camera by one frame. Hosts call this once
    /// per render tick and then read positions and the transform.
    pub fn tick(&mut self) {
        self.layout.step(&mut self.g);
        self.camera.tick();
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.layout.set_viewport(viewport);
    }

    pub fn graph(&self) -> &Graph {
        &self.g
    }

    pub fn selection(&self) -> Selection {
        self.selection.current()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn transform(&self) -> Transform {
        self.camera.transform()
    }

    pub fn layout(&self) -> &ForceLayout {
        &self.layout
    }

    fn replace_active(&mut self, mut next: Graph, carry_positions: bool) {
        if carry_positions {
            next.carry_positions_from(&self.g);
        }
        next.release_pins();
        self.dragged = None;

        self.g = next;
        // The old simulation state dies with its graph.
        self.layout = ForceLayout::new(ForceLayoutState::default());
        self.layout.init(&mut self.g, self.viewport);
        self.layout.settle(&mut self.g);

        if self.selection.prune(&mut self.g) {
            self.publish_selection();
        }

        let target = fit_to_bounds(self.g.bounds(), self.viewport, FIT_PADDING);
        self.animate_camera(target);
    }

    fn animate_camera(&mut self, target: Transform) {
        self.camera.animate_to(target);
        self.publish(Event::ViewportTransformChanged(
            PayloadViewportTransformChanged {
                zoom: target.zoom,
                pan: [target.pan.x, target.pan.y],
            },
        ));
    }

    fn publish_selection(&self) {
        let (kind, id) = match self.selection.current() {
            Selection::None => (SelectionKind::None, None),
            Selection::Node(id) => (SelectionKind::Node, Some(id)),
            Selection::Edge(id) => (SelectionKind::Edge, Some(id)),
        };
        self.publish(Event::SelectionChanged(PayloadSelectionChanged { kind, id }));
    }

    fn publish(&self, event: Event) {
        if let Some(sink) = &self.sink {
            sink.send_event(event);
        }
    }
}
