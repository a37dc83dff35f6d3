use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// Synchronous warm-up ticks run after (re)initialization so the first
/// painted frame shows a settled layout instead of the chaotic expansion
/// phase.
pub const WARMUP_TICKS: u32 = 300;

/// Alpha target while a drag is in progress; the surrounding graph keeps
/// readjusting visibly until the pin is released.
pub const REHEAT_ALPHA: f32 = 0.3;

/// Tunable parameters plus the decay scalar of the simulation. Discarded
/// and rebuilt together with the graph it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceLayoutState {
    /// Force magnitude scale for the current tick; decays toward
    /// `alpha_target` geometrically.
    pub alpha: f32,
    pub alpha_target: f32,
    pub alpha_decay: f32,
    /// Below this alpha the layout counts as settled.
    pub settle_epsilon: f32,

    /// Velocity retained per tick after integration.
    pub velocity_decay: f32,
    /// Cap on per-tick movement to keep early high-energy ticks stable.
    pub max_step: f32,
    /// Minimum distance guard for force math.
    pub epsilon: f32,

    /// Rest length of a citation spring; generous so edge labels fit.
    pub link_distance: f32,
    pub link_strength: f32,
    /// Charge-like pairwise repulsion, divided by squared distance.
    pub repulse_strength: f32,
    /// Weak pull toward the viewport center keeping disconnected
    /// components from drifting apart.
    pub center_strength: f32,

    pub collision_padding: f32,
    pub collision_iterations: usize,
}

impl Default for ForceLayoutState {
    fn default() -> Self {
        ForceLayoutState {
            alpha: 1.,
            alpha_target: 0.,
            alpha_decay: 0.0228,
            settle_epsilon: 0.005,

            velocity_decay: 0.6,
            max_step: 30.,
            epsilon: 1e-3,

            link_distance: 120.,
            link_strength: 0.1,
            repulse_strength: 2000.,
            center_strength: 0.05,

            collision_padding: 2.,
            collision_iterations: 3,
        }
    }
}

/// Force-directed layout over a [`Graph`]. Owns the per-tick simulation
/// state exclusively; the render layer only reads committed positions.
#[derive(Debug)]
pub struct ForceLayout {
    state: ForceLayoutState,
    viewport: Rect,
    // Reusable accumulation buffer to avoid per-tick allocations.
    scratch: Vec<Vec2>,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self::new(ForceLayoutState::default())
    }
}

impl ForceLayout {
    pub fn new(state: ForceLayoutState) -> Self {
        Self {
            state,
            viewport: Rect::ZERO,
            scratch: Vec::new(),
        }
    }

    pub fn state(&self) -> &ForceLayoutState {
        &self.state
    }

    /// Assigns starting positions and zero velocities, and resets `alpha`
    /// to full energy. Nodes that already carry a position (survivors of a
    /// filter, or pinned) keep it; the rest are placed pseudo-randomly
    /// within the viewport. Empty graph: no-op.
    pub fn init(&mut self, g: &mut Graph, viewport: Rect) {
        self.viewport = viewport;
        self.state.alpha = 1.;
        self.state.alpha_target = 0.;

        let mut rng = rand::rng();
        for n in g.nodes_iter_mut() {
            if !n.placed() {
                n.set_location(Pos2::new(
                    rng.random_range(viewport.min.x..=viewport.max.x),
                    rng.random_range(viewport.min.y..=viewport.max.y),
                ));
            }
            n.set_velocity(Vec2::ZERO);
        }
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// One discrete simulation step: accumulate the four forces, integrate
    /// with velocity decay, resolve collisions, then decay alpha.
    pub fn step(&mut self, g: &mut Graph) {
        if g.node_count() == 0 {
            return;
        }

        let ids: Vec<usize> = g.nodes_iter().map(crate::elements::Node::id).collect();
        let slots: HashMap<usize, usize> =
            ids.iter().enumerate().map(|(slot, &id)| (id, slot)).collect();

        if self.scratch.len() == ids.len() {
            self.scratch.fill(Vec2::ZERO);
        } else {
            self.scratch.resize(ids.len(), Vec2::ZERO);
        }

        let params = &self.state;
        accumulate_link_force(g, &slots, &mut self.scratch, params);
        accumulate_repulsion(g, &ids, &mut self.scratch, params);
        accumulate_centering(g, &ids, &mut self.scratch, self.viewport.center(), params);
        integrate(g, &ids, &self.scratch, params);
        resolve_collisions(g, &ids, params);

        self.state.alpha += (self.state.alpha_target - self.state.alpha) * self.state.alpha_decay;
    }

    /// Runs the fixed warm-up so the graph is visually settled before the
    /// first paint.
    pub fn settle(&mut self, g: &mut Graph) {
        for _ in 0..WARMUP_TICKS {
            self.step(g);
        }
    }

    /// Re-energizes the simulation at the start of a drag.
    pub fn reheat(&mut self) {
        self.state.alpha_target = REHEAT_ALPHA;
        self.state.alpha = self.state.alpha.max(REHEAT_ALPHA);
    }

    /// Lets alpha decay back toward zero after a drag ends.
    pub fn cool(&mut self) {
        self.state.alpha_target = 0.;
    }

    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn is_settled(&self) -> bool {
        self.state.alpha < self.state.settle_epsilon
    }
}

fn accumulate_link_force(
    g: &Graph,
    slots: &HashMap<usize, usize>,
    disp: &mut [Vec2],
    params: &ForceLayoutState,
) {
    for e in g.edges_iter() {
        let (Some(a), Some(b)) = (g.node(e.source_id()), g.node(e.target_id())) else {
            continue;
        };
        let (Some(&slot_a), Some(&slot_b)) = (slots.get(&a.id()), slots.get(&b.id())) else {
            continue;
        };

        let delta = b.location() - a.location();
        let distance = delta.length().max(params.epsilon);
        let force = params.link_strength * (distance - params.link_distance);
        let dir = delta / distance;
        disp[slot_a] += dir * force;
        disp[slot_b] -= dir * force;
    }
}

fn accumulate_repulsion(g: &Graph, ids: &[usize], disp: &mut [Vec2], params: &ForceLayoutState) {
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            let (a, b) = (g.node(ids[i]).unwrap(), g.node(ids[j]).unwrap());
            let delta = a.location() - b.location();
            let distance = delta.length().max(params.epsilon);
            let force = params.repulse_strength / (distance * distance);
            let dir = delta / distance;
            disp[i] += dir * force;
            disp[j] -= dir * force;
        }
    }
}

fn accumulate_centering(
    g: &Graph,
    ids: &[usize],
    disp: &mut [Vec2],
    center: Pos2,
    params: &ForceLayoutState,
) {
    for (slot, &id) in ids.iter().enumerate() {
        let loc = g.node(id).unwrap().location();
        disp[slot] += (center - loc) * params.center_strength;
    }
}

fn integrate(g: &mut Graph, ids: &[usize], disp: &[Vec2], params: &ForceLayoutState) {
    for (slot, &id) in ids.iter().enumerate() {
        let n = g.node_mut(id).unwrap();

        // A pinned node keeps its externally supplied position; it still
        // exerted forces on the others above.
        if let Some(pin) = n.pinned() {
            n.set_location(pin);
            n.set_velocity(Vec2::ZERO);
            continue;
        }

        let mut velocity = (n.velocity() + disp[slot] * params.alpha) * params.velocity_decay;
        if velocity.length() > params.max_step {
            velocity = velocity.normalized() * params.max_step;
        }

        let new_loc = n.location() + velocity;
        if !new_loc.x.is_finite() || !new_loc.y.is_finite() {
            continue;
        }
        n.set_location(new_loc);
        n.set_velocity(velocity);
    }
}

fn resolve_collisions(g: &mut Graph, ids: &[usize], params: &ForceLayoutState) {
    for _ in 0..params.collision_iterations {
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let a = g.node(ids[i]).unwrap();
                let b = g.node(ids[j]).unwrap();

                let min_distance = a.radius() + b.radius() + params.collision_padding;
                let mut delta = b.location() - a.location();
                let mut distance = delta.length();
                if distance >= min_distance {
                    continue;
                }
                if distance < params.epsilon {
                    // Coincident centers; separate along a fixed axis.
                    delta = Vec2::new(min_distance, 0.);
                    distance = params.epsilon;
                }

                let dir = delta / distance;
                let overlap = min_distance - distance;
                let (a_pinned, b_pinned) = (a.pinned().is_some(), b.pinned().is_some());
                let (loc_a, loc_b) = (a.location(), b.location());

                // The immovable (pinned) side transfers its share of the
                // correction to the other node.
                let (push_a, push_b) = match (a_pinned, b_pinned) {
                    (true, true) => continue,
                    (true, false) => (0., overlap),
                    (false, true) => (overlap, 0.),
                    (false, false) => (overlap / 2., overlap / 2.),
                };

                if push_a > 0. {
                    g.node_mut(ids[i]).unwrap().set_location(loc_a - dir * push_a);
                }
                if push_b > 0. {
                    g.node_mut(ids[j]).unwrap().set_location(loc_b + dir * push_b);
                }
            }
        }
    }
}
