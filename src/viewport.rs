use egui::{Pos2, Rect, Vec2};
use instant::{Duration, Instant};
use serde::{Deserialize, Serialize};

/// Upper bound on the fit-to-bounds scale so small graphs are not
/// over-magnified.
pub const MAX_FIT_ZOOM: f32 = 1.2;
/// Constant zoom used when focusing on a selected element.
pub const FOCUS_ZOOM: f32 = 1.6;
/// Duration of the eased camera animation.
pub const TWEEN_DURATION: Duration = Duration::from_millis(400);

/// Camera affine transform: canvas coordinates scale by `zoom` then shift
/// by `pan`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            zoom: 1.,
            pan: Vec2::ZERO,
        }
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        zoom: 1.,
        pan: Vec2::ZERO,
    };

    pub fn canvas_to_screen_pos(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    pub fn canvas_to_screen_size(&self, size: f32) -> f32 {
        size * self.zoom
    }

    pub fn screen_to_canvas_pos(&self, pos: Pos2) -> Pos2 {
        ((pos.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    fn lerp(a: Transform, b: Transform, t: f32) -> Transform {
        Transform {
            zoom: a.zoom + (b.zoom - a.zoom) * t,
            pan: a.pan + (b.pan - a.pan) * t,
        }
    }
}

/// Transform framing `bounds` (node centers expanded by radii) inside the
/// viewport with `padding` on every side.
///
/// Degenerate input — no bounds, a zero-size extent or a viewport smaller
/// than its padding — yields the identity transform.
pub fn fit_to_bounds(bounds: Option<Rect>, viewport: Rect, padding: f32) -> Transform {
    let Some(bounds) = bounds else {
        return Transform::IDENTITY;
    };

    let extent = bounds.size();
    let available = viewport.size() - Vec2::splat(2. * padding);
    if extent.x <= 0. || extent.y <= 0. || available.x <= 0. || available.y <= 0. {
        return Transform::IDENTITY;
    }

    let zoom_x = available.x / extent.x;
    let zoom_y = available.y / extent.y;
    let mut zoom = zoom_x.min(zoom_y).min(MAX_FIT_ZOOM);
    if !zoom.is_finite() || zoom <= 0. {
        zoom = 1.;
    }

    let pan = viewport.center().to_vec2() - bounds.center().to_vec2() * zoom;
    Transform { zoom, pan }
}

/// Transform mapping `point` to the viewport center at a constant zoom;
/// used for selection focus, as opposed to reframing the whole visible set.
pub fn focus_on(point: Pos2, viewport: Rect, zoom: f32) -> Transform {
    Transform {
        zoom,
        pan: viewport.center().to_vec2() - point.to_vec2() * zoom,
    }
}

#[derive(Debug, Clone)]
struct Tween {
    from: Transform,
    to: Transform,
    started: Instant,
    duration: Duration,
}

/// Camera state: the committed transform plus an optional in-flight eased
/// animation. A new animation request always supersedes the current one.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    transform: Transform,
    tween: Option<Tween>,
}

impl Camera {
    /// The last committed transform; call [`Camera::tick`] each frame to
    /// advance an in-flight animation.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Where the camera will end up once any in-flight animation finishes.
    pub fn target(&self) -> Transform {
        self.tween
            .as_ref()
            .map_or(self.transform, |tween| tween.to)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Starts an eased animation toward `target`, replacing any in-flight
    /// one (last request wins).
    pub fn animate_to(&mut self, target: Transform) {
        self.tween = Some(Tween {
            from: self.transform,
            to: target,
            started: Instant::now(),
            duration: TWEEN_DURATION,
        });
    }

    /// Jumps to `target` immediately, cancelling any animation.
    pub fn jump_to(&mut self, target: Transform) {
        self.transform = target;
        self.tween = None;
    }

    /// Samples the animation at the current time and commits the result.
    pub fn tick(&mut self) -> Transform {
        if let Some(tween) = &self.tween {
            let elapsed = tween.started.elapsed();
            if elapsed >= tween.duration {
                self.transform = tween.to;
                self.tween = None;
            } else {
                let t = elapsed.as_secs_f32() / tween.duration.as_secs_f32();
                self.transform = Transform::lerp(tween.from, tween.to, ease_out_cubic(t));
            }
        }
        self.transform
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1. - (1. - t).powi(3)
}
