use std::time::Duration;

use crate::{
    mercator::Viewport,
    position::Pixels,
    transform::{CameraTransform, ease_cubic_in_out},
    zoom::ScaleExtent,
};

/// What the camera is doing between frames.
#[derive(Debug, Clone, PartialEq, Default)]
enum Motion {
    #[default]
    Idle,

    /// Camera is animating towards `to`. Interpolation is eased, so `elapsed` is mapped through
    /// [`ease_cubic_in_out`] before being applied.
    Transition {
        from: CameraTransform,
        to: CameraTransform,
        elapsed: Duration,
        duration: Duration,
    },
}

/// Pan and zoom state of the map. All mutations go through it, so the transform always stays
/// within the scale extent and the vertical bound, no matter if it was changed by the user
/// dragging the map or by an animation frame.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: CameraTransform,
    extent: ScaleExtent,
    viewport: Viewport,
    motion: Motion,
}

impl Camera {
    pub fn new(viewport: Viewport, extent: ScaleExtent) -> Self {
        let mut camera = Self {
            transform: CameraTransform::IDENTITY,
            extent,
            viewport,
            motion: Motion::Idle,
        };
        camera.transform = camera.constrain(camera.transform);
        camera
    }

    /// Current transform, including the progress of a running transition.
    pub fn transform(&self) -> CameraTransform {
        self.transform
    }

    pub fn extent(&self) -> ScaleExtent {
        self.extent
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether a transition is in progress.
    pub fn animating(&self) -> bool {
        matches!(self.motion, Motion::Transition { .. })
    }

    /// Multiply the scale by `factor`, keeping the translation.
    pub fn zoom_by(&mut self, factor: f64) {
        self.motion = Motion::Idle;
        let k = self.extent.clamp(self.transform.k * factor);
        self.transform = self.constrain(CameraTransform { k, ..self.transform });
    }

    /// Animate the scale towards `k`, keeping the translation.
    pub fn zoom_to(&mut self, k: f64, duration: Duration) {
        let target = CameraTransform {
            k: self.extent.clamp(k),
            ..self.transform
        };
        self.transition_to(target, duration);
    }

    /// Animate back to the initial, unzoomed view.
    pub fn reset(&mut self, duration: Duration) {
        let target = CameraTransform::new(0., 0., self.extent.min());
        self.transition_to(target, duration);
    }

    /// Animate towards a transform which puts `point`, given in base projected coordinates, in
    /// the middle of the viewport at scale `zoom`.
    pub fn fly_to(&mut self, point: Pixels, zoom: f64, duration: Duration) {
        let k = self.extent.clamp(zoom);
        let center = self.viewport.center();
        let target = CameraTransform::new(
            center.x() - point.x() * k,
            center.y() - point.y() * k,
            k,
        );
        self.transition_to(target, duration);
    }

    /// Translate by a screen delta, as when the map is dragged.
    pub fn drag(&mut self, delta: egui::Vec2) {
        self.motion = Motion::Idle;
        let t = self.transform;
        self.transform = self.constrain(CameraTransform::new(
            t.x + delta.x as f64,
            t.y + delta.y as f64,
            t.k,
        ));
    }

    /// Multiply the scale by `factor`, keeping the projected point under `anchor` in place.
    pub fn scroll(&mut self, factor: f64, anchor: Pixels) {
        self.motion = Motion::Idle;
        let t = self.transform;
        let k = self.extent.clamp(t.k * factor);
        let projected = t.invert(anchor);
        self.transform = self.constrain(CameraTransform::new(
            anchor.x() - projected.x() * k,
            anchor.y() - projected.y() * k,
            k,
        ));
    }

    /// Adapt to the new size of the map area. Transform is kept, only the constraints are
    /// re-applied.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.transform = self.constrain(self.transform);
        if let Motion::Transition { to, .. } = &mut self.motion {
            *to = constrain(*to, self.extent, self.viewport);
        }
    }

    /// Advance a running transition by `delta_time`. Returns `true` if the transform changed.
    pub fn update(&mut self, delta_time: Duration) -> bool {
        let Motion::Transition {
            from,
            to,
            elapsed,
            duration,
        } = &mut self.motion
        else {
            return false;
        };

        *elapsed += delta_time;
        if *elapsed >= *duration {
            self.transform = *to;
            self.motion = Motion::Idle;
        } else {
            let progress = ease_cubic_in_out(elapsed.as_secs_f64() / duration.as_secs_f64());
            let frame = from.lerp(to, progress);
            self.transform = constrain(frame, self.extent, self.viewport);
        }
        true
    }

    fn transition_to(&mut self, target: CameraTransform, duration: Duration) {
        let to = self.constrain(target);
        if duration.is_zero() {
            self.transform = to;
            self.motion = Motion::Idle;
        } else {
            self.motion = Motion::Transition {
                from: self.transform,
                to,
                elapsed: Duration::ZERO,
                duration,
            };
        }
    }

    fn constrain(&self, transform: CameraTransform) -> CameraTransform {
        constrain(transform, self.extent, self.viewport)
    }
}

/// Vertical bound of the translation at scale `k`. It keeps the band between `-h` and `2h` of
/// the projected plane covering the viewport, so the map never leaves the screen vertically.
///
/// Below scale 1/3 the band is shorter than the viewport and the bounds cross. The band is then
/// centred instead, so both bounds collapse to their midpoint.
pub(crate) fn vertical_bounds(k: f64, viewport_height: f64) -> (f64, f64) {
    let h = viewport_height;
    let (min_y, max_y) = (h - 2. * h * k, h * k);
    if min_y > max_y {
        let middle = (min_y + max_y) / 2.;
        (middle, middle)
    } else {
        (min_y, max_y)
    }
}

fn constrain(
    transform: CameraTransform,
    extent: ScaleExtent,
    viewport: Viewport,
) -> CameraTransform {
    let k = extent.clamp(transform.k);
    let (min_y, max_y) = vertical_bounds(k, viewport.height);
    let y = if transform.y.is_nan() {
        0.
    } else {
        transform.y.clamp(min_y, max_y)
    };
    let x = if transform.x.is_finite() { transform.x } else { 0. };
    CameraTransform { x, y, k }
}
