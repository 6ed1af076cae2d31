use crate::position::Pixels;

/// Pan and zoom applied uniformly to the projected map: `screen = projected * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    /// Horizontal translation in pixels. It is never clamped, as the map wraps around.
    pub x: f64,
    /// Vertical translation in pixels.
    pub y: f64,
    /// Uniform scale.
    pub k: f64,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CameraTransform {
    pub const IDENTITY: Self = Self {
        x: 0.,
        y: 0.,
        k: 1.,
    };

    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Map a point from the projected plane onto the screen.
    pub fn apply(&self, point: Pixels) -> Pixels {
        Pixels::new(point.x() * self.k + self.x, point.y() * self.k + self.y)
    }

    /// Map a point from the screen back onto the projected plane.
    pub fn invert(&self, point: Pixels) -> Pixels {
        Pixels::new((point.x() - self.x) / self.k, (point.y() - self.y) / self.k)
    }

    /// Same transform, but with a different horizontal translation.
    pub fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    /// Linear interpolation towards `other`. `t` of `0` gives `self`, `1` gives `other`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            k: self.k + (other.k - self.k) * t,
        }
    }
}

/// Cubic in-out easing, the default of d3 transitions.
pub(crate) fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0., 1.);
    if t < 0.5 {
        4. * t * t * t
    } else {
        let t = -2. * t + 2.;
        1. - t * t * t / 2.
    }
}
