//! Project the lon/lat coordinates into a 2D x/y plane using the Mercator projection, the same way
//! `d3.geoMercator()` does it: the map is scaled by a base scale and centered in the viewport.
//! <https://en.wikipedia.org/wiki/Mercator_projection>
//! <https://d3js.org/d3-geo/cylindrical#geoMercator>

use crate::position::{Pixels, Position, lon_lat};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

/// Latitude at which the Mercator map becomes a square. Beyond that, `y` grows towards infinity,
/// so positions are clamped to it before projecting.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Divisor of the viewport width used to get the base scale of the projection. It was picked so
/// that the whole range of longitudes fits in the viewport when the map is not zoomed.
pub const DEFAULT_SCALE_DIVISOR: f64 = 6.2;

/// Size of the area the map is drawn on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Pixels {
        Pixels::new(self.width / 2., self.height / 2.)
    }
}

impl From<egui::Vec2> for Viewport {
    fn from(size: egui::Vec2) -> Self {
        Self::new(size.x as f64, size.y as f64)
    }
}

/// Base scale of the projection for a viewport of given width.
pub fn base_scale(viewport_width: f64, divisor: f64) -> f64 {
    viewport_width / divisor
}

/// Horizontal distance in projected pixels after which the map repeats itself.
pub fn world_width(base_scale: f64) -> f64 {
    TAU * base_scale
}

/// Mercator projection parameterized by the viewport and a base scale. It does not hold any
/// mutable state, so it is cheap to copy into every render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    viewport: Viewport,
    scale: f64,
}

impl Projection {
    pub fn new(viewport: Viewport, base_scale: f64) -> Self {
        Self {
            viewport,
            scale: base_scale,
        }
    }

    /// Projection whose base scale is derived from the viewport width.
    pub fn for_viewport(viewport: Viewport, divisor: f64) -> Self {
        Self::new(viewport, base_scale(viewport.width, divisor))
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn base_scale(&self) -> f64 {
        self.scale
    }

    pub fn world_width(&self) -> f64 {
        world_width(self.scale)
    }

    /// Horizontal extent of one copy of the world, from the antimeridian on the west to the
    /// antimeridian on the east.
    pub fn world_span_x(&self) -> (f64, f64) {
        let center = self.viewport.center().x();
        let half = self.world_width() / 2.;
        (center - half, center + half)
    }

    /// Project `position` onto the plane.
    pub fn project(&self, position: Position) -> Pixels {
        let center = self.viewport.center();

        let lambda = position.x().to_radians();
        let phi = position.y().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        Pixels::new(
            center.x() + self.scale * lambda,
            center.y() - self.scale * (FRAC_PI_4 + phi / 2.).tan().ln(),
        )
    }

    /// Inverse of [`Projection::project`].
    pub fn unproject(&self, pixels: Pixels) -> Position {
        let center = self.viewport.center();

        let lambda = (pixels.x() - center.x()) / self.scale;
        let phi = 2. * ((center.y() - pixels.y()) / self.scale).exp().atan() - FRAC_PI_2;

        lon_lat(lambda.to_degrees(), phi.to_degrees())
    }
}
