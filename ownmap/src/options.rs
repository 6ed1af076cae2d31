use std::{f64::consts::TAU, time::Duration};

use crate::{mercator::DEFAULT_SCALE_DIVISOR, zoom::ScaleExtent};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidOptions {
    #[error("scale divisor must be a positive number, got {0}")]
    ScaleDivisor(f64),

    #[error("world is narrower than the viewport at scale {min_scale} (divisor {divisor})")]
    WorldTooNarrow { min_scale: f64, divisor: f64 },

    #[error("zoom step must be greater than 1, got {0}")]
    ZoomStep(f64),

    #[error("default country zoom must be a positive number, got {0}")]
    DefaultCountryZoom(f64),

    #[error("tiling margin must not be negative, got {0}")]
    TilingMargin(f64),
}

/// Tunables of the map. Defaults match a map which shows the whole world at scale 1 and lets the
/// user zoom in eight times.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub scale_extent: ScaleExtent,

    /// Viewport width is divided by it to get the base scale of the projection.
    pub scale_divisor: f64,

    /// Factor applied by the zoom in and zoom out buttons.
    pub zoom_step: f64,

    pub zoom_duration: Duration,
    pub reset_duration: Duration,
    pub fly_duration: Duration,

    /// Zoom used when flying to a country which has no preferred zoom of its own.
    pub default_country_zoom: f64,

    /// Extra pixels on both sides of the viewport within which neighbouring copies of the world
    /// are already drawn.
    pub tiling_margin: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            scale_extent: ScaleExtent::default(),
            scale_divisor: DEFAULT_SCALE_DIVISOR,
            zoom_step: 1.3,
            zoom_duration: Duration::from_millis(300),
            reset_duration: Duration::from_millis(300),
            fly_duration: Duration::from_millis(750),
            default_country_zoom: 4.,
            tiling_margin: 0.,
        }
    }
}

impl MapOptions {
    pub fn with_scale_extent(mut self, scale_extent: ScaleExtent) -> Self {
        self.scale_extent = scale_extent;
        self
    }

    pub fn with_scale_divisor(mut self, scale_divisor: f64) -> Self {
        self.scale_divisor = scale_divisor;
        self
    }

    pub fn with_zoom_step(mut self, zoom_step: f64) -> Self {
        self.zoom_step = zoom_step;
        self
    }

    pub fn with_zoom_duration(mut self, duration: Duration) -> Self {
        self.zoom_duration = duration;
        self
    }

    pub fn with_reset_duration(mut self, duration: Duration) -> Self {
        self.reset_duration = duration;
        self
    }

    pub fn with_fly_duration(mut self, duration: Duration) -> Self {
        self.fly_duration = duration;
        self
    }

    pub fn with_default_country_zoom(mut self, zoom: f64) -> Self {
        self.default_country_zoom = zoom;
        self
    }

    pub fn with_tiling_margin(mut self, margin: f64) -> Self {
        self.tiling_margin = margin;
        self
    }

    /// Check that the options can drive a map. In particular, one copy of the world must be at
    /// least as wide as the viewport at the minimal scale, otherwise three copies would not be
    /// enough to fill it.
    pub fn validate(&self) -> Result<(), InvalidOptions> {
        if !self.scale_divisor.is_finite() || self.scale_divisor <= 0. {
            return Err(InvalidOptions::ScaleDivisor(self.scale_divisor));
        }

        if TAU / self.scale_divisor * self.scale_extent.min() < 1. {
            return Err(InvalidOptions::WorldTooNarrow {
                min_scale: self.scale_extent.min(),
                divisor: self.scale_divisor,
            });
        }

        if !self.zoom_step.is_finite() || self.zoom_step <= 1. {
            return Err(InvalidOptions::ZoomStep(self.zoom_step));
        }

        if !self.default_country_zoom.is_finite() || self.default_country_zoom <= 0. {
            return Err(InvalidOptions::DefaultCountryZoom(
                self.default_country_zoom,
            ));
        }

        if !self.tiling_margin.is_finite() || self.tiling_margin < 0. {
            return Err(InvalidOptions::TilingMargin(self.tiling_margin));
        }

        Ok(())
    }
}
