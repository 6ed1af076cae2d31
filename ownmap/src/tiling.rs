//! Horizontal repetition of the map. The world is drawn once at its wrapped position and, when
//! that does not fill the viewport, once more on either side.

use crate::{mercator::Projection, position::Pixels, transform::CameraTransform};

/// Floor modulo of the horizontal translation. Result is always in `[0, period)`, also for
/// negative or very large `x`. Degenerate periods leave `x` as it is.
pub fn wrap(x: f64, period: f64) -> f64 {
    if !(period.is_finite() && period > 0.) {
        return x;
    }
    let wrapped = x.rem_euclid(period);
    // rem_euclid can round up to `period` for tiny negative inputs.
    if wrapped >= period { 0. } else { wrapped }
}

/// One rendered copy of the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCopy {
    /// `0` for the prime copy, `-1` and `1` for its neighbours.
    pub offset_index: i32,
    /// Horizontal translation of this copy on the screen.
    pub screen_x: f64,
}

impl MapCopy {
    /// Transform of this copy, derived from the snapshot shared by the whole plan.
    pub fn transform(&self, snapshot: CameraTransform) -> CameraTransform {
        snapshot.with_x(self.screen_x)
    }
}

/// Copies of the world to draw in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlan {
    transform: CameraTransform,
    copies: Vec<MapCopy>,
}

impl TilePlan {
    /// Transform snapshot every copy derives from.
    pub fn transform(&self) -> CameraTransform {
        self.transform
    }

    pub fn copies(&self) -> &[MapCopy] {
        &self.copies
    }

    /// Copies together with their transforms.
    pub fn transforms(&self) -> impl Iterator<Item = (MapCopy, CameraTransform)> + '_ {
        self.copies
            .iter()
            .map(|copy| (*copy, copy.transform(self.transform)))
    }

    /// Point in base projected coordinates lying under `screen` in each of the copies.
    pub fn locate(&self, screen: Pixels) -> impl Iterator<Item = (MapCopy, Pixels)> + '_ {
        self.transforms()
            .map(move |(copy, transform)| (copy, transform.invert(screen)))
    }
}

/// Work out which copies of the world are visible under `transform`. Copies are instantiated when
/// their content overlaps the viewport widened by `margin` on both sides.
///
/// `margin` is in screen pixels and does not grow with the scale.
pub fn plan(transform: CameraTransform, projection: &Projection, margin: f64) -> TilePlan {
    let period = projection.world_width() * transform.k;
    let x_mod = wrap(transform.x, period);

    let (span_start, span_end) = projection.world_span_x();
    let visible_start = -margin;
    let visible_end = projection.viewport().width + margin;

    let copies = [0, -1, 1]
        .into_iter()
        .filter_map(|offset_index| {
            let screen_x = x_mod + offset_index as f64 * period;
            let start = screen_x + span_start * transform.k;
            let end = screen_x + span_end * transform.k;

            (offset_index == 0 || (start < visible_end && end > visible_start)).then_some(
                MapCopy {
                    offset_index,
                    screen_x,
                },
            )
        })
        .collect();

    TilePlan { transform, copies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mercator::{DEFAULT_SCALE_DIVISOR, Viewport};
    use approx::assert_relative_eq;

    fn projection() -> Projection {
        Projection::for_viewport(Viewport::new(1200., 800.), DEFAULT_SCALE_DIVISOR)
    }

    /// Screen ranges covered by the copies, sorted from left to right.
    fn covered_ranges(plan: &TilePlan, projection: &Projection) -> Vec<(f64, f64)> {
        let (span_start, span_end) = projection.world_span_x();
        let mut ranges: Vec<_> = plan
            .transforms()
            .map(|(_, t)| (t.x + span_start * t.k, t.x + span_end * t.k))
            .collect();
        ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranges
    }

    fn assert_covers_viewport(plan: &TilePlan, projection: &Projection) {
        let ranges = covered_ranges(plan, projection);
        let width = projection.viewport().width;

        assert!(ranges[0].0 <= 0., "gap on the left: {ranges:?}");
        assert!(ranges[ranges.len() - 1].1 >= width, "gap on the right: {ranges:?}");
        for pair in ranges.windows(2) {
            assert!(pair[1].0 <= pair[0].1 + 1e-6, "gap between copies: {ranges:?}");
        }
    }

    #[test]
    fn wrapping_is_continuous_across_the_period() {
        let projection = projection();
        let k = 1.;
        let period = projection.world_width() * k;

        let mut previous: Option<f64> = None;
        let mut x = period - 1.;
        while x <= period + 1. {
            let wrapped = wrap(x, period);
            assert!((0. ..period).contains(&wrapped));

            if let Some(previous) = previous {
                // Distance on the circle, so going from `period - ε` to `0` is a small step.
                let diff = (wrapped - previous).abs();
                let circular = diff.min(period - diff);
                assert!(circular <= 2., "jump from {previous} to {wrapped}");
            }
            previous = Some(wrapped);
            x += 0.25;
        }
    }

    #[test]
    fn wrapping_negative_and_huge_translations() {
        assert_relative_eq!(wrap(-1., 1000.), 999.);
        assert_relative_eq!(wrap(-2500., 1000.), 500.);
        assert_relative_eq!(wrap(1e12 + 250., 1000.), 250., epsilon = 1e-3);
        assert_eq!(wrap(0., 1000.), 0.);
        assert!(wrap(-1e-20, 1000.) < 1000.);
        assert_eq!(wrap(5., 0.), 5.);
    }

    #[test]
    fn unzoomed_map_needs_only_the_prime_copy() {
        let projection = projection();
        let plan = plan(CameraTransform::IDENTITY, &projection, 0.);

        assert_eq!(
            plan.copies(),
            &[MapCopy {
                offset_index: 0,
                screen_x: 0.
            }]
        );
        assert_covers_viewport(&plan, &projection);
    }

    #[test]
    fn panned_map_gets_a_neighbour() {
        let projection = projection();

        let plan_right = plan(CameraTransform::new(300., 0., 1.), &projection, 0.);
        assert_eq!(plan_right.copies().len(), 2);
        assert!(plan_right.copies().iter().any(|c| c.offset_index == -1));
        assert_covers_viewport(&plan_right, &projection);

        let plan_left = plan(CameraTransform::new(-300., 0., 1.), &projection, 0.);
        assert_eq!(plan_left.copies().len(), 2);
        assert_covers_viewport(&plan_left, &projection);
    }

    #[test]
    fn viewport_is_covered_for_any_translation() {
        let projection = projection();
        for k in [1., 1.3, 2., 5., 8.] {
            let mut x = -50_000.;
            while x < 50_000. {
                let plan = plan(CameraTransform::new(x, 0., k), &projection, 0.);
                assert!(plan.copies().len() <= 3);
                assert_eq!(plan.copies()[0].offset_index, 0);
                assert_covers_viewport(&plan, &projection);
                x += 137.7;
            }
        }
    }

    #[test]
    fn copies_share_scale_and_vertical_translation() {
        let projection = projection();
        let snapshot = CameraTransform::new(250., -120., 1.);
        let plan = plan(snapshot, &projection, 100.);

        assert_eq!(plan.transform(), snapshot);
        for (_, transform) in plan.transforms() {
            assert_eq!(transform.k, snapshot.k);
            assert_eq!(transform.y, snapshot.y);
        }
    }

    #[test]
    fn margin_adds_copies_early() {
        let projection = projection();
        let transform = CameraTransform::IDENTITY;

        assert_eq!(plan(transform, &projection, 0.).copies().len(), 1);
        assert_eq!(plan(transform, &projection, 50.).copies().len(), 3);
    }

    #[test]
    fn locating_a_point_in_every_copy() {
        let projection = projection();
        let plan = plan(CameraTransform::new(300., 0., 1.), &projection, 0.);
        let period = projection.world_width();

        let located: Vec<_> = plan.locate(Pixels::new(100., 400.)).collect();
        assert_eq!(located.len(), 2);
        assert_relative_eq!(located[0].1.x(), -200.);
        assert_relative_eq!(located[1].1.x(), -200. + period);
        assert_relative_eq!(located[1].1.y(), 400.);
    }
}
