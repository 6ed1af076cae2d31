//! Country geometry projected onto the base plane. It is computed once per viewport size and then
//! re-positioned for every copy of the world, at every frame.

use egui::{Pos2, Rect, pos2};
use geo::{BoundingRect as _, Centroid as _, Contains as _};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use lyon_path::Path;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, TessellationError,
    VertexBuffers, math::point,
};

use crate::{
    mercator::Projection,
    position::{Pixels, PixelsExt as _, Position},
    tiling::{MapCopy, TilePlan},
    world::CountryFeature,
};

/// Triangles covering the inside of a country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fill {
    pub vertices: Vec<Pos2>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct CountryShape {
    pub code: String,
    pub name: String,

    /// Outlines in base projected coordinates, without the closing point.
    pub rings: Vec<Vec<Pos2>>,

    /// `None` if the geometry could not be tessellated. Such country is drawn as an outline.
    pub fill: Option<Fill>,

    pub bounds: Option<Rect>,

    /// Planar centroid of the projected geometry.
    pub label_anchor: Option<Pos2>,

    projected: MultiPolygon,
}

impl CountryShape {
    fn new(feature: &CountryFeature, projection: &Projection) -> Self {
        let projected = project_multi_polygon(&feature.geometry, projection);

        let rings: Vec<Vec<Pos2>> = projected
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .filter_map(ring_points)
            .collect();

        let fill = if rings.is_empty() {
            None
        } else {
            match tessellate(&rings) {
                Ok(fill) => Some(fill),
                Err(err) => {
                    log::warn!("Could not tessellate '{}': {err:?}.", feature.code);
                    None
                }
            }
        };

        let bounds = projected
            .bounding_rect()
            .map(|rect| Rect::from_min_max(pixels(rect.min()), pixels(rect.max())));

        let label_anchor = projected
            .centroid()
            .filter(|centroid| centroid.x().is_finite() && centroid.y().is_finite())
            .map(|centroid| centroid.to_pos2());

        Self {
            code: feature.code.clone(),
            name: feature.name.clone(),
            rings,
            fill,
            bounds,
            label_anchor,
            projected,
        }
    }

    /// Whether `point`, given in base projected coordinates, lies inside the country. Holes do
    /// not count.
    pub fn contains(&self, point: Pixels) -> bool {
        self.bounds
            .is_some_and(|bounds| bounds.contains(point.to_pos2()))
            && self.projected.contains(&point)
    }
}

/// Shapes of all countries for a single projection.
#[derive(Debug, Clone)]
pub struct ProjectedWorld {
    projection: Projection,
    shapes: Vec<CountryShape>,
}

impl ProjectedWorld {
    pub fn new(features: &[CountryFeature], projection: Projection) -> Self {
        let shapes = features
            .iter()
            .map(|feature| CountryShape::new(feature, &projection))
            .collect();
        Self { projection, shapes }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn shapes(&self) -> &[CountryShape] {
        &self.shapes
    }

    /// Country under `point`, in base projected coordinates. Countries drawn later are on top,
    /// so they win.
    pub fn hit_test(&self, point: Pixels) -> Option<&CountryShape> {
        self.shapes.iter().rev().find(|shape| shape.contains(point))
    }

    /// Country under `screen` point, in any of the copies of `plan`.
    pub fn hit_test_plan(
        &self,
        plan: &TilePlan,
        screen: Pixels,
    ) -> Option<(MapCopy, &CountryShape)> {
        plan.locate(screen)
            .find_map(|(copy, point)| self.hit_test(point).map(|shape| (copy, shape)))
    }
}

fn pixels(coord: Coord) -> Pos2 {
    pos2(coord.x as f32, coord.y as f32)
}

fn project_multi_polygon(geometry: &MultiPolygon, projection: &Projection) -> MultiPolygon {
    let project_ring = |ring: &LineString| -> LineString {
        ring.coords()
            .map(|coord| Coord::from(projection.project(Position::from(*coord))))
            .collect()
    };

    geometry
        .iter()
        .map(|polygon| {
            Polygon::new(
                project_ring(polygon.exterior()),
                polygon.interiors().iter().map(project_ring).collect(),
            )
        })
        .collect()
}

/// Points of a closed ring, without repeating the first one at the end. Degenerate rings are
/// dropped.
fn ring_points(ring: &LineString) -> Option<Vec<Pos2>> {
    let mut points: Vec<Pos2> = ring.coords().map(|coord| pixels(*coord)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    (points.len() >= 3).then_some(points)
}

/// Tessellate rings with the even-odd rule, so that holes stay empty.
fn tessellate(rings: &[Vec<Pos2>]) -> Result<Fill, TessellationError> {
    let mut builder = Path::builder();
    for ring in rings {
        let mut points = ring.iter().map(|p| point(p.x, p.y));
        if let Some(first) = points.next() {
            builder.begin(first);
            for p in points {
                builder.line_to(p);
            }
            builder.end(true);
        }
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Pos2, u32> = VertexBuffers::new();
    FillTessellator::new().tessellate_path(
        &path,
        &FillOptions::default().with_fill_rule(FillRule::EvenOdd),
        &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex<'_>| {
            let position = vertex.position();
            pos2(position.x, position.y)
        }),
    )?;

    Ok(Fill {
        vertices: buffers.vertices,
        indices: buffers.indices,
    })
}
