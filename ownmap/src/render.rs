//! Painting of the map with [`egui::Painter`]. Every copy of the world re-positions the same,
//! cached shapes, so nothing here depends on the geography.

use egui::{Align2, Color32, FontId, Mesh, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use crate::{
    session::MapSession,
    shapes::{CountryShape, ProjectedWorld},
    transform::CameraTransform,
};

/// How a single country is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub fill: Color32,
    pub stroke: Color32,
    /// Width of the outline at scale 1. It grows with the zoom, like the rest of the map.
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapStyle {
    pub ocean: Color32,
    pub normal: Paint,
    pub selected: Paint,
    pub hovered: Paint,
    pub label_color: Color32,
    pub label_halo: Color32,
    /// Font size of the labels at scale 1.
    pub label_size: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            ocean: Color32::from_rgb(0xa4, 0xd1, 0xe8),
            normal: Paint {
                fill: Color32::from_rgb(0xe8, 0xe8, 0xe8),
                stroke: Color32::from_rgb(0xcc, 0xcc, 0xcc),
                stroke_width: 0.5,
            },
            selected: Paint {
                fill: Color32::from_rgb(0xc0, 0xc0, 0xc0),
                stroke: Color32::from_rgb(0x66, 0x66, 0x66),
                stroke_width: 1.,
            },
            hovered: Paint {
                fill: Color32::from_rgb(0xd0, 0xd0, 0xd0),
                stroke: Color32::from_rgb(0x99, 0x99, 0x99),
                stroke_width: 1.,
            },
            label_color: Color32::from_rgb(0x33, 0x33, 0x33),
            label_halo: Color32::WHITE,
            label_size: 5.,
        }
    }
}

/// Visual state of a country within a single render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Selected,
    Hovered,
}

impl Highlight {
    /// Hover wins over selection.
    pub fn of(code: &str, selected: Option<&str>, hovered: Option<&str>) -> Self {
        if hovered == Some(code) {
            Self::Hovered
        } else if selected == Some(code) {
            Self::Selected
        } else {
            Self::Normal
        }
    }
}

impl MapStyle {
    pub fn paint(&self, highlight: Highlight) -> &Paint {
        match highlight {
            Highlight::Normal => &self.normal,
            Highlight::Selected => &self.selected,
            Highlight::Hovered => &self.hovered,
        }
    }
}

/// Offsets of the copies of a label which form its halo.
const HALO: [Vec2; 4] = [vec2(-1., 0.), vec2(1., 0.), vec2(0., -1.), vec2(0., 1.)];

/// Draw the whole map within `painter`'s clip rect.
pub fn draw(painter: &Painter, session: &MapSession, style: &MapStyle) {
    let clip_rect = painter.clip_rect();
    painter.rect_filled(clip_rect, 0., style.ocean);

    let plan = session.plan();
    let origin = clip_rect.min.to_vec2();

    for (_, transform) in plan.transforms() {
        draw_copy(painter, session, style, transform, origin);
    }

    // Labels go last, so that no country covers them.
    for (_, transform) in plan.transforms() {
        draw_labels(painter, session.shapes(), style, transform, origin);
    }
}

fn to_screen(point: Pos2, transform: &CameraTransform, origin: Vec2) -> Pos2 {
    let k = transform.k as f32;
    Pos2::new(
        point.x * k + transform.x as f32,
        point.y * k + transform.y as f32,
    ) + origin
}

fn visible(
    shape: &CountryShape,
    transform: &CameraTransform,
    origin: Vec2,
    clip_rect: Rect,
) -> bool {
    shape.bounds.is_some_and(|bounds| {
        Rect::from_min_max(
            to_screen(bounds.min, transform, origin),
            to_screen(bounds.max, transform, origin),
        )
        .intersects(clip_rect)
    })
}

/// Fill and outline every visible country of a single copy of the world.
fn draw_copy(
    painter: &Painter,
    session: &MapSession,
    style: &MapStyle,
    transform: CameraTransform,
    origin: Vec2,
) {
    let clip_rect = painter.clip_rect();
    let k = transform.k as f32;

    let mut fills = Mesh::default();
    let mut outlines = Vec::new();
    let mut highlighted_outlines = Vec::new();

    for shape in session.shapes().shapes() {
        if !visible(shape, &transform, origin, clip_rect) {
            continue;
        }

        let highlight = session.highlight(&shape.code);
        let paint = style.paint(highlight);

        if let Some(fill) = &shape.fill {
            let base = fills.vertices.len() as u32;
            for vertex in &fill.vertices {
                fills.colored_vertex(to_screen(*vertex, &transform, origin), paint.fill);
            }
            fills
                .indices
                .extend(fill.indices.iter().map(|index| base + index));
        }

        let stroke = Stroke::new(paint.stroke_width * k, paint.stroke);
        let target = if highlight == Highlight::Normal {
            &mut outlines
        } else {
            &mut highlighted_outlines
        };
        for ring in &shape.rings {
            let points = ring
                .iter()
                .map(|point| to_screen(*point, &transform, origin))
                .collect();
            target.push(Shape::closed_line(points, stroke));
        }
    }

    painter.add(Shape::mesh(fills));
    painter.extend(outlines);
    painter.extend(highlighted_outlines);
}

fn draw_labels(
    painter: &Painter,
    shapes: &ProjectedWorld,
    style: &MapStyle,
    transform: CameraTransform,
    origin: Vec2,
) {
    let font_size = style.label_size * transform.k as f32;
    let font = FontId::proportional(font_size);
    let area = painter.clip_rect().expand(font_size * 10.);

    for shape in shapes.shapes() {
        let Some(anchor) = shape.label_anchor else {
            continue;
        };

        let position = to_screen(anchor, &transform, origin);
        if !area.contains(position) {
            continue;
        }

        for offset in HALO {
            painter.text(
                position + offset,
                Align2::CENTER_CENTER,
                &shape.name,
                font.clone(),
                style.label_halo,
            );
        }
        painter.text(
            position,
            Align2::CENTER_CENTER,
            &shape.name,
            font.clone(),
            style.label_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_wins_over_selection() {
        assert_eq!(Highlight::of("FR", Some("FR"), Some("FR")), Highlight::Hovered);
        assert_eq!(Highlight::of("FR", Some("FR"), Some("ES")), Highlight::Selected);
        assert_eq!(Highlight::of("FR", None, None), Highlight::Normal);
        assert_eq!(Highlight::of("FR", Some("ES"), None), Highlight::Normal);
    }

    #[test]
    fn default_style_follows_the_palette() {
        let style = MapStyle::default();
        assert_eq!(style.ocean.to_hex(), "#a4d1e8ff");
        assert_eq!(style.paint(Highlight::Normal).fill.to_hex(), "#e8e8e8ff");
        assert_eq!(style.paint(Highlight::Selected).stroke.to_hex(), "#666666ff");
        assert_eq!(style.paint(Highlight::Hovered).stroke_width, 1.);
    }

    #[test]
    fn mapping_to_screen() {
        let transform = CameraTransform::new(-100., 50., 2.);
        let screen = to_screen(Pos2::new(10., 20.), &transform, vec2(5., 7.));
        assert_eq!(screen, Pos2::new(10. * 2. - 100. + 5., 20. * 2. + 50. + 7.));
    }
}
