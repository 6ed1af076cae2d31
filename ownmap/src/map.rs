use std::time::Duration;

use egui::{Pos2, Rect, Response, Sense, Ui, Widget};

use crate::{
    mercator::Viewport,
    position::Pixels,
    render::{self, MapStyle},
    session::MapSession,
};

/// The actual map widget. Instances are to be created on each frame, as all necessary state is
/// stored in [`MapSession`].
///
/// # Examples
///
/// ```
/// # use ownmap::{Map, MapSession};
///
/// fn update(ui: &mut egui::Ui, session: &mut MapSession) {
///     ui.add(Map::new(session));
/// }
/// ```
pub struct Map<'a> {
    session: &'a mut MapSession,
    style: MapStyle,
}

impl<'a> Map<'a> {
    pub fn new(session: &'a mut MapSession) -> Self {
        Self {
            session,
            style: MapStyle::default(),
        }
    }

    /// Paint the map with custom colors instead of [`MapStyle::default`].
    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }
}

/// Point relative to the top left corner of the map area.
fn local(pos: Pos2, rect: Rect) -> Pixels {
    let local = pos - rect.min;
    Pixels::new(local.x as f64, local.y as f64)
}

/// How much the scale changes per one point of scrolling. Tuned to feel like browser maps.
const SCROLL_SENSITIVITY: f32 = 0.002;

impl Map<'_> {
    /// Handle zoom and drag inputs.
    fn zoom_and_drag(&mut self, ui: &mut Ui, response: &Response) {
        let zoom_delta = ui.input(|input| input.zoom_delta());
        let scroll_delta = ui.input(|input| input.smooth_scroll_delta.y);

        // Pinch and ctrl+scroll come as zoom delta, plain mouse wheel as scroll delta.
        let factor = if !(0.99..=1.01).contains(&zoom_delta) {
            zoom_delta
        } else {
            (scroll_delta * SCROLL_SENSITIVITY).exp2()
        };

        // Zooming and dragging need to be exclusive, otherwise the map will get dragged when
        // pinch gesture is used.
        if factor != 1. && ui.ui_contains_pointer() {
            if let Some(pos) = response.hover_pos() {
                self.session.scroll(factor as f64, local(pos, response.rect));
            }
        } else if response.dragged() {
            self.session.drag(response.drag_delta());
        }
    }

    fn hover_and_click(&mut self, response: &Response) {
        let hovered = response
            .hover_pos()
            .map(|pos| local(pos, response.rect));
        self.session.hover_at(hovered);

        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            self.session.select_at(local(pos, response.rect));
        }
    }
}

impl Widget for Map<'_> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        self.session.resize(Viewport::from(rect.size()));

        let delta_time = ui.input(|input| input.stable_dt);
        self.session
            .update(Duration::from_secs_f32(delta_time.max(0.)));

        self.zoom_and_drag(ui, &response);
        self.hover_and_click(&response);

        let painter = ui.painter().with_clip_rect(rect);
        render::draw(&painter, self.session, &self.style);

        if self.session.animating() {
            log::trace!("Map is animating, requesting repaint.");
            ui.ctx().request_repaint();
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_relative_to_the_map_area() {
        let rect = Rect::from_min_size(Pos2::new(10., 20.), egui::vec2(100., 100.));
        let point = local(Pos2::new(15., 60.), rect);
        assert_eq!(point, Pixels::new(5., 40.));
    }
}
