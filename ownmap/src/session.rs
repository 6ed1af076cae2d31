use std::{sync::Arc, time::Duration};

use crate::{
    camera::Camera,
    mercator::{Projection, Viewport},
    options::{InvalidOptions, MapOptions},
    position::{Pixels, Position},
    render::Highlight,
    shapes::ProjectedWorld,
    tiling::{self, TilePlan},
    transform::CameraTransform,
    world::WorldData,
};

/// State of a single map on the screen: the loaded world, the camera looking at it and what the
/// user has selected. It must persist between frames.
///
/// Screen coordinates taken and returned by the session are relative to the top left corner
/// of the map area.
pub struct MapSession {
    options: MapOptions,
    world: Arc<WorldData>,
    shapes: ProjectedWorld,
    camera: Camera,
    selected: Option<String>,
    hovered: Option<String>,
    status: String,
}

impl MapSession {
    pub fn new(
        world: Arc<WorldData>,
        viewport: Viewport,
        options: MapOptions,
    ) -> Result<Self, InvalidOptions> {
        options.validate()?;

        let projection = Projection::for_viewport(viewport, options.scale_divisor);
        let shapes = ProjectedWorld::new(world.features(), projection);
        let camera = Camera::new(viewport, options.scale_extent);

        Ok(Self {
            options,
            world,
            shapes,
            camera,
            selected: None,
            hovered: None,
            status: String::new(),
        })
    }

    /// Adapt to a new size of the map area. Shapes are projected again, because the base scale
    /// follows the viewport width.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.camera.viewport() {
            return;
        }

        // Collapsed map area, e.g. while the window is minimized.
        if viewport.width < 1. || viewport.height < 1. {
            return;
        }

        log::debug!("Map resized to {}x{}.", viewport.width, viewport.height);
        let projection = Projection::for_viewport(viewport, self.options.scale_divisor);
        self.shapes = ProjectedWorld::new(self.world.features(), projection);
        self.camera.set_viewport(viewport);
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn world(&self) -> &Arc<WorldData> {
        &self.world
    }

    pub fn shapes(&self) -> &ProjectedWorld {
        &self.shapes
    }

    pub fn projection(&self) -> &Projection {
        self.shapes.projection()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn transform(&self) -> CameraTransform {
        self.camera.transform()
    }

    /// Copies of the world which are visible with the current transform.
    pub fn plan(&self) -> TilePlan {
        tiling::plan(
            self.camera.transform(),
            self.projection(),
            self.options.tiling_margin,
        )
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.camera.zoom_by(factor);
    }

    pub fn zoom_in(&mut self) {
        let k = self.camera.transform().k * self.options.zoom_step;
        self.camera.zoom_to(k, self.options.zoom_duration);
    }

    pub fn zoom_out(&mut self) {
        let k = self.camera.transform().k / self.options.zoom_step;
        self.camera.zoom_to(k, self.options.zoom_duration);
    }

    /// Go back to the whole world and forget the selection.
    pub fn reset_view(&mut self) {
        self.selected = None;
        self.status.clear();
        self.camera.reset(self.options.reset_duration);
    }

    /// Put `position` in the middle of the map at scale `zoom`.
    pub fn fly_to(&mut self, position: Position, zoom: f64) {
        let point = self.projection().project(position);
        self.camera.fly_to(point, zoom, self.options.fly_duration);
    }

    /// Select a country from the country table and fly to it. Unknown codes and countries
    /// without coordinates are ignored.
    pub fn select_by_code(&mut self, code: &str) {
        let Some(country) = self.world.country(code) else {
            log::debug!("No country with code '{code}'.");
            return;
        };

        let Some(position) = country.position() else {
            log::debug!("Country '{code}' has no coordinates.");
            return;
        };

        let zoom = country
            .preferred_zoom()
            .unwrap_or(self.options.default_country_zoom);
        let status = format!("{} - Zoom Level: {zoom}", country.display_name());

        self.selected = Some(code.to_owned());
        self.status = status;
        self.fly_to(position, zoom);
    }

    /// Select the country under `screen`, if there is one.
    pub fn select_at(&mut self, screen: Pixels) {
        if let Some(code) = self.country_at(screen) {
            self.select_by_code(&code);
        }
    }

    /// Track the pointer. `None` means that it left the map.
    pub fn hover_at(&mut self, screen: Option<Pixels>) {
        self.hovered = screen.and_then(|screen| self.country_at(screen));
    }

    fn country_at(&self, screen: Pixels) -> Option<String> {
        self.shapes
            .hit_test_plan(&self.plan(), screen)
            .map(|(_, shape)| shape.code.clone())
    }

    pub fn drag(&mut self, delta: egui::Vec2) {
        self.camera.drag(delta);
    }

    /// Zoom by `factor`, keeping the point under `anchor` in place.
    pub fn scroll(&mut self, factor: f64, anchor: Pixels) {
        self.camera.scroll(factor, anchor);
    }

    /// Advance animations. Returns `true` if the map needs to be drawn again.
    pub fn update(&mut self, delta_time: Duration) -> bool {
        self.camera.update(delta_time)
    }

    pub fn animating(&self) -> bool {
        self.camera.animating()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Current scale, formatted for the user.
    pub fn zoom_label(&self) -> String {
        format!("{:.1}", self.camera.transform().k)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn highlight(&self, code: &str) -> Highlight {
        Highlight::of(code, self.selected(), self.hovered())
    }
}
