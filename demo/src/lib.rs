mod windows;

use std::sync::Arc;

use egui::Context;
use ownmap::{
    LoadState, Map, MapOptions, MapSession, ResourceFetch, Sources, Viewport, WorldLoader,
};

pub struct OwnMapApp {
    loader: WorldLoader,
    options: MapOptions,
    session: Option<MapSession>,

    /// Set if the map could not be shown even though the data is there.
    failure: Option<String>,
}

impl OwnMapApp {
    pub fn new(egui_ctx: Context, sources: Sources, options: MapOptions) -> Self {
        Self {
            loader: WorldLoader::spawn(ResourceFetch::default(), sources, egui_ctx),
            options,
            session: None,
            failure: None,
        }
    }

    /// Show the state of loading, and start the session once the data is there.
    fn waiting(&mut self, ui: &mut egui::Ui) {
        if let Some(failure) = &self.failure {
            windows::failure(ui, failure);
            return;
        }

        match self.loader.poll() {
            LoadState::Loading => windows::loading(ui),
            LoadState::Failed(err) => windows::failure(ui, &err.to_string()),
            LoadState::Loaded(world) => {
                let world = Arc::clone(world);
                let viewport = Viewport::from(ui.available_size());
                match MapSession::new(world, viewport, self.options.clone()) {
                    Ok(session) => self.session = Some(session),
                    Err(err) => {
                        log::error!("Cannot show the map: {err}.");
                        self.failure = Some(err.to_string());
                    }
                }
                ui.ctx().request_repaint();
            }
        }
    }
}

impl eframe::App for OwnMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if let Some(session) = &mut self.session {
            egui::TopBottomPanel::top("controls").show(ctx, |ui| {
                windows::controls(ui, session);
            });
        }

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| match &mut self.session {
                Some(session) => {
                    ui.add(Map::new(session));
                }
                None => self.waiting(ui),
            });
    }
}
