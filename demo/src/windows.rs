use std::sync::Arc;

use egui::{ComboBox, RichText, Ui};
use ownmap::{Country, MapSession};

pub fn loading(ui: &mut Ui) {
    ui.centered_and_justified(|ui| {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading map...");
        });
    });
}

pub fn failure(ui: &mut Ui, reason: &str) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Error: Failed to load map data").heading());
            ui.label(RichText::new(reason).small().weak());
        });
    });
}

/// Zoom buttons, current zoom, country selector and status.
pub fn controls(ui: &mut Ui, session: &mut MapSession) {
    ui.horizontal(|ui| {
        if ui.button("Zoom In").clicked() {
            session.zoom_in();
        }

        if ui.button("Zoom Out").clicked() {
            session.zoom_out();
        }

        if ui.button("Reset View").clicked() {
            session.reset_view();
        }

        ui.separator();
        ui.label(format!("Current Zoom: {}", session.zoom_label()));
        ui.separator();

        country_selector(ui, session);

        if !session.status().is_empty() {
            ui.separator();
            ui.label(session.status());
        }
    });
}

fn country_selector(ui: &mut Ui, session: &mut MapSession) {
    let world = Arc::clone(session.world());
    let default_zoom = session.options().default_country_zoom;

    let selected_text = session
        .selected()
        .and_then(|code| world.country(code))
        .map_or("Select a country...", Country::display_name);

    let mut choice = None;

    ComboBox::from_id_salt("country")
        .selected_text(selected_text)
        .width(220.)
        .show_ui(ui, |ui| {
            for country in world.selectable_countries() {
                let zoom = country.preferred_zoom().unwrap_or(default_zoom);
                let label = format!("{} (Zoom: {zoom})", country.display_name());
                let selected = session.selected() == Some(country.code.as_str());
                if ui.selectable_label(selected, label).clicked() {
                    choice = Some(country.code.clone());
                }
            }
        });

    if let Some(code) = choice {
        session.select_by_code(&code);
    }
}
