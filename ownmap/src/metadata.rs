//! Table of countries with their names, representative coordinates and preferred zoom levels.

use serde::Deserialize;

use crate::position::{Position, is_valid, lat_lon};

/// Single row of the country table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Country {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub population: Option<f64>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    /// Zoom at which the whole country is nicely visible.
    #[serde(default, alias = "zoomLevel")]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub states: Vec<serde_json::Value>,
}

impl Country {
    /// Name to show to the user. Falls back to the code.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }

    /// Zoom to fly to the country with. Zero, negative and non-finite zooms count as missing.
    pub fn preferred_zoom(&self) -> Option<f64> {
        self.zoom.filter(|zoom| zoom.is_finite() && *zoom > 0.)
    }

    /// Position of the country, if both coordinates are present and finite.
    pub fn position(&self) -> Option<Position> {
        let position = lat_lon(self.latitude?, self.longitude?);
        is_valid(position).then_some(position)
    }
}

#[derive(Deserialize)]
struct Table {
    countries: Vec<serde_json::Value>,
}

/// Decode the country table. Rows which cannot be understood are skipped, so that a single
/// broken entry does not take the whole map down.
pub fn decode(data: &[u8]) -> Result<Vec<Country>, serde_json::Error> {
    let table: Table = serde_json::from_slice(data)?;
    Ok(table
        .countries
        .into_iter()
        .enumerate()
        .filter_map(|(row, value)| match serde_json::from_value(value) {
            Ok(country) => Some(country),
            Err(err) => {
                log::warn!("Skipping country row {row}: {err}.");
                None
            }
        })
        .collect())
}
