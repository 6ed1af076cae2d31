use std::collections::HashMap;

use geo::Centroid as _;
use geo_types::MultiPolygon;

pub use crate::metadata::Country;
use crate::{position::Position, topology::BoundaryFeature};

/// Country boundary joined with its row from the country table.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    /// Identifier shared by the boundary and the country table.
    pub code: String,
    pub name: String,
    pub geometry: MultiPolygon,
    /// Coordinates from the country table if they are valid, geographic centroid of the
    /// boundary otherwise.
    pub centroid: Option<Position>,
    pub preferred_zoom: Option<f64>,
    pub info: Option<Country>,
}

/// Everything needed to draw the world. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct WorldData {
    features: Vec<CountryFeature>,
    countries: Vec<Country>,

    /// Country code to an index within `countries`.
    index: HashMap<String, usize>,
}

impl WorldData {
    /// Join boundaries with the country table by their codes. Boundaries without a matching row
    /// are kept, but use the name from the boundary itself, or their code.
    pub fn new(boundaries: Vec<BoundaryFeature>, countries: Vec<Country>) -> Self {
        let mut index = HashMap::with_capacity(countries.len());
        for (i, country) in countries.iter().enumerate() {
            if index.contains_key(&country.code) {
                log::debug!("Duplicated country code '{}'.", country.code);
            } else {
                index.insert(country.code.clone(), i);
            }
        }

        let features = boundaries
            .into_iter()
            .map(|boundary| {
                let code = boundary.id.unwrap_or_default();
                let info = index.get(&code).map(|&i| countries[i].clone());

                let name = info
                    .as_ref()
                    .and_then(|country| country.name.clone())
                    .or(boundary.name)
                    .unwrap_or_else(|| code.clone());

                let centroid = info
                    .as_ref()
                    .and_then(Country::position)
                    .or_else(|| boundary.geometry.centroid());

                let preferred_zoom = info.as_ref().and_then(Country::preferred_zoom);

                CountryFeature {
                    code,
                    name,
                    geometry: boundary.geometry,
                    centroid,
                    preferred_zoom,
                    info,
                }
            })
            .collect();

        Self {
            features,
            countries,
            index,
        }
    }

    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Look a country up in the country table.
    pub fn country(&self, code: &str) -> Option<&Country> {
        self.index.get(code).map(|&i| &self.countries[i])
    }

    /// Countries which can be flown to, sorted by their names.
    pub fn selectable_countries(&self) -> Vec<&Country> {
        let mut countries: Vec<_> = self
            .countries
            .iter()
            .filter(|country| country.position().is_some())
            .collect();
        countries.sort_by(|a, b| a.display_name().cmp(b.display_name()));
        countries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::lat_lon;
    use approx::assert_relative_eq;
    use geo_types::polygon;

    fn square(id: Option<&str>, name: Option<&str>, x: f64) -> BoundaryFeature {
        BoundaryFeature {
            id: id.map(str::to_owned),
            name: name.map(str::to_owned),
            geometry: MultiPolygon::new(vec![polygon![
                (x: x, y: 0.),
                (x: x + 2., y: 0.),
                (x: x + 2., y: 2.),
                (x: x, y: 2.),
            ]]),
        }
    }

    fn country(
        code: &str,
        name: &str,
        position: Option<(f64, f64)>,
        zoom: Option<f64>,
    ) -> Country {
        Country {
            code: code.to_owned(),
            name: Some(name.to_owned()),
            latitude: position.map(|(lat, _)| lat),
            longitude: position.map(|(_, lon)| lon),
            area: None,
            population: None,
            region: None,
            subregion: None,
            zoom,
            states: Vec::new(),
        }
    }

    #[test]
    fn joining_boundaries_with_countries() {
        let world = WorldData::new(
            vec![
                square(Some("FR"), Some("france"), 0.),
                square(Some("250"), Some("Somewhere"), 10.),
                square(None, None, 20.),
            ],
            vec![
                country("FR", "France", Some((46.2276, 2.2137)), Some(5.)),
                country("DE", "Germany", None, None),
            ],
        );

        let features = world.features();
        assert_eq!(features.len(), 3);

        assert_eq!(features[0].name, "France");
        assert_eq!(features[0].centroid, Some(lat_lon(46.2276, 2.2137)));
        assert_eq!(features[0].preferred_zoom, Some(5.));
        assert!(features[0].info.is_some());

        // No row in the table, so the boundary name and the geographic centroid are used.
        assert_eq!(features[1].name, "Somewhere");
        let centroid = features[1].centroid.unwrap();
        assert_relative_eq!(centroid.x(), 11.);
        assert_relative_eq!(centroid.y(), 1.);
        assert_eq!(features[1].preferred_zoom, None);
        assert_eq!(features[1].info, None);

        assert_eq!(features[2].code, "");
        assert_eq!(features[2].name, "");
    }

    #[test]
    fn country_index() {
        let world = WorldData::new(
            Vec::new(),
            vec![
                country("FR", "France", Some((46.2276, 2.2137)), Some(5.)),
                country("FR", "Duplicate", None, None),
            ],
        );

        assert_eq!(world.country("FR").map(Country::display_name), Some("France"));
        assert_eq!(world.country("ZZ"), None);
        assert_eq!(world.countries().len(), 2);
    }

    #[test]
    fn only_countries_with_coordinates_are_selectable() {
        let world = WorldData::new(
            Vec::new(),
            vec![
                country("PL", "Poland", Some((51.9, 19.1)), Some(5.)),
                country("AQ", "Antarctica", None, None),
                country("AT", "Austria", Some((47.5, 14.5)), None),
                country("NN", "NaNland", Some((f64::NAN, 1.)), None),
            ],
        );

        let names: Vec<_> = world
            .selectable_countries()
            .into_iter()
            .map(Country::display_name)
            .collect();
        assert_eq!(names, vec!["Austria", "Poland"]);
    }
}
