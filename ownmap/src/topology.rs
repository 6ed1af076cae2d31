//! Decoding of country boundaries. Both TopoJSON topologies (as published by `world-atlas`) and
//! plain GeoJSON feature collections are understood.
//! <https://github.com/topojson/topojson-specification>

use std::collections::HashMap;

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("object '{0}' not found in the topology")]
    MissingObject(String),

    #[error("arc {0} is out of range")]
    ArcOutOfRange(i64),

    #[error("position needs at least two coordinates, got {0}")]
    InvalidPosition(usize),
}

/// Country boundary before it gets joined with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub id: Option<String>,
    pub name: Option<String>,
    pub geometry: MultiPolygon,
}

/// Decode a TopoJSON topology, taking features from `object`, or a GeoJSON feature collection
/// (in which case `object` is ignored).
pub fn decode(data: &[u8], object: &str) -> Result<Vec<BoundaryFeature>, DecodeError> {
    match serde_json::from_slice(data)? {
        Document::Topology(topology) => topology.features(object),
        Document::FeatureCollection(collection) => collection.features(),
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Document {
    Topology(Topology),
    FeatureCollection(FeatureCollection),
}

/// Feature id. `world-atlas` uses strings, but numbers are allowed too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Id {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    name: Option<String>,
}

#[derive(Deserialize)]
struct Topology {
    transform: Option<Quantization>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    objects: HashMap<String, TopoGeometry>,
}

#[derive(Deserialize)]
struct Quantization {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Deserialize)]
struct TopoGeometry {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<Id>,
    properties: Option<Properties>,
    arcs: Option<ArcRefs>,
    geometries: Option<Vec<TopoGeometry>>,
}

/// Arc references of a geometry. Their nesting depends on the geometry type.
#[derive(Deserialize)]
#[serde(untagged)]
enum ArcRefs {
    Polygons(Vec<Vec<Vec<i64>>>),
    Rings(Vec<Vec<i64>>),
    Line(Vec<i64>),
}

impl Topology {
    fn features(self, object: &str) -> Result<Vec<BoundaryFeature>, DecodeError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| DecodeError::MissingObject(object.to_owned()))?;

        let arcs = self.decode_arcs()?;

        let geometries = match (&root.kind, &root.geometries) {
            (Some(kind), Some(geometries)) if kind == "GeometryCollection" => {
                geometries.iter().collect()
            }
            _ => vec![root],
        };

        geometries
            .into_iter()
            .map(|geometry| -> Result<_, DecodeError> {
                Ok(BoundaryFeature {
                    id: geometry.id.as_ref().map(id_to_string),
                    name: geometry.properties.as_ref().and_then(|p| p.name.clone()),
                    geometry: geometry_to_multi_polygon(geometry, &arcs)?,
                })
            })
            .collect()
    }

    /// Absolute coordinates of every arc. Quantized topologies store them as deltas from the
    /// previous position of the same arc.
    fn decode_arcs(&self) -> Result<Vec<Vec<Coord>>, DecodeError> {
        self.arcs
            .iter()
            .map(|arc| {
                let mut x = 0.;
                let mut y = 0.;
                arc.iter()
                    .map(|position| -> Result<Coord, DecodeError> {
                        let [px, py] = pair(position)?;
                        Ok(match &self.transform {
                            Some(quantization) => {
                                x += px;
                                y += py;
                                Coord {
                                    x: x * quantization.scale[0] + quantization.translate[0],
                                    y: y * quantization.scale[1] + quantization.translate[1],
                                }
                            }
                            None => Coord { x: px, y: py },
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

fn id_to_string(id: &Id) -> String {
    match id {
        Id::Text(text) => text.clone(),
        Id::Number(number) => number.to_string(),
    }
}

fn pair(position: &[f64]) -> Result<[f64; 2], DecodeError> {
    match position {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(DecodeError::InvalidPosition(position.len())),
    }
}

fn geometry_to_multi_polygon(
    geometry: &TopoGeometry,
    arcs: &[Vec<Coord>],
) -> Result<MultiPolygon, DecodeError> {
    let polygons = match (geometry.kind.as_deref(), &geometry.arcs) {
        (Some("Polygon"), Some(ArcRefs::Rings(rings))) => vec![polygon(rings, arcs)?],
        (Some("MultiPolygon"), Some(ArcRefs::Polygons(polygons))) => polygons
            .iter()
            .map(|rings| polygon(rings, arcs))
            .collect::<Result<_, _>>()?,
        (kind, Some(ArcRefs::Line(line))) => {
            log::debug!(
                "Ignoring line geometry of type {kind:?} made of {} arcs.",
                line.len()
            );
            Vec::new()
        }
        (kind, refs) => {
            if refs.is_some() {
                log::debug!("Ignoring geometry of type {kind:?} with mismatched arcs.");
            }
            Vec::new()
        }
    };
    Ok(MultiPolygon::new(polygons))
}

fn polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord>]) -> Result<Polygon, DecodeError> {
    let mut rings = rings.iter().map(|refs| ring(refs, arcs));
    let exterior = rings
        .next()
        .transpose()?
        .unwrap_or_else(|| LineString::new(Vec::new()));
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Stitch arcs into a ring. Consecutive arcs share their end points, so the shared one is taken
/// only once. Negative references point to the arc `!index`, traversed backwards.
fn ring(refs: &[i64], arcs: &[Vec<Coord>]) -> Result<LineString, DecodeError> {
    let mut coords: Vec<Coord> = Vec::new();
    for &index in refs {
        let reversed = index < 0;
        let arc = usize::try_from(if reversed { !index } else { index })
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(DecodeError::ArcOutOfRange(index))?;

        coords.pop();
        if reversed {
            coords.extend(arc.iter().rev());
        } else {
            coords.extend(arc.iter());
        }
    }
    Ok(LineString::new(coords))
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<GeoFeature>,
}

#[derive(Deserialize)]
struct GeoFeature {
    id: Option<Id>,
    properties: Option<Properties>,
    geometry: Option<GeoGeometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeoGeometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Other,
}

impl FeatureCollection {
    fn features(self) -> Result<Vec<BoundaryFeature>, DecodeError> {
        self.features
            .into_iter()
            .map(|feature| -> Result<_, DecodeError> {
                let polygons = match feature.geometry {
                    Some(GeoGeometry::Polygon { coordinates }) => vec![geo_polygon(&coordinates)?],
                    Some(GeoGeometry::MultiPolygon { coordinates }) => coordinates
                        .iter()
                        .map(|rings| geo_polygon(rings))
                        .collect::<Result<_, _>>()?,
                    Some(GeoGeometry::Other) | None => Vec::new(),
                };

                Ok(BoundaryFeature {
                    id: feature.id.as_ref().map(id_to_string),
                    name: feature.properties.and_then(|p| p.name),
                    geometry: MultiPolygon::new(polygons),
                })
            })
            .collect()
    }
}

fn geo_polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon, DecodeError> {
    let mut rings = rings.iter().map(|ring| {
        ring.iter()
            .map(|position| pair(position).map(|[x, y]| Coord { x, y }))
            .collect::<Result<Vec<_>, _>>()
            .map(LineString::new)
    });
    let exterior = rings
        .next()
        .transpose()?
        .unwrap_or_else(|| LineString::new(Vec::new()));
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    /// Two squares sharing an edge: `A` spans `[0, 1]` and `B` spans `[1, 2]` in longitude. The
    /// shared edge is arc 0, referenced backwards by `B`.
    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "arcs": [
            [[1, 0], [1, 1]],
            [[1, 1], [0, 1], [0, 0], [1, 0]],
            [[1, 0], [2, 0], [2, 1], [1, 1]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "A", "properties": {"name": "Alpha"}, "arcs": [[0, 1]]},
                    {"type": "MultiPolygon", "id": 2, "arcs": [[[2, -1]]]},
                    {"type": null, "id": "N"}
                ]
            }
        }
    }"#;

    #[test]
    fn decoding_plain_topology() {
        let features = decode(TOPOLOGY.as_bytes(), "countries").unwrap();
        assert_eq!(features.len(), 3);

        assert_eq!(features[0].id.as_deref(), Some("A"));
        assert_eq!(features[0].name.as_deref(), Some("Alpha"));
        let exterior: Vec<_> = features[0].geometry.0[0].exterior().coords().copied().collect();
        assert_eq!(
            exterior,
            vec![
                coord! { x: 1., y: 0. },
                coord! { x: 1., y: 1. },
                coord! { x: 0., y: 1. },
                coord! { x: 0., y: 0. },
                coord! { x: 1., y: 0. },
            ]
        );

        // Numeric id, no name, reversed arc.
        assert_eq!(features[1].id.as_deref(), Some("2"));
        assert_eq!(features[1].name, None);
        let exterior: Vec<_> = features[1].geometry.0[0].exterior().coords().copied().collect();
        assert_eq!(
            exterior,
            vec![
                coord! { x: 1., y: 0. },
                coord! { x: 2., y: 0. },
                coord! { x: 2., y: 1. },
                coord! { x: 1., y: 1. },
                coord! { x: 1., y: 0. },
            ]
        );

        // Null geometry keeps its id, but has no shape.
        assert_eq!(features[2].id.as_deref(), Some("N"));
        assert!(features[2].geometry.0.is_empty());
    }

    #[test]
    fn decoding_quantized_topology() {
        let topology = r#"{
            "type": "Topology",
            "transform": {"scale": [0.5, 0.25], "translate": [-10, 20]},
            "arcs": [[[0, 0], [4, 0], [0, 4], [-4, 0], [0, -4]]],
            "objects": {
                "land": {"type": "Polygon", "id": "L", "arcs": [[0]]}
            }
        }"#;

        let features = decode(topology.as_bytes(), "land").unwrap();
        let exterior: Vec<_> = features[0].geometry.0[0].exterior().coords().copied().collect();
        assert_eq!(
            exterior,
            vec![
                coord! { x: -10., y: 20. },
                coord! { x: -8., y: 20. },
                coord! { x: -8., y: 21. },
                coord! { x: -10., y: 21. },
                coord! { x: -10., y: 20. },
            ]
        );
    }

    #[test]
    fn polygon_holes_are_kept() {
        let topology = r#"{
            "type": "Topology",
            "arcs": [
                [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                [[4, 4], [4, 6], [6, 6], [6, 4], [4, 4]]
            ],
            "objects": {"countries": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "id": "H", "arcs": [[0], [1]]}
            ]}}
        }"#;

        let features = decode(topology.as_bytes(), "countries").unwrap();
        assert_eq!(features[0].geometry.0[0].interiors().len(), 1);
    }

    #[test]
    fn line_geometries_have_no_shape() {
        let topology = r#"{
            "type": "Topology",
            "arcs": [[[0, 0], [1, 1]], [[1, 1], [2, 0]]],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        {"type": "LineString", "id": "L", "arcs": [0, -2]},
                        {"type": "MultiLineString", "id": "M", "arcs": [[0], [1]]}
                    ]
                }
            }
        }"#;

        let features = decode(topology.as_bytes(), "countries").unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id.as_deref(), Some("L"));
        assert!(features[0].geometry.0.is_empty());
        assert!(features[1].geometry.0.is_empty());
    }

    #[test]
    fn missing_object_is_an_error() {
        let error = decode(TOPOLOGY.as_bytes(), "land").unwrap_err();
        assert!(matches!(error, DecodeError::MissingObject(name) if name == "land"));
    }

    #[test]
    fn arc_out_of_range_is_an_error() {
        let topology = r#"{
            "type": "Topology",
            "arcs": [[[0, 0], [1, 1]]],
            "objects": {"countries": {"type": "Polygon", "arcs": [[0, 5]]}}
        }"#;

        let error = decode(topology.as_bytes(), "countries").unwrap_err();
        assert!(matches!(error, DecodeError::ArcOutOfRange(5)));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(
            decode(b"<html>not found</html>", "countries"),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            decode(br#"{"type": "Feature"}"#, "countries"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn decoding_geojson() {
        let collection = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": "SQ",
                    "properties": {"name": "Square", "population": 12},
                    "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]}
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "MultiPolygon", "coordinates": [
                        [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                        [[[5, 5], [6, 5], [6, 6], [5, 5]]]
                    ]}
                },
                {
                    "type": "Feature",
                    "id": "P",
                    "properties": null,
                    "geometry": {"type": "Point", "coordinates": [3, 3]}
                }
            ]
        }"#;

        let features = decode(collection.as_bytes(), "ignored").unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].id.as_deref(), Some("SQ"));
        assert_eq!(features[0].name.as_deref(), Some("Square"));
        assert_eq!(features[1].id, None);
        assert_eq!(features[1].geometry.0.len(), 2);
        assert!(features[2].geometry.0.is_empty());
    }
}
