use geo_types::Coord;
use serde::Serialize;
use serde_json::json;

use crate::journey::JourneyStore;

/// GeoJSON positions are `[lng, lat]`.
fn position(coord: &Coord) -> [f64; 2] {
    [coord.x, coord.y]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    pub properties: serde_json::Value,
    pub geometry: Geometry,
}

impl Feature {
    pub fn point(coord: &Coord) -> Self {
        Self {
            kind: "Feature",
            properties: json!({}),
            geometry: Geometry::Point {
                coordinates: position(coord),
            },
        }
    }

    /// A two-point path from start to end.
    pub fn line(start: &Coord, end: &Coord) -> Self {
        Self {
            kind: "Feature",
            properties: json!({}),
            geometry: Geometry::LineString {
                coordinates: vec![position(start), position(end)],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }
}

/// Converts the collection into style-independent drawing primitives: a point
/// per resolved endpoint and a line per fully-resolved journey, in insertion
/// order. Coincident points are kept as-is; the overlap is what feeds the heat
/// layer.
pub fn feature_collection(store: &JourneyStore) -> FeatureCollection {
    let mut features = Vec::new();
    for journey in store.iter() {
        if let Some(start) = &journey.start_coords {
            features.push(Feature::point(start));
        }
        if let Some(end) = &journey.end_coords {
            features.push(Feature::point(end));
        }
        if let (Some(start), Some(end)) = (&journey.start_coords, &journey.end_coords) {
            features.push(Feature::line(start, end));
        }
    }
    FeatureCollection::new(features)
}
