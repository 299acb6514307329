//! Building outline polygons.
//!
//! A [`BuildingPolygon`] can only be built from a ring that survives every
//! check below, so any value of this type is closed, valid and has positive
//! planar area.

use geo::{Area, Coord, LineString, Polygon, Validation};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Why a ring did not become a polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonRejection {
    /// The ring contains NaN or infinite coordinates
    NonFinite,
    /// Fewer than three distinct vertices
    TooFewPoints { distinct: usize },
    /// Planar area is zero (collinear or cancelling rings)
    ZeroArea,
    /// The closed ring is not a valid polygon, usually self-intersecting
    Invalid,
}

impl fmt::Display for PolygonRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonRejection::NonFinite => f.write_str("non-finite coordinates"),
            PolygonRejection::TooFewPoints { distinct } => {
                write!(f, "only {} distinct point(s), need at least 3", distinct)
            }
            PolygonRejection::ZeroArea => f.write_str("zero area"),
            PolygonRejection::Invalid => f.write_str("invalid ring (self-intersecting)"),
        }
    }
}

/// Closed building outline in lon/lat
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingPolygon {
    id: Option<i64>,
    tags: BTreeMap<String, String>,
    polygon: Polygon<f64>,
}

impl BuildingPolygon {
    /// Build a polygon from a `[lon, lat]` ring, closing it when needed
    pub fn from_ring(ring: &[[f64; 2]]) -> Result<Self, PolygonRejection> {
        if ring.iter().any(|[x, y]| !x.is_finite() || !y.is_finite()) {
            return Err(PolygonRejection::NonFinite);
        }

        let distinct = count_distinct(ring);
        if distinct < 3 {
            return Err(PolygonRejection::TooFewPoints { distinct });
        }

        let mut coords: Vec<Coord<f64>> = ring.iter().map(|&[x, y]| Coord { x, y }).collect();
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }

        let polygon = Polygon::new(LineString::from(coords), vec![]);

        let area = polygon.unsigned_area();
        if area <= 0.0 {
            return Err(PolygonRejection::ZeroArea);
        }
        if !polygon.is_valid() {
            return Err(PolygonRejection::Invalid);
        }

        Ok(Self { id: None, tags: BTreeMap::new(), polygon })
    }

    pub fn with_id(mut self, id: Option<i64>) -> Self {
        self.id = id;
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Closed exterior ring as `[lon, lat]` pairs; first equals last
    pub fn exterior(&self) -> Vec<[f64; 2]> {
        self.polygon.exterior().coords().map(|c| [c.x, c.y]).collect()
    }

    /// Planar area in squared degrees
    pub fn planar_area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    /// GeoJSON feature carrying the OSM id and tags as properties
    pub fn to_geojson_feature(&self) -> geojson::Feature {
        let mut properties = geojson::JsonObject::new();
        if let Some(id) = self.id {
            properties.insert("id".to_string(), serde_json::Value::from(id));
        }
        for (key, value) in &self.tags {
            properties.insert(key.clone(), serde_json::Value::from(value.as_str()));
        }

        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&self.polygon))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

fn count_distinct(ring: &[[f64; 2]]) -> usize {
    ring.iter()
        .map(|[x, y]| (x.to_bits(), y.to_bits()))
        .collect::<HashSet<_>>()
        .len()
}
