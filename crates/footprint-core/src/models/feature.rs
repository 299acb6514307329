use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Overpass element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Way,
    Relation,
    Other,
}

impl FeatureKind {
    fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("way") => FeatureKind::Way,
            Some("relation") => FeatureKind::Relation,
            _ => FeatureKind::Other,
        }
    }

    /// Only ways and relations can describe a building outline
    pub fn is_areal(&self) -> bool {
        matches!(self, FeatureKind::Way | FeatureKind::Relation)
    }
}

/// One element returned by the geodata service.
///
/// The ring holds `[lon, lat]` pairs in service order. It is empty when the
/// element carried no geometry or any point was malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    pub kind: FeatureKind,
    pub id: Option<i64>,
    pub tags: BTreeMap<String, String>,
    pub ring: Vec<[f64; 2]>,
}

impl RawFeature {
    pub fn new(kind: FeatureKind, ring: Vec<[f64; 2]>) -> Self {
        Self { kind, id: None, tags: BTreeMap::new(), ring }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Read an Overpass `out geom` element without failing on bad input
    pub fn from_overpass(element: &Value) -> Self {
        let kind = FeatureKind::from_tag(element.get("type").and_then(Value::as_str));
        let id = element.get("id").and_then(Value::as_i64);

        let tags = element
            .get("tags")
            .and_then(Value::as_object)
            .map(|tags| {
                tags.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let ring = element
            .get("geometry")
            .and_then(Value::as_array)
            .and_then(|points| points.iter().map(read_point).collect::<Option<Vec<_>>>())
            .unwrap_or_default();

        Self { kind, id, tags, ring }
    }
}

fn read_point(point: &Value) -> Option<[f64; 2]> {
    let lon = point.get("lon")?.as_f64()?;
    let lat = point.get("lat")?.as_f64()?;
    Some([lon, lat])
}

/// Raw features retrieved for one cache key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    pub features: Vec<RawFeature>,
    pub retrieved_at: DateTime<Utc>,
    pub cache_hit: bool,
    /// Attempts the fetcher needed; 0 when served from cache
    pub attempts: u32,
}

impl FetchResult {
    pub fn fresh(features: Vec<RawFeature>, attempts: u32) -> Self {
        Self { features, retrieved_at: Utc::now(), cache_hit: false, attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_overpass_way() {
        let element = json!({
            "type": "way",
            "id": 42,
            "tags": {"building": "yes", "levels": 3},
            "geometry": [
                {"lat": 1.0, "lon": 2.0},
                {"lat": 1.5, "lon": 2.5}
            ]
        });

        let feature = RawFeature::from_overpass(&element);
        assert_eq!(feature.kind, FeatureKind::Way);
        assert_eq!(feature.id, Some(42));
        assert_eq!(feature.tags.get("building").map(String::as_str), Some("yes"));
        // Non-string tag values are skipped
        assert!(!feature.tags.contains_key("levels"));
        assert_eq!(feature.ring, vec![[2.0, 1.0], [2.5, 1.5]]);
    }

    #[test]
    fn test_from_overpass_missing_geometry() {
        let element = json!({"type": "relation", "id": 7, "members": []});
        let feature = RawFeature::from_overpass(&element);
        assert_eq!(feature.kind, FeatureKind::Relation);
        assert!(feature.ring.is_empty());
    }

    #[test]
    fn test_from_overpass_malformed_point_empties_ring() {
        let element = json!({
            "type": "way",
            "geometry": [{"lat": 1.0, "lon": 2.0}, {"lat": "x"}]
        });
        assert!(RawFeature::from_overpass(&element).ring.is_empty());
    }

    #[test]
    fn test_unknown_type_is_other() {
        let feature = RawFeature::from_overpass(&json!({"type": "node"}));
        assert_eq!(feature.kind, FeatureKind::Other);
        assert!(!feature.kind.is_areal());

        let feature = RawFeature::from_overpass(&json!("not an object"));
        assert_eq!(feature.kind, FeatureKind::Other);
    }
}
