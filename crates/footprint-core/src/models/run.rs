use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{FootprintError, Result};

use super::{BuildingPolygon, Coordinate, RadiusSpec, ResolutionSource};

/// Area of the search circle and building density over it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityStats {
    pub area_sq_km: f64,
    pub area_sq_miles: f64,
    pub per_sq_km: f64,
    pub per_sq_mile: f64,
}

impl DensityStats {
    /// Zero area and zero density
    pub fn zero() -> Self {
        Self { area_sq_km: 0.0, area_sq_miles: 0.0, per_sq_km: 0.0, per_sq_mile: 0.0 }
    }
}

/// Where the raw features of a run came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchProvenance {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub retries: u32,
    /// Attempts made for this run; 0 on a cache hit
    pub attempts: u32,
    pub queried_at: DateTime<Utc>,
    pub cache_hit: bool,
}

/// Everything the presentation layer needs to render one calculation
#[derive(Debug, Clone)]
pub struct RunResult {
    pub coordinate: Coordinate,
    pub resolution: ResolutionSource,
    pub radius: RadiusSpec,
    pub radius_m: f64,
    pub polygons: Vec<BuildingPolygon>,
    pub stats: DensityStats,
    pub provenance: FetchProvenance,
}

impl RunResult {
    /// Buildings found; always the number of surviving polygons
    pub fn building_count(&self) -> usize {
        self.polygons.len()
    }

    /// Polygons as a GeoJSON feature collection
    pub fn to_feature_collection(&self) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: self.polygons.iter().map(BuildingPolygon::to_geojson_feature).collect(),
            foreign_members: None,
        }
    }

    /// Write the polygons to `path` as a GeoJSON FeatureCollection
    pub fn write_geojson(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_feature_collection())
            .map_err(|e| FootprintError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }
}
