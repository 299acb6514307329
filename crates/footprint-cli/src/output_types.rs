use chrono::{DateTime, Utc};
use footprint_core::models::{FetchProvenance, ResolutionSource, RunResult};
use serde::Serialize;
use tabled::Tabled;

/// Output for calc command and each shell calculation
#[derive(Debug, Serialize)]
pub struct CalcOutput {
    pub location: LocationOutput,
    pub radius: RadiusOutput,
    pub buildings: usize,
    pub area: AreaOutput,
    pub density: DensityOutput,
    pub metadata: RunMetadata,
    pub geojson_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationOutput {
    pub lat: f64,
    pub lon: f64,
    pub resolved_by: ResolutionSource,
}

#[derive(Debug, Serialize)]
pub struct RadiusOutput {
    pub value: f64,
    pub unit: String,
    pub meters: f64,
}

#[derive(Debug, Serialize)]
pub struct AreaOutput {
    pub sq_km: f64,
    pub sq_miles: f64,
}

#[derive(Debug, Serialize)]
pub struct DensityOutput {
    pub per_sq_km: f64,
    pub per_sq_mile: f64,
}

#[derive(Debug, Serialize)]
pub struct RunMetadata {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub retries: u32,
    pub attempts: u32,
    pub queried_at: DateTime<Utc>,
    pub cache_hit: bool,
}

impl From<&FetchProvenance> for RunMetadata {
    fn from(provenance: &FetchProvenance) -> Self {
        Self {
            endpoint: provenance.endpoint.clone(),
            timeout_secs: provenance.timeout_secs,
            retries: provenance.retries,
            attempts: provenance.attempts,
            queried_at: provenance.queried_at,
            cache_hit: provenance.cache_hit,
        }
    }
}

impl CalcOutput {
    pub fn from_run(result: &RunResult, geojson_path: Option<String>) -> Self {
        Self {
            location: LocationOutput {
                lat: result.coordinate.lat(),
                lon: result.coordinate.lon(),
                resolved_by: result.resolution,
            },
            radius: RadiusOutput {
                value: result.radius.magnitude(),
                unit: result.radius.unit().as_str().to_string(),
                meters: result.radius_m,
            },
            buildings: result.building_count(),
            area: AreaOutput {
                sq_km: result.stats.area_sq_km,
                sq_miles: result.stats.area_sq_miles,
            },
            density: DensityOutput {
                per_sq_km: result.stats.per_sq_km,
                per_sq_mile: result.stats.per_sq_mile,
            },
            metadata: RunMetadata::from(&result.provenance),
            geojson_path,
        }
    }
}

/// Row of the mirrors table
#[derive(Debug, Serialize, Tabled)]
pub struct EndpointRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Endpoint")]
    pub endpoint: String,
}

/// Row of the config table
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
