//! Command implementations

mod calc;
mod config;
mod mirrors;
mod shell;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use crate::output_types::CalcOutput;
use anyhow::{Context, Result};
use footprint_core::config::LayeredConfig;
use footprint_core::models::{ResolutionSource, RunResult};
use footprint_core::pipeline::{EndpointPolicy, Pipeline};
use footprint_osm::{NominatimGeocoder, OverpassClient};
use std::path::Path;

/// Pipeline wired to the live OpenStreetMap services
pub type OsmPipeline = Pipeline<NominatimGeocoder, OverpassClient>;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Calc(args) => calc::execute(args, config_file, &output).await,
        Commands::Shell(args) => shell::execute(args, config_file, &output).await,
        Commands::Mirrors => mirrors::execute(config_file, &output),
        Commands::Config => config::execute(config_file, &output),
    }
}

/// Build the pipeline from the effective configuration
pub fn build_pipeline(config: &LayeredConfig) -> Result<OsmPipeline> {
    let user_agent = config.user_agent.value.as_str();
    let geocoder = NominatimGeocoder::new(config.geocoder_url.value.clone(), user_agent)?;
    let transport = OverpassClient::new(user_agent)?;

    Ok(Pipeline::new(geocoder, transport)
        .with_radius_bounds(config.radius_min.value, config.radius_max.value))
}

pub fn endpoint_policy(rotate: bool) -> EndpointPolicy {
    if rotate {
        EndpointPolicy::Rotate
    } else {
        EndpointPolicy::PrimaryOnly
    }
}

/// Write the polygons of a run as a GeoJSON FeatureCollection
pub fn export_geojson(result: &RunResult, path: &Path) -> Result<()> {
    result
        .write_geojson(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Render one calculation like the results card
pub fn render_result(
    result: &RunResult,
    geojson_path: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    if output.is_json() {
        return output.result(CalcOutput::from_run(
            result,
            geojson_path.map(|p| p.display().to_string()),
        ));
    }

    if result.resolution == ResolutionSource::LastKnown {
        output.warning(format!(
            "Location could not be resolved; using the previous center {}",
            result.coordinate
        ));
    }

    let stats = &result.stats;
    let unit = result.radius.unit();

    output.section("Results");
    output.kv("Center", format!("{} ({})", result.coordinate, result.resolution));
    output.kv("Radius", format!("{} {}", result.radius.magnitude(), unit.abbreviation()));
    output.kv("Buildings found", result.building_count());
    output.kv(
        "Search area",
        format!("{:.3} sq km ({:.3} sq mi)", stats.area_sq_km, stats.area_sq_miles),
    );
    output.kv("Density", format!("{:.2} buildings/sq km", stats.per_sq_km));
    output.kv("Density", format!("{:.2} buildings/sq mi", stats.per_sq_mile));

    let provenance = &result.provenance;
    output.section("Run metadata");
    output.kv("Endpoint", &provenance.endpoint);
    output.kv(
        "Timeout",
        format!("{}s, Retries: {}", provenance.timeout_secs, provenance.retries),
    );
    output.kv("Queried at (UTC)", provenance.queried_at.format("%Y-%m-%dT%H:%M:%SZ"));
    output.kv("Cache hit", provenance.cache_hit);

    if let Some(path) = geojson_path {
        output.success(format!(
            "Wrote {} building polygons to {}",
            result.building_count(),
            path.display()
        ));
    }

    println!();
    output.note("Note: OSM is community-sourced; completeness varies by location.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use footprint_core::models::{
        BuildingPolygon, Coordinate, DensityStats, FetchProvenance, RadiusSpec,
    };
    use std::fs;
    use tempfile::TempDir;

    fn run_with_square() -> RunResult {
        let polygon = BuildingPolygon::from_ring(&[[0.0, 0.0], [0.001, 0.0], [0.001, 0.001], [0.0, 0.001]])
            .unwrap()
            .with_id(Some(7));
        RunResult {
            coordinate: Coordinate::new(0.0, 0.0).unwrap(),
            resolution: ResolutionSource::Explicit,
            radius: RadiusSpec::kilometers(1.0).unwrap(),
            radius_m: 1000.0,
            polygons: vec![polygon],
            stats: DensityStats::zero(),
            provenance: FetchProvenance {
                endpoint: "https://overpass-api.de/api/interpreter".to_string(),
                timeout_secs: 120,
                retries: 2,
                attempts: 1,
                queried_at: Utc::now(),
                cache_hit: false,
            },
        }
    }

    #[test]
    fn test_export_geojson_writes_feature_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("buildings.geojson");

        export_geojson(&run_with_square(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let geojson: geojson::GeoJson = content.parse().unwrap();
        match geojson {
            geojson::GeoJson::FeatureCollection(fc) => {
                assert_eq!(fc.features.len(), 1);
                assert_eq!(
                    fc.features[0].property("id").and_then(|v| v.as_i64()),
                    Some(7)
                );
            }
            other => panic!("expected a feature collection, got {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_policy() {
        assert_eq!(endpoint_policy(true), EndpointPolicy::Rotate);
        assert_eq!(endpoint_policy(false), EndpointPolicy::PrimaryOnly);
    }
}
