//! Calc command implementation

use super::{build_pipeline, endpoint_policy, export_geojson, render_result};
use crate::cli::CalcArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use crate::progress::{finish_error, finish_success, query_spinner};
use anyhow::Result;
use footprint_core::models::{LocationSpec, RadiusSpec};
use footprint_core::pipeline::{RunRequest, Session};
use std::path::Path;

pub async fn execute(args: CalcArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(config_file, args.network.overrides())?;

    // Validate inputs before touching the network
    let location = location_spec(&args)?;
    let radius = RadiusSpec::new(args.radius, config.radius_unit.value)?;

    let request = RunRequest::from_config(location, radius, &config)
        .with_policy(endpoint_policy(args.network.rotate_mirrors))
        .with_force_refresh(args.force_refresh);

    let pipeline = build_pipeline(&config)?;
    let mut session = Session::new();

    let spinner = query_spinner(output.is_json());
    let result = match pipeline.run(&mut session, &request).await {
        Ok(result) => {
            finish_success(&spinner, &format!("Found {} buildings", result.building_count()));
            result
        }
        Err(err) => {
            finish_error(&spinner, "Calculation failed");
            return Err(err.into());
        }
    };

    if let Some(ref path) = args.geojson {
        export_geojson(&result, path)?;
    }

    render_result(&result, args.geojson.as_deref(), output)
}

/// Location from the flags: explicit fields win, then the address text.
/// With neither, the blank address resolves to the session's default center.
fn location_spec(args: &CalcArgs) -> Result<LocationSpec> {
    match (&args.lat, &args.lon) {
        (Some(lat), Some(lon)) => Ok(LocationSpec::from_fields(lat, lon)?),
        _ => Ok(LocationSpec::from_address(args.address.clone().unwrap_or_default())),
    }
}
