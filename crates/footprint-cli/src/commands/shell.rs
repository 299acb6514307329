//! Shell command implementation
//!
//! One [`Session`] lives for the whole loop, so repeated searches are served
//! from the run cache and a geocoder outage keeps the previous center.

use super::{build_pipeline, endpoint_policy, export_geojson, render_result};
use crate::cli::ShellArgs;
use crate::config_loader::load_config_with_overrides;
use crate::errors::from_footprint;
use crate::interactive::{
    prompt_action, prompt_export_path, prompt_search, LocationInput, SearchDefaults, SearchInput,
    ShellAction,
};
use crate::output::OutputWriter;
use crate::progress::{finish_error, finish_success, query_spinner};
use anyhow::{bail, Result};
use footprint_core::models::{InputMode, RadiusSpec};
use footprint_core::pipeline::{RunRequest, Session};
use std::path::Path;

pub async fn execute(args: ShellArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        bail!("The interactive shell does not support --json; use 'footprint calc --json'");
    }

    let config = load_config_with_overrides(config_file, args.network.overrides())?;
    let pipeline = build_pipeline(&config)?;
    let policy = endpoint_policy(args.network.rotate_mirrors);
    let mut session = Session::new();

    let mut defaults = SearchDefaults {
        mode: InputMode::Address,
        center: session.last_center(),
        radius: 1.0,
        unit: config.radius_unit.value,
        radius_min: config.radius_min.value,
        radius_max: config.radius_max.value,
    };

    println!("\n🏙  Footprint: building density from OpenStreetMap");

    let mut action = ShellAction::Calculate;
    loop {
        match action {
            ShellAction::Calculate => {
                let input = prompt_search(&defaults)?;
                remember(&mut defaults, &input);

                let SearchInput { location, radius, unit, force_refresh } = input;
                let prepared = location
                    .into_spec()
                    .and_then(|spec| RadiusSpec::new(radius, unit).map(|radius| (spec, radius)));

                match prepared {
                    Ok((spec, radius)) => {
                        let request = RunRequest::from_config(spec, radius, &config)
                            .with_policy(policy)
                            .with_force_refresh(force_refresh);

                        let spinner = query_spinner(false);
                        match pipeline.run(&mut session, &request).await {
                            Ok(result) => {
                                finish_success(
                                    &spinner,
                                    &format!("Found {} buildings", result.building_count()),
                                );
                                render_result(&result, None, output)?;
                            }
                            Err(err) => {
                                finish_error(&spinner, "Calculation failed");
                                from_footprint(&err).display();
                            }
                        }
                    }
                    Err(err) => from_footprint(&err).display(),
                }

                defaults.center = session.last_center();
            }
            ShellAction::ExportGeoJson => {
                if let Some(result) = session.last_result() {
                    let path = prompt_export_path()?;
                    match export_geojson(result, Path::new(&path)) {
                        Ok(()) => output.success(format!(
                            "Wrote {} building polygons to {}",
                            result.building_count(),
                            path
                        )),
                        Err(err) => output.error(format!("{:#}", err)),
                    }
                }
            }
            ShellAction::ClearCache => {
                let entries = session.cache().len();
                session.reset();
                defaults.center = session.last_center();
                output.success(format!("Cleared {} cached result(s)", entries));
            }
            ShellAction::Quit => break,
        }

        action = prompt_action(session.last_result().is_some())?;
    }

    Ok(())
}

/// Carry the last answers over as the next defaults
fn remember(defaults: &mut SearchDefaults, input: &SearchInput) {
    defaults.mode = match input.location {
        LocationInput::Address(_) => InputMode::Address,
        LocationInput::Fields { .. } => InputMode::Coordinates,
    };
    defaults.radius = input.radius;
    defaults.unit = input.unit;
}
