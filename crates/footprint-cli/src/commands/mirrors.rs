//! Mirrors command implementation

use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::EndpointRow;
use anyhow::Result;
use std::path::Path;

pub fn execute(config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_file)?;

    let rows: Vec<EndpointRow> = config
        .endpoints()
        .into_iter()
        .enumerate()
        .map(|(i, endpoint)| EndpointRow {
            position: i + 1,
            role: if i == 0 { "primary" } else { "mirror" }.to_string(),
            endpoint,
        })
        .collect();

    output.section("Overpass Endpoints");
    output.table(rows)?;

    if !output.is_json() {
        output.info("Only the primary is used unless --rotate-mirrors is given");
    }

    Ok(())
}
