//! Config command implementation

use crate::config_loader::{config_path, load_config};
use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;
use std::path::Path;

pub fn execute(config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_file)?;

    let mut rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();

    // Sort by key for consistent output
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    output.section("Configuration Values");
    output.table(rows)?;

    if !output.is_json() {
        match config_path(config_file) {
            Some(path) => output.kv("Config file", path.display()),
            None => output.kv("Config file", "(none)"),
        }

        output.section("Configuration Precedence");
        output.info("CLI arguments > Environment variables > Config file > Defaults");
    }

    Ok(())
}
