use clap::{Args, Parser, Subcommand};
use footprint_core::config::CliConfigOverrides;
use footprint_core::units::DistanceUnit;
use std::path::PathBuf;

/// Footprint - Building density from OpenStreetMap
#[derive(Parser, Debug)]
#[command(name = "footprint")]
#[command(about = "Count buildings and building density within a radius", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./footprint.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one density calculation
    Calc(CalcArgs),

    /// Interactive session that keeps its cache between calculations
    Shell(ShellArgs),

    /// List the configured Overpass endpoints
    Mirrors,

    /// Show the effective configuration and where each value comes from
    Config,
}

/// Network settings shared by `calc` and `shell`
#[derive(Args, Debug, Clone, Default)]
pub struct NetworkArgs {
    /// Overpass endpoint to query
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Server-side query timeout in seconds (the HTTP timeout adds 30s)
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Additional attempts after a failed request
    #[arg(long)]
    pub retries: Option<u32>,

    /// Radius unit (km or mi)
    #[arg(long)]
    pub units: Option<DistanceUnit>,

    /// Fall through to the configured mirrors when the endpoint fails
    #[arg(long)]
    pub rotate_mirrors: bool,
}

impl NetworkArgs {
    pub fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
            retries: self.retries,
            radius_unit: self.units,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CalcArgs {
    /// Address, place name, or "lat, lon" pair
    #[arg(long, short = 'a', conflicts_with_all = ["lat", "lon"])]
    pub address: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<String>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<String>,

    /// Search radius in the selected unit
    #[arg(long, short = 'r', default_value = "1.0")]
    pub radius: f64,

    /// Ignore cached results and query again
    #[arg(long)]
    pub force_refresh: bool,

    /// Write the building polygons to a GeoJSON file
    #[arg(long, value_name = "PATH")]
    pub geojson: Option<PathBuf>,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Parser, Debug)]
pub struct ShellArgs {
    #[command(flatten)]
    pub network: NetworkArgs,
}
