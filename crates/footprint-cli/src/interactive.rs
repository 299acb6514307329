use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use footprint_core::models::{Coordinate, InputMode, LocationSpec};
use footprint_core::units::DistanceUnit;

/// What the user typed for the search center
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Address(String),
    Fields { lat: String, lon: String },
}

impl LocationInput {
    /// Turn the raw input into a [`LocationSpec`]
    pub fn into_spec(self) -> footprint_core::Result<LocationSpec> {
        match self {
            LocationInput::Address(text) => Ok(LocationSpec::from_address(text)),
            LocationInput::Fields { lat, lon } => LocationSpec::from_fields(&lat, &lon),
        }
    }
}

/// Result from the search prompt
#[derive(Debug, Clone)]
pub struct SearchInput {
    pub location: LocationInput,
    pub radius: f64,
    pub unit: DistanceUnit,
    pub force_refresh: bool,
}

/// Previous answers, offered as defaults
#[derive(Debug, Clone)]
pub struct SearchDefaults {
    pub mode: InputMode,
    pub center: Option<Coordinate>,
    pub radius: f64,
    pub unit: DistanceUnit,
    pub radius_min: f64,
    pub radius_max: f64,
}

/// Next step offered after each calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Calculate,
    ExportGeoJson,
    ClearCache,
    Quit,
}

impl ShellAction {
    const ALL: [ShellAction; 4] =
        [ShellAction::Calculate, ShellAction::ExportGeoJson, ShellAction::ClearCache, ShellAction::Quit];

    fn label(&self) -> &'static str {
        match self {
            ShellAction::Calculate => "New calculation",
            ShellAction::ExportGeoJson => "Export last result as GeoJSON",
            ShellAction::ClearCache => "Clear cache",
            ShellAction::Quit => "Quit",
        }
    }
}

/// Interactive search prompt
pub fn prompt_search(defaults: &SearchDefaults) -> Result<SearchInput> {
    println!("\n🔎 Search Parameters\n");

    let modes = ["Address", "Coordinates"];
    let mode_idx = Select::new()
        .with_prompt("Input mode")
        .items(&modes)
        .default(match defaults.mode {
            InputMode::Address => 0,
            InputMode::Coordinates => 1,
        })
        .interact()?;

    let location = if mode_idx == 0 {
        let address: String = Input::new()
            .with_prompt("Address or place (e.g., Times Square or 37.7749, -122.4194)")
            .allow_empty(true)
            .interact_text()?;
        LocationInput::Address(address)
    } else {
        let (lat_default, lon_default) = defaults
            .center
            .map(|c| (c.lat().to_string(), c.lon().to_string()))
            .unwrap_or_default();

        let lat: String = Input::new()
            .with_prompt("Latitude")
            .default(lat_default)
            .interact_text()?;
        let lon: String = Input::new()
            .with_prompt("Longitude")
            .default(lon_default)
            .interact_text()?;
        LocationInput::Fields { lat, lon }
    };

    let units = [DistanceUnit::Kilometers, DistanceUnit::Miles];
    let unit_idx = Select::new()
        .with_prompt("Radius units")
        .items(&units.map(|u| u.as_str()))
        .default(if defaults.unit == DistanceUnit::Miles { 1 } else { 0 })
        .interact()?;
    let unit = units[unit_idx];

    let (min, max) = (defaults.radius_min, defaults.radius_max);
    let radius: f64 = Input::new()
        .with_prompt(format!("Radius ({}..{} {})", min, max, unit.abbreviation()))
        .default(defaults.radius)
        .validate_with(move |value: &f64| -> std::result::Result<(), String> {
            if value.is_finite() && *value >= min && *value <= max {
                Ok(())
            } else {
                Err(format!("radius must be between {} and {}", min, max))
            }
        })
        .interact_text()?;

    let force_refresh = Confirm::new()
        .with_prompt("Ignore cached results?")
        .default(false)
        .interact()?;

    Ok(SearchInput { location, radius, unit, force_refresh })
}

/// Ask what to do next
pub fn prompt_action(has_result: bool) -> Result<ShellAction> {
    let actions: Vec<ShellAction> = ShellAction::ALL
        .into_iter()
        .filter(|a| has_result || *a != ShellAction::ExportGeoJson)
        .collect();
    let labels: Vec<&str> = actions.iter().map(ShellAction::label).collect();

    let idx = Select::new().with_prompt("Next").items(&labels).default(0).interact()?;
    Ok(actions[idx])
}

/// Ask for an export path
pub fn prompt_export_path() -> Result<String> {
    let path: String = Input::new()
        .with_prompt("GeoJSON file path")
        .default("buildings.geojson".to_string())
        .interact_text()?;
    Ok(path)
}
