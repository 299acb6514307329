use crate::error::{FootprintError, Result};
use crate::units::DistanceUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Primary Overpass API endpoint
pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Known Overpass mirrors, primary first
pub const OVERPASS_MIRRORS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.openstreetmap.ru/api/interpreter",
];

/// Nominatim search endpoint used for free-text locations
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

pub const DEFAULT_USER_AGENT: &str = "building-density-app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_RADIUS_MIN: f64 = 0.1;
pub const DEFAULT_RADIUS_MAX: f64 = 50.0;

/// Center a fresh session starts from (latitude, longitude)
pub const DEFAULT_CENTER: (f64, f64) = (37.4221, -122.0841);

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for Footprint
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub endpoint: ConfigValue<String>,
    pub mirrors: ConfigValue<Vec<String>>,
    pub timeout_secs: ConfigValue<u64>,
    pub retries: ConfigValue<u32>,
    pub radius_unit: ConfigValue<DistanceUnit>,
    pub radius_min: ConfigValue<f64>,
    pub radius_max: ConfigValue<f64>,
    pub geocoder_url: ConfigValue<String>,
    pub user_agent: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            endpoint: ConfigValue::new(OVERPASS_URL.to_string(), ConfigSource::Default),
            mirrors: ConfigValue::new(
                OVERPASS_MIRRORS.iter().map(|m| m.to_string()).collect(),
                ConfigSource::Default,
            ),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            retries: ConfigValue::new(DEFAULT_RETRIES, ConfigSource::Default),
            radius_unit: ConfigValue::new(DistanceUnit::Kilometers, ConfigSource::Default),
            radius_min: ConfigValue::new(DEFAULT_RADIUS_MIN, ConfigSource::Default),
            radius_max: ConfigValue::new(DEFAULT_RADIUS_MAX, ConfigSource::Default),
            geocoder_url: ConfigValue::new(NOMINATIM_URL.to_string(), ConfigSource::Default),
            user_agent: ConfigValue::new(DEFAULT_USER_AGENT.to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FootprintError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FootprintError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(endpoint) = file_config.endpoint {
            self.endpoint.update(endpoint, ConfigSource::File);
        }

        if let Some(mirrors) = file_config.mirrors {
            self.mirrors.update(mirrors, ConfigSource::File);
        }

        if let Some(timeout_secs) = file_config.timeout_secs {
            self.timeout_secs.update(timeout_secs, ConfigSource::File);
        }

        if let Some(retries) = file_config.retries {
            self.retries.update(retries, ConfigSource::File);
        }

        if let Some(unit) = file_config.radius_unit {
            self.radius_unit.update(unit.parse()?, ConfigSource::File);
        }

        if let Some(radius_min) = file_config.radius_min {
            self.radius_min.update(radius_min, ConfigSource::File);
        }

        if let Some(radius_max) = file_config.radius_max {
            self.radius_max.update(radius_max, ConfigSource::File);
        }

        if let Some(geocoder_url) = file_config.geocoder_url {
            self.geocoder_url.update(geocoder_url, ConfigSource::File);
        }

        if let Some(user_agent) = file_config.user_agent {
            self.user_agent.update(user_agent, ConfigSource::File);
        }

        self.validate()?;
        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // FOOTPRINT_ENDPOINT
        if let Ok(endpoint) = env::var("FOOTPRINT_ENDPOINT") {
            if endpoint.trim().is_empty() {
                tracing::warn!("Ignoring empty FOOTPRINT_ENDPOINT");
            } else {
                self.endpoint.update(endpoint, ConfigSource::Environment);
            }
        }

        // FOOTPRINT_TIMEOUT
        if let Ok(timeout_str) = env::var("FOOTPRINT_TIMEOUT") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) if timeout > 0 => {
                    self.timeout_secs.update(timeout, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid FOOTPRINT_TIMEOUT value '{}': expected a positive number of seconds",
                    timeout_str
                ),
            }
        }

        // FOOTPRINT_RETRIES
        if let Ok(retries_str) = env::var("FOOTPRINT_RETRIES") {
            match retries_str.parse::<u32>() {
                Ok(retries) => self.retries.update(retries, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FOOTPRINT_RETRIES value '{}': expected a non-negative integer",
                    retries_str
                ),
            }
        }

        // FOOTPRINT_RADIUS_UNIT
        if let Ok(unit_str) = env::var("FOOTPRINT_RADIUS_UNIT") {
            match unit_str.parse::<DistanceUnit>() {
                Ok(unit) => self.radius_unit.update(unit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FOOTPRINT_RADIUS_UNIT value '{}': expected kilometers or miles",
                    unit_str
                ),
            }
        }

        // FOOTPRINT_GEOCODER_URL
        if let Ok(geocoder_url) = env::var("FOOTPRINT_GEOCODER_URL") {
            self.geocoder_url.update(geocoder_url, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint.update(endpoint, ConfigSource::Cli);
        }

        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs.update(timeout_secs, ConfigSource::Cli);
        }

        if let Some(retries) = overrides.retries {
            self.retries.update(retries, ConfigSource::Cli);
        }

        if let Some(radius_unit) = overrides.radius_unit {
            self.radius_unit.update(radius_unit, ConfigSource::Cli);
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs.value == 0 {
            return Err(FootprintError::ConfigInvalid {
                key: "timeout_secs".to_string(),
                reason: "timeout must be at least 1 second".to_string(),
            });
        }

        let (min, max) = (self.radius_min.value, self.radius_max.value);
        if !(min > 0.0 && min.is_finite() && max.is_finite() && min <= max) {
            return Err(FootprintError::ConfigInvalid {
                key: "radius_min/radius_max".to_string(),
                reason: format!("expected 0 < radius_min <= radius_max, got {} and {}", min, max),
            });
        }

        Ok(())
    }

    /// Primary endpoint followed by the mirrors, without duplicates
    pub fn endpoints(&self) -> Vec<String> {
        let mut endpoints = vec![self.endpoint.value.clone()];
        for mirror in &self.mirrors.value {
            if !endpoints.contains(mirror) {
                endpoints.push(mirror.clone());
            }
        }
        endpoints
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("endpoint".to_string(), (self.endpoint.value.clone(), self.endpoint.source));

        map.insert(
            "mirrors".to_string(),
            (self.mirrors.value.join(", "), self.mirrors.source),
        );

        map.insert(
            "timeout_secs".to_string(),
            (self.timeout_secs.value.to_string(), self.timeout_secs.source),
        );

        map.insert("retries".to_string(), (self.retries.value.to_string(), self.retries.source));

        map.insert(
            "radius_unit".to_string(),
            (self.radius_unit.value.to_string(), self.radius_unit.source),
        );

        map.insert(
            "radius_min".to_string(),
            (self.radius_min.value.to_string(), self.radius_min.source),
        );

        map.insert(
            "radius_max".to_string(),
            (self.radius_max.value.to_string(), self.radius_max.source),
        );

        map.insert(
            "geocoder_url".to_string(),
            (self.geocoder_url.value.clone(), self.geocoder_url.source),
        );

        map.insert("user_agent".to_string(), (self.user_agent.value.clone(), self.user_agent.source));

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    endpoint: Option<String>,
    mirrors: Option<Vec<String>>,
    timeout_secs: Option<u64>,
    retries: Option<u32>,
    radius_unit: Option<String>,
    radius_min: Option<f64>,
    radius_max: Option<f64>,
    geocoder_url: Option<String>,
    user_agent: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub radius_unit: Option<DistanceUnit>,
}
