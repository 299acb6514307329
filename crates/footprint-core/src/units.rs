//! Distance and area conversion between metric and imperial units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FootprintError;

/// Meters in one international mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// Meters in one kilometer
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Square meters in one square kilometer
pub const SQ_METERS_PER_SQ_KM: f64 = 1_000_000.0;

/// Square meters in one square mile
pub const SQ_METERS_PER_SQ_MILE: f64 = 2_589_988.110336;

/// Unit a search radius is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

impl DistanceUnit {
    /// Convert a distance value to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => value * METERS_PER_KILOMETER,
            DistanceUnit::Miles => value * METERS_PER_MILE,
        }
    }

    /// Convert a distance value from meters to this unit
    pub fn from_meters(&self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => meters / METERS_PER_KILOMETER,
            DistanceUnit::Miles => meters / METERS_PER_MILE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "kilometers",
            DistanceUnit::Miles => "miles",
        }
    }

    /// Short label used next to numbers ("km", "mi")
    pub fn abbreviation(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kilometers" | "kilometres" | "km" => Ok(DistanceUnit::Kilometers),
            "miles" | "mi" => Ok(DistanceUnit::Miles),
            _ => Err(FootprintError::ConfigInvalid {
                key: "radius_unit".to_string(),
                reason: format!("Invalid distance unit: {}. Use kilometers or miles", s),
            }),
        }
    }
}

/// Convert a magnitude in `unit` to meters
pub fn to_meters(magnitude: f64, unit: DistanceUnit) -> f64 {
    unit.to_meters(magnitude)
}

/// Convert square meters to square kilometers
pub fn to_square_km(area_m2: f64) -> f64 {
    area_m2 / SQ_METERS_PER_SQ_KM
}

/// Convert square meters to square miles
pub fn to_square_miles(area_m2: f64) -> f64 {
    area_m2 / SQ_METERS_PER_SQ_MILE
}
