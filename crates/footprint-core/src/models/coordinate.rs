use serde::Serialize;
use std::fmt;

use crate::error::{FootprintError, Result};

/// WGS 84 point, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(FootprintError::invalid_coordinate(format!(
                "coordinates must be finite numbers, got ({}, {})",
                lat, lon
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(FootprintError::invalid_coordinate(format!(
                "latitude {} is outside -90..90",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(FootprintError::invalid_coordinate(format!(
                "longitude {} is outside -180..180",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Parse the two text fields of the coordinates input mode.
    ///
    /// Fails with `InvalidCoordinate` when either field is not a number or the
    /// pair is out of range.
    pub fn from_fields(lat: &str, lon: &str) -> Result<Self> {
        let lat_val = parse_number(lat, "latitude")?;
        let lon_val = parse_number(lon, "longitude")?;
        Self::new(lat_val, lon_val)
    }

    /// Try to read a bare "lat, lon" or "lat lon" pair.
    ///
    /// Commas are treated as whitespace and exactly two numeric tokens must
    /// remain. Out-of-range pairs yield `None` so the text can be geocoded
    /// instead.
    pub fn parse_pair(text: &str) -> Option<Self> {
        let normalized = text.trim().replace(',', " ");
        let parts: Vec<&str> = normalized.split_whitespace().collect();
        if parts.len() != 2 {
            return None;
        }
        let lat = parts[0].parse::<f64>().ok()?;
        let lon = parts[1].parse::<f64>().ok()?;
        Self::new(lat, lon).ok()
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

fn parse_number(field: &str, name: &str) -> Result<f64> {
    field.trim().parse::<f64>().map_err(|_| {
        FootprintError::invalid_coordinate(format!("{} '{}' is not a number", name, field.trim()))
    })
}
