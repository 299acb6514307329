use serde::Serialize;
use std::fmt;

use super::Coordinate;
use crate::error::Result;

/// How the user described the search center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum InputMode {
    /// Free text: a place name or a bare "lat, lon" pair
    #[default]
    Address,
    /// Separate latitude and longitude fields
    Coordinates,
}

/// A location specification; exactly one variant resolves per request
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSpec {
    /// Address text that reads as a "lat, lon" pair
    RawPair(String),
    /// Address text that must be geocoded
    Query(String),
    /// Coordinates given field by field, already validated
    Explicit(Coordinate),
}

impl LocationSpec {
    /// Classify address-mode text
    pub fn from_address(text: impl Into<String>) -> Self {
        let text = text.into();
        if Coordinate::parse_pair(&text).is_some() {
            LocationSpec::RawPair(text)
        } else {
            LocationSpec::Query(text)
        }
    }

    /// Explicit location from coordinates-mode fields
    pub fn from_fields(lat: &str, lon: &str) -> Result<Self> {
        Coordinate::from_fields(lat, lon).map(LocationSpec::Explicit)
    }

    pub fn input_mode(&self) -> InputMode {
        match self {
            LocationSpec::RawPair(_) | LocationSpec::Query(_) => InputMode::Address,
            LocationSpec::Explicit(_) => InputMode::Coordinates,
        }
    }
}

impl fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSpec::RawPair(text) | LocationSpec::Query(text) => f.write_str(text.trim()),
            LocationSpec::Explicit(coord) => write!(f, "{}", coord),
        }
    }
}

/// Which rule produced the resolved coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    RawPair,
    Explicit,
    Geocoded,
    /// The geocoder was unreachable (or the address blank), so the session's
    /// previous center was kept
    LastKnown,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolutionSource::RawPair => "coordinate pair",
            ResolutionSource::Explicit => "explicit coordinates",
            ResolutionSource::Geocoded => "geocoded",
            ResolutionSource::LastKnown => "last known center",
        };
        f.write_str(label)
    }
}

/// Output of the location resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub source: ResolutionSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_classification() {
        assert_eq!(
            LocationSpec::from_address("37.4221, -122.0841"),
            LocationSpec::RawPair("37.4221, -122.0841".to_string())
        );
        assert_eq!(
            LocationSpec::from_address("Times Square"),
            LocationSpec::Query("Times Square".to_string())
        );
        // Out-of-range pairs are left to the geocoder
        assert!(matches!(LocationSpec::from_address("100, 100"), LocationSpec::Query(_)));
    }

    #[test]
    fn test_from_fields() {
        let spec = LocationSpec::from_fields("37.4221", "-122.0841").unwrap();
        assert_eq!(spec.input_mode(), InputMode::Coordinates);
        assert!(LocationSpec::from_fields("x", "1").is_err());
    }
}
