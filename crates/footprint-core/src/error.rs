//! Error types for Footprint

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FootprintError {
    // Location errors
    #[error("Invalid coordinate: {reason}")]
    InvalidCoordinate { reason: String },

    #[error("Location not found: '{query}'. Try a more specific address or coordinates")]
    LocationNotFound { query: String },

    #[error("Geocoding failed for '{query}': {reason}")]
    GeocodingFailed { query: String, reason: String },

    // Radius errors
    #[error("Invalid radius {value}: {reason}")]
    InvalidRadius { value: f64, reason: String },

    // Fetch errors
    #[error("Fetch from {endpoint} failed after {attempts} attempt(s): {cause}")]
    FetchFailed {
        endpoint: String,
        attempts: u32,
        cause: String,
    },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FootprintError {
    pub(crate) fn invalid_coordinate(reason: impl Into<String>) -> Self {
        FootprintError::InvalidCoordinate { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, FootprintError>;
