//! Location resolution with a fixed precedence:
//! explicit coordinates, then a bare "lat, lon" pair, then the geocoder.

use tracing::{debug, warn};

use crate::error::{FootprintError, Result};
use crate::models::{Coordinate, LocationSpec, ResolutionSource, ResolvedLocation};
use crate::ports::Geocoder;

/// Turns a [`LocationSpec`] into a validated coordinate
pub struct LocationResolver<G: Geocoder> {
    geocoder: G,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve a location.
    ///
    /// `last_known` is the previous center of the session. It is used when the
    /// address is blank or the geocoder cannot be reached; an empty geocoder
    /// answer is still `LocationNotFound`.
    pub async fn resolve(
        &self,
        spec: &LocationSpec,
        last_known: Option<Coordinate>,
    ) -> Result<ResolvedLocation> {
        let text = match spec {
            LocationSpec::Explicit(coordinate) => {
                return Ok(ResolvedLocation {
                    coordinate: *coordinate,
                    source: ResolutionSource::Explicit,
                });
            }
            LocationSpec::RawPair(text) | LocationSpec::Query(text) => text.trim(),
        };

        if let Some(coordinate) = Coordinate::parse_pair(text) {
            debug!(%coordinate, "Using coordinate pair without geocoding");
            return Ok(ResolvedLocation { coordinate, source: ResolutionSource::RawPair });
        }

        if text.is_empty() {
            return last_known
                .map(|coordinate| ResolvedLocation {
                    coordinate,
                    source: ResolutionSource::LastKnown,
                })
                .ok_or_else(|| FootprintError::LocationNotFound { query: String::new() });
        }

        match self.geocoder.geocode(text).await {
            Ok(Some(coordinate)) => {
                debug!(query = text, %coordinate, "Geocoded location");
                Ok(ResolvedLocation { coordinate, source: ResolutionSource::Geocoded })
            }
            Ok(None) => Err(FootprintError::LocationNotFound { query: text.to_string() }),
            Err(err) => match last_known {
                Some(coordinate) => {
                    warn!(
                        query = text,
                        error = %err,
                        %coordinate,
                        "Geocoder unavailable, keeping previous center"
                    );
                    Ok(ResolvedLocation { coordinate, source: ResolutionSource::LastKnown })
                }
                None => Err(FootprintError::GeocodingFailed {
                    query: text.to_string(),
                    reason: err.to_string(),
                }),
            },
        }
    }
}
