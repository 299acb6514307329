use async_trait::async_trait;
use footprint_core::config::{DEFAULT_USER_AGENT, NOMINATIM_URL};
use footprint_core::error::Result;
use footprint_core::models::Coordinate;
use footprint_core::ports::{Geocoder, TransportError};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::http::{build_client, classify, read_body};

/// Time allowed for one geocoding request
pub const GEOCODER_TIMEOUT: Duration = Duration::from_secs(10);

/// Nominatim geocoder implementation
///
/// Only the best match is requested (`limit=1`).
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    /// Search endpoint (e.g., "https://nominatim.openstreetmap.org/search")
    search_url: String,

    /// Per-request timeout
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl NominatimGeocoder {
    /// Create a new geocoder for `search_url`
    pub fn new(search_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        Ok(Self {
            search_url: search_url.into(),
            timeout: GEOCODER_TIMEOUT,
            client: build_client(user_agent)?,
        })
    }

    /// Create against the public OpenStreetMap instance
    pub fn public() -> Result<Self> {
        Self::new(NOMINATIM_URL, DEFAULT_USER_AGENT)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Full request URL for `query`
    pub fn request_url(&self, query: &str) -> std::result::Result<Url, TransportError> {
        Url::parse_with_params(
            &self.search_url,
            &[("q", query), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| {
            TransportError::Connection(format!("invalid geocoder URL '{}': {}", self.search_url, e))
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> std::result::Result<Option<Coordinate>, TransportError> {
        let url = self.request_url(query)?;
        debug!(%query, "Geocoding address");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify(e, self.timeout))?;

        let body = read_body(response, self.timeout).await?;
        parse_search_response(&body)
    }
}

/// One entry of a Nominatim `format=json` answer; coordinates come as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Best match of a search answer, `None` when the list is empty
pub fn parse_search_response(body: &str) -> std::result::Result<Option<Coordinate>, TransportError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| TransportError::MalformedBody(e.to_string()))?;

    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let coordinate = Coordinate::from_fields(&hit.lat, &hit.lon)
        .map_err(|e| TransportError::MalformedBody(e.to_string()))?;
    Ok(Some(coordinate))
}
