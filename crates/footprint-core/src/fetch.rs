//! Overpass building query with bounded retry.
//!
//! One [`GeodataFetcher::fetch`] call targets a single endpoint. Rotating
//! through mirrors is left to the caller (see [`crate::pipeline`]).

use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{FootprintError, Result};
use crate::models::{Coordinate, FetchResult, RawFeature};
use crate::ports::{GeodataTransport, TransportError};

/// Extra HTTP time on top of the server-side query timeout
pub const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(30);

/// Longest wait between two attempts, in seconds
pub const MAX_BACKOFF_SECS: u64 = 5;

/// Delay after failed attempt `attempt` (0-indexed): min(2^attempt, 5) seconds
pub fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64.checked_pow(attempt).unwrap_or(u64::MAX).min(MAX_BACKOFF_SECS);
    Duration::from_secs(secs)
}

/// Overpass QL selecting building ways and relations around a point
pub fn build_overpass_query(center: Coordinate, radius_m: f64, timeout_secs: u64) -> String {
    let around = format!("around:{},{},{}", radius_m, center.lat(), center.lon());
    format!(
        "[out:json][timeout:{timeout}];\n\
         (\n  \
         way[\"building\"]({around});\n  \
         rel[\"building\"]({around});\n\
         );\n\
         out tags geom;\n",
        timeout = timeout_secs,
        around = around,
    )
}

/// Parameters of one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub center: Coordinate,
    pub radius_m: f64,
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Additional attempts after the first one
    pub retries: u32,
}

impl FetchRequest {
    /// HTTP timeout for a single attempt
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs) + REQUEST_TIMEOUT_MARGIN
    }
}

/// Geodata fetcher with retry and exponential backoff
pub struct GeodataFetcher<T: GeodataTransport> {
    transport: T,
}

impl<T: GeodataTransport> GeodataFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch raw building features, all or nothing.
    ///
    /// Every failure (transport, status, malformed body) is retried up to
    /// `request.retries` times. When attempts run out the last error is returned
    /// as [`FootprintError::FetchFailed`].
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult> {
        let query = build_overpass_query(request.center, request.radius_m, request.timeout_secs);
        let timeout = request.request_timeout();
        let total_attempts = request.retries.saturating_add(1);
        debug!(endpoint = %request.endpoint, %query, "Built Overpass query");

        let mut last_error: Option<TransportError> = None;

        for attempt in 0..total_attempts {
            let outcome = self
                .transport
                .post_query(&request.endpoint, &query, timeout)
                .await
                .and_then(|body| parse_elements(&body));

            match outcome {
                Ok(features) => {
                    info!(
                        endpoint = %request.endpoint,
                        features = features.len(),
                        attempts = attempt + 1,
                        "Fetched building features"
                    );
                    return Ok(FetchResult::fresh(features, attempt + 1));
                }
                Err(err) => {
                    warn!(
                        endpoint = %request.endpoint,
                        attempt = attempt + 1,
                        of = total_attempts,
                        error = %err,
                        "Geodata request failed"
                    );
                    last_error = Some(err);
                    if attempt + 1 < total_attempts {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        Err(FootprintError::FetchFailed {
            endpoint: request.endpoint.clone(),
            attempts: total_attempts,
            cause: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempt was made".to_string()),
        })
    }
}

/// Read the `elements` array of an Overpass JSON response.
///
/// A missing `elements` field means zero features.
pub fn parse_elements(body: &str) -> std::result::Result<Vec<RawFeature>, TransportError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| TransportError::MalformedBody(e.to_string()))?;

    let object = json
        .as_object()
        .ok_or_else(|| TransportError::MalformedBody("expected a JSON object".to_string()))?;

    match object.get("elements") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(elements)) => Ok(elements.iter().map(RawFeature::from_overpass).collect()),
        Some(_) => Err(TransportError::MalformedBody("'elements' is not an array".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureKind;

    #[test]
    fn test_backoff_sequence() {
        let delays: Vec<u64> = (0..6).map(|i| backoff_delay(i).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 5, 5, 5]);
        assert_eq!(backoff_delay(200).as_secs(), 5);
    }

    #[test]
    fn test_query_text() {
        let center = Coordinate::new(37.4221, -122.0841).unwrap();
        let query = build_overpass_query(center, 1000.0, 120);

        assert!(query.starts_with("[out:json][timeout:120];"));
        assert!(query.contains("way[\"building\"](around:1000,37.4221,-122.0841);"));
        assert!(query.contains("rel[\"building\"](around:1000,37.4221,-122.0841);"));
        assert!(query.trim_end().ends_with("out tags geom;"));
    }

    #[test]
    fn test_request_timeout_adds_margin() {
        let request = FetchRequest {
            center: Coordinate::new(0.0, 0.0).unwrap(),
            radius_m: 100.0,
            endpoint: "http://localhost".to_string(),
            timeout_secs: 120,
            retries: 2,
        };
        assert_eq!(request.request_timeout(), Duration::from_secs(150));
    }

    #[test]
    fn test_parse_elements() {
        let body = r#"{"version": 0.6, "elements": [
            {"type": "way", "id": 1, "geometry": [{"lat": 0.0, "lon": 0.0}]},
            {"type": "node", "id": 2}
        ]}"#;
        let features = parse_elements(body).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].kind, FeatureKind::Way);
        assert_eq!(features[1].kind, FeatureKind::Other);
    }

    #[test]
    fn test_missing_elements_is_empty() {
        assert!(parse_elements(r#"{"remark": "runtime error"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(matches!(parse_elements("<html>"), Err(TransportError::MalformedBody(_))));
        assert!(matches!(parse_elements("[1, 2]"), Err(TransportError::MalformedBody(_))));
        assert!(matches!(
            parse_elements(r#"{"elements": {}}"#),
            Err(TransportError::MalformedBody(_))
        ));
    }
}
