//! Resolve, fetch, build, aggregate.
//!
//! [`Session`] carries everything that outlives a single request: the run
//! cache, the last resolved center and the last successful result. A failed run
//! leaves all three untouched apart from the center, which moves as soon as a
//! location resolves.

use tracing::{debug, info, warn};

use crate::cache::{CacheKey, RunCache};
use crate::config::{LayeredConfig, DEFAULT_CENTER, DEFAULT_RADIUS_MAX, DEFAULT_RADIUS_MIN};
use crate::error::{FootprintError, Result};
use crate::fetch::{FetchRequest, GeodataFetcher};
use crate::models::{
    Coordinate, FetchProvenance, FetchResult, LocationSpec, RadiusSpec, RunResult,
};
use crate::ports::{GeodataTransport, Geocoder};
use crate::processing::{build_polygons, compute_density};
use crate::resolver::LocationResolver;

/// Which endpoints a run may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointPolicy {
    /// Only the first endpoint of the list
    #[default]
    PrimaryOnly,
    /// Every endpoint in order until one succeeds
    Rotate,
}

/// One calculation as requested by the presentation layer
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub location: LocationSpec,
    pub radius: RadiusSpec,
    /// Primary endpoint first, then mirrors
    pub endpoints: Vec<String>,
    pub policy: EndpointPolicy,
    pub timeout_secs: u64,
    pub retries: u32,
    pub force_refresh: bool,
}

impl RunRequest {
    /// Request using the configured endpoints, timeout and retries
    pub fn from_config(location: LocationSpec, radius: RadiusSpec, config: &LayeredConfig) -> Self {
        Self {
            location,
            radius,
            endpoints: config.endpoints(),
            policy: EndpointPolicy::PrimaryOnly,
            timeout_secs: config.timeout_secs.value,
            retries: config.retries.value,
            force_refresh: false,
        }
    }

    pub fn with_policy(mut self, policy: EndpointPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    fn candidate_endpoints(&self) -> &[String] {
        match self.policy {
            EndpointPolicy::PrimaryOnly => &self.endpoints[..self.endpoints.len().min(1)],
            EndpointPolicy::Rotate => &self.endpoints,
        }
    }
}

/// State kept across calculations
#[derive(Debug, Clone)]
pub struct Session {
    cache: RunCache,
    last_center: Option<Coordinate>,
    last_result: Option<RunResult>,
}

impl Session {
    /// Fresh session centered on the default location
    pub fn new() -> Self {
        Self::with_cache(RunCache::new())
    }

    /// Fresh session sharing an existing cache
    pub fn with_cache(cache: RunCache) -> Self {
        Self { cache, last_center: default_center(), last_result: None }
    }

    /// Session with no previous center; geocoder outages are then fatal
    pub fn without_center() -> Self {
        Self { cache: RunCache::new(), last_center: None, last_result: None }
    }

    pub fn cache(&self) -> &RunCache {
        &self.cache
    }

    pub fn last_center(&self) -> Option<Coordinate> {
        self.last_center
    }

    pub fn last_result(&self) -> Option<&RunResult> {
        self.last_result.as_ref()
    }

    /// Explicit reset: empties the cache and forgets previous runs
    pub fn reset(&mut self) {
        self.cache.clear();
        self.last_center = default_center();
        self.last_result = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn default_center() -> Option<Coordinate> {
    Coordinate::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1).ok()
}

/// The density pipeline over a geocoder and a geodata transport
pub struct Pipeline<G: Geocoder, T: GeodataTransport> {
    resolver: LocationResolver<G>,
    fetcher: GeodataFetcher<T>,
    radius_min: f64,
    radius_max: f64,
}

impl<G: Geocoder, T: GeodataTransport> Pipeline<G, T> {
    pub fn new(geocoder: G, transport: T) -> Self {
        Self {
            resolver: LocationResolver::new(geocoder),
            fetcher: GeodataFetcher::new(transport),
            radius_min: DEFAULT_RADIUS_MIN,
            radius_max: DEFAULT_RADIUS_MAX,
        }
    }

    /// Inclusive radius bounds, in the unit of each request's radius
    pub fn with_radius_bounds(mut self, min: f64, max: f64) -> Self {
        self.radius_min = min;
        self.radius_max = max;
        self
    }

    pub fn resolver(&self) -> &LocationResolver<G> {
        &self.resolver
    }

    pub fn fetcher(&self) -> &GeodataFetcher<T> {
        &self.fetcher
    }

    /// Run one calculation.
    ///
    /// Resolution and fetch failures abort the run and are returned as is. The
    /// session's cache and last result survive any failure.
    pub async fn run(&self, session: &mut Session, request: &RunRequest) -> Result<RunResult> {
        request.radius.check_bounds(self.radius_min, self.radius_max)?;

        let resolved = self.resolver.resolve(&request.location, session.last_center).await?;
        session.last_center = Some(resolved.coordinate);

        let radius_m = request.radius.to_meters();
        let (endpoint, fetched) =
            self.fetch_features(session, request, resolved.coordinate, radius_m).await?;

        let outcome = build_polygons(&fetched.features);
        let stats = compute_density(outcome.count(), radius_m);

        info!(
            center = %resolved.coordinate,
            radius_m,
            buildings = outcome.count(),
            discarded = outcome.discarded,
            cache_hit = fetched.cache_hit,
            "Calculated building density"
        );

        let result = RunResult {
            coordinate: resolved.coordinate,
            resolution: resolved.source,
            radius: request.radius,
            radius_m,
            polygons: outcome.polygons,
            stats,
            provenance: FetchProvenance {
                endpoint,
                timeout_secs: request.timeout_secs,
                retries: request.retries,
                attempts: fetched.attempts,
                queried_at: fetched.retrieved_at,
                cache_hit: fetched.cache_hit,
            },
        };

        session.last_result = Some(result.clone());
        Ok(result)
    }

    /// Cache lookup and fetch over the candidate endpoints
    async fn fetch_features(
        &self,
        session: &Session,
        request: &RunRequest,
        center: Coordinate,
        radius_m: f64,
    ) -> Result<(String, FetchResult)> {
        let candidates = request.candidate_endpoints();
        if candidates.is_empty() {
            return Err(FootprintError::ConfigInvalid {
                key: "endpoint".to_string(),
                reason: "no geodata endpoint configured".to_string(),
            });
        }

        let mut last_error = None;

        for endpoint in candidates {
            let key = CacheKey::new(endpoint, center, radius_m, request.timeout_secs);

            if !request.force_refresh {
                if let Some(hit) = session.cache.get(&key) {
                    debug!(%key, "Run cache hit");
                    return Ok((endpoint.clone(), hit));
                }
                debug!(%key, "Run cache miss");
            }

            let fetch_request = FetchRequest {
                center,
                radius_m,
                endpoint: endpoint.clone(),
                timeout_secs: request.timeout_secs,
                retries: request.retries,
            };

            match self.fetcher.fetch(&fetch_request).await {
                Ok(result) => {
                    session.cache.put(key, &result);
                    return Ok((endpoint.clone(), result));
                }
                Err(err) => {
                    if candidates.len() > 1 {
                        warn!(%endpoint, error = %err, "Endpoint exhausted, trying next mirror");
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FootprintError::ConfigInvalid {
            key: "endpoint".to_string(),
            reason: "no geodata endpoint configured".to_string(),
        }))
    }
}
