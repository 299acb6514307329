//! In-process fakes for the network ports

#![allow(dead_code)]

use async_trait::async_trait;
use footprint_core::models::Coordinate;
use footprint_core::ports::{GeodataTransport, Geocoder, TransportError};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const PRIMARY: &str = "https://overpass-api.de/api/interpreter";
pub const MIRROR: &str = "https://overpass.kumi.systems/api/interpreter";

/// A request seen by the scripted transport
#[derive(Debug, Clone)]
pub struct Call {
    pub endpoint: String,
    pub query: String,
    pub timeout: Duration,
}

/// Transport answering from per-endpoint queues.
///
/// An endpoint with no queued answer fails with a connection error.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<String, TransportError>>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, endpoint: &str, response: Result<String, TransportError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Queue `n` connection failures followed by one success
    pub fn fail_then_succeed(mut self, endpoint: &str, failures: usize, body: String) -> Self {
        for i in 0..failures {
            self = self.respond(endpoint, Err(TransportError::Connection(format!("failure {}", i + 1))));
        }
        self.respond(endpoint, Ok(body))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GeodataTransport for ScriptedTransport {
    async fn post_query(
        &self,
        endpoint: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(Call {
            endpoint: endpoint.to_string(),
            query: query.to_string(),
            timeout,
        });

        self.responses
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::Connection("connection refused".to_string())))
    }
}

/// Geocoder returning a fixed answer
pub enum GeocoderAnswer {
    Found(f64, f64),
    Nothing,
    Down,
}

pub struct StaticGeocoder {
    answer: GeocoderAnswer,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    pub fn new(answer: GeocoderAnswer) -> Self {
        Self { answer, calls: AtomicUsize::new(0) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<Coordinate>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            GeocoderAnswer::Found(lat, lon) => Ok(Coordinate::new(lat, lon).ok()),
            GeocoderAnswer::Nothing => Ok(None),
            GeocoderAnswer::Down => Err(TransportError::Timeout(Duration::from_secs(10))),
        }
    }
}

/// Overpass response with `valid` square buildings near (lat, lon), plus one
/// node and one degenerate way that must not be counted
pub fn overpass_body(valid: usize, lat: f64, lon: f64) -> String {
    let mut elements = Vec::new();
    for i in 0..valid {
        let x = lon + i as f64 * 0.0002;
        elements.push(json!({
            "type": "way",
            "id": i as i64 + 1,
            "tags": {"building": "yes"},
            "geometry": [
                {"lat": lat, "lon": x},
                {"lat": lat, "lon": x + 0.0001},
                {"lat": lat + 0.0001, "lon": x + 0.0001},
                {"lat": lat + 0.0001, "lon": x},
                {"lat": lat, "lon": x}
            ]
        }));
    }
    elements.push(json!({"type": "node", "id": 900001, "lat": lat, "lon": lon}));
    elements.push(json!({
        "type": "way",
        "id": 900002,
        "geometry": [{"lat": lat, "lon": lon}, {"lat": lat + 0.001, "lon": lon}]
    }));

    json!({"version": 0.6, "generator": "Overpass API", "elements": elements}).to_string()
}
