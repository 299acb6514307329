//! Retry and backoff behavior of the geodata fetcher, measured on tokio's
//! paused clock

mod common;

use common::{overpass_body, ScriptedTransport, PRIMARY};
use footprint_core::fetch::{FetchRequest, GeodataFetcher};
use footprint_core::models::Coordinate;
use footprint_core::ports::TransportError;
use footprint_core::FootprintError;
use std::time::Duration;
use tokio::time::Instant;

fn fetch_request(retries: u32) -> FetchRequest {
    FetchRequest {
        center: Coordinate::new(37.4221, -122.0841).unwrap(),
        radius_m: 1000.0,
        endpoint: PRIMARY.to_string(),
        timeout_secs: 120,
        retries,
    }
}

#[tokio::test(start_paused = true)]
async fn test_succeeds_on_last_allowed_attempt() {
    let transport = ScriptedTransport::new().fail_then_succeed(PRIMARY, 2, overpass_body(5, 37.4221, -122.0841));
    let fetcher = GeodataFetcher::new(transport);

    let started = Instant::now();
    let result = fetcher.fetch(&fetch_request(2)).await.unwrap();

    assert_eq!(result.attempts, 3);
    assert!(!result.cache_hit);
    assert_eq!(result.features.len(), 7);
    assert_eq!(fetcher.transport().call_count(), 3);
    // 1s after the first failure, 2s after the second
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_retries_plus_one() {
    let transport = ScriptedTransport::new().fail_then_succeed(PRIMARY, 3, overpass_body(1, 0.0, 0.0));
    let fetcher = GeodataFetcher::new(transport);

    let started = Instant::now();
    let err = fetcher.fetch(&fetch_request(2)).await.unwrap_err();

    match err {
        FootprintError::FetchFailed { endpoint, attempts, cause } => {
            assert_eq!(endpoint, PRIMARY);
            assert_eq!(attempts, 3);
            assert!(cause.contains("failure 3"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fetcher.transport().call_count(), 3);
    // No wait after the final attempt
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_means_one_attempt() {
    let fetcher = GeodataFetcher::new(ScriptedTransport::new());

    let started = Instant::now();
    let err = fetcher.fetch(&fetch_request(0)).await.unwrap_err();

    assert!(matches!(err, FootprintError::FetchFailed { attempts: 1, .. }));
    assert_eq!(fetcher.transport().call_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_is_capped_at_five_seconds() {
    let transport = ScriptedTransport::new().fail_then_succeed(PRIMARY, 4, overpass_body(1, 0.0, 0.0));
    let fetcher = GeodataFetcher::new(transport);

    let started = Instant::now();
    let result = fetcher.fetch(&fetch_request(6)).await.unwrap();

    assert_eq!(result.attempts, 5);
    // 1 + 2 + 4 + 5
    assert_eq!(started.elapsed(), Duration::from_secs(12));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_body_and_status_are_retried() {
    let transport = ScriptedTransport::new()
        .respond(PRIMARY, Ok("<html>busy</html>".to_string()))
        .respond(PRIMARY, Err(TransportError::Status { status: 503, body: String::new() }))
        .respond(PRIMARY, Ok(r#"{"elements": "oops"}"#.to_string()))
        .respond(PRIMARY, Ok(overpass_body(2, 0.0, 0.0)));
    let fetcher = GeodataFetcher::new(transport);

    let result = fetcher.fetch(&fetch_request(3)).await.unwrap();
    assert_eq!(result.attempts, 4);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cause_is_reported() {
    let transport = ScriptedTransport::new()
        .respond(PRIMARY, Err(TransportError::Timeout(Duration::from_secs(150))));
    let fetcher = GeodataFetcher::new(transport);

    let err = fetcher.fetch(&fetch_request(0)).await.unwrap_err();
    assert!(err.to_string().contains("request timed out after 150s"));
}

#[tokio::test]
async fn test_every_attempt_uses_extended_timeout() {
    let transport = ScriptedTransport::new().respond(PRIMARY, Ok(overpass_body(1, 0.0, 0.0)));
    let fetcher = GeodataFetcher::new(transport);

    let mut request = fetch_request(0);
    request.timeout_secs = 10;
    fetcher.fetch(&request).await.unwrap();

    let calls = fetcher.transport().calls();
    assert_eq!(calls[0].timeout, Duration::from_secs(40));
    assert!(calls[0].query.contains("[timeout:10]"));
}
