//! Shared reqwest plumbing

use footprint_core::error::{FootprintError, Result};
use footprint_core::ports::TransportError;
use std::time::Duration;

/// Longest response body kept in a status error
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Build a client that identifies itself with `user_agent` on every request
pub(crate) fn build_client(user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| FootprintError::ConfigInvalid {
            key: "user_agent".to_string(),
            reason: format!("Failed to create HTTP client: {}", e),
        })
}

/// Map a reqwest failure onto the transport error taxonomy
pub(crate) fn classify(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else if error.is_decode() || error.is_body() {
        TransportError::MalformedBody(error.to_string())
    } else {
        TransportError::Connection(error.to_string())
    }
}

/// Read the body of a response, turning non-2xx statuses into errors
pub(crate) async fn read_body(
    response: reqwest::Response,
    timeout: Duration,
) -> std::result::Result<String, TransportError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| classify(e, timeout))?;

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body: truncate(&body, MAX_ERROR_BODY_CHARS),
        });
    }

    Ok(body)
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_body() {
        assert_eq!(truncate("  rate limited \n", 200), "rate limited");
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "é".repeat(300);
        let cut = truncate(&body, 10);
        assert_eq!(cut, format!("{}...", "é".repeat(10)));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client("building-density-app").is_ok());
    }
}
