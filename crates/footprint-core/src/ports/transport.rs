use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure to get a usable response from a remote service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

/// Port for posting a query to a geodata service
#[async_trait]
pub trait GeodataTransport: Send + Sync {
    /// POST `query` as the form field `data` to `endpoint` and return the body.
    ///
    /// `timeout` bounds the whole HTTP exchange. Any non-2xx status must be
    /// reported as [`TransportError::Status`].
    async fn post_query(
        &self,
        endpoint: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<String, TransportError>;
}
