use async_trait::async_trait;

use super::TransportError;
use crate::models::Coordinate;

/// Port for free-text place lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up a place name.
    ///
    /// Returns `Ok(None)` when the service answered but found nothing, and a
    /// [`TransportError`] when the service could not be reached. Callers make a
    /// single call; no retry is implied.
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, TransportError>;
}
