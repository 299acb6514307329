//! Port trait definitions
//!
//! These traits define the network collaborators that adapters must implement.

pub mod geocoder;
pub mod transport;

pub use geocoder::Geocoder;
pub use transport::{GeodataTransport, TransportError};
