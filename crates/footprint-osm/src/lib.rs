//! Footprint OSM - HTTP adapters for OpenStreetMap services
//!
//! [`OverpassClient`] implements the geodata transport port against Overpass
//! API endpoints and [`NominatimGeocoder`] implements the geocoder port against
//! a Nominatim search endpoint.

pub mod http;
pub mod nominatim;
pub mod overpass;

// Re-export main types
pub use nominatim::NominatimGeocoder;
pub use overpass::OverpassClient;
