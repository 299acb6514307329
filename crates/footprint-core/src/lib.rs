//! Footprint Core - Domain models, configuration and the density pipeline
//!
//! This crate resolves a search center, fetches building footprints through the
//! [`ports::GeodataTransport`] port, turns them into validated polygons and
//! computes building density over the search circle.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod ports;
pub mod processing;
pub mod resolver;
pub mod units;

pub use error::{FootprintError, Result};
