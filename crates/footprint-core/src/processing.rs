//! Turning fetched features into counts and densities.

pub mod density;
pub mod geometry;

pub use density::compute_density;
pub use geometry::{build_polygons, BuildOutcome};
