pub mod coordinate;
pub mod feature;
pub mod location;
pub mod polygon;
pub mod radius;
pub mod run;

pub use coordinate::Coordinate;
pub use feature::{FeatureKind, FetchResult, RawFeature};
pub use location::{InputMode, LocationSpec, ResolutionSource, ResolvedLocation};
pub use polygon::{BuildingPolygon, PolygonRejection};
pub use radius::RadiusSpec;
pub use run::{DensityStats, FetchProvenance, RunResult};
