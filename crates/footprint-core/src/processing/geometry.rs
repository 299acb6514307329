use tracing::debug;

use crate::models::{BuildingPolygon, RawFeature};

/// Polygons that survived validation, plus how many features were dropped
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    pub polygons: Vec<BuildingPolygon>,
    /// Way/relation features rejected for degenerate or invalid geometry
    pub discarded: usize,
    /// Features ignored because of their type or an empty ring
    pub skipped: usize,
}

impl BuildOutcome {
    /// Buildings found; equal to the number of polygons by construction
    pub fn count(&self) -> usize {
        self.polygons.len()
    }
}

/// Convert raw features into building polygons.
///
/// Only ways and relations with a non-empty ring are considered. Features whose
/// ring cannot form a valid polygon are dropped without failing the batch.
pub fn build_polygons(features: &[RawFeature]) -> BuildOutcome {
    let mut outcome = BuildOutcome::default();

    for feature in features {
        if !feature.kind.is_areal() || feature.ring.is_empty() {
            outcome.skipped += 1;
            continue;
        }

        match BuildingPolygon::from_ring(&feature.ring) {
            Ok(polygon) => {
                outcome.polygons.push(polygon.with_id(feature.id).with_tags(feature.tags.clone()))
            }
            Err(reason) => {
                debug!(id = ?feature.id, %reason, "Discarding building geometry");
                outcome.discarded += 1;
            }
        }
    }

    debug!(
        built = outcome.polygons.len(),
        discarded = outcome.discarded,
        skipped = outcome.skipped,
        "Built building polygons"
    );

    outcome
}
