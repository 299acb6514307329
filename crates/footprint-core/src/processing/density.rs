use std::f64::consts::PI;

use crate::models::DensityStats;
use crate::units::{to_square_km, to_square_miles};

/// Circle areas at or below this many square meters count as degenerate
const MIN_AREA_M2: f64 = 1e-9;

/// Area of the search circle in square meters; zero for a degenerate radius
pub fn circle_area_m2(radius_m: f64) -> f64 {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return 0.0;
    }
    PI * radius_m * radius_m
}

/// Building density over a circle of `radius_m` meters.
///
/// A zero, negative or non-finite radius gives zero area and zero density.
pub fn compute_density(building_count: usize, radius_m: f64) -> DensityStats {
    let area_m2 = circle_area_m2(radius_m);
    if area_m2 <= MIN_AREA_M2 {
        return DensityStats::zero();
    }

    let area_sq_km = to_square_km(area_m2);
    let area_sq_miles = to_square_miles(area_m2);
    let count = building_count as f64;

    DensityStats {
        area_sq_km,
        area_sq_miles,
        per_sq_km: count / area_sq_km,
        per_sq_mile: count / area_sq_miles,
    }
}
