use serde::Serialize;

use crate::error::{FootprintError, Result};
use crate::units::DistanceUnit;

/// Search radius as entered, normalized to meters on demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusSpec {
    magnitude: f64,
    unit: DistanceUnit,
}

impl RadiusSpec {
    /// Create a radius; the magnitude must be finite and strictly positive
    pub fn new(magnitude: f64, unit: DistanceUnit) -> Result<Self> {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(FootprintError::InvalidRadius {
                value: magnitude,
                reason: "radius must be a finite number greater than zero".to_string(),
            });
        }
        Ok(Self { magnitude, unit })
    }

    pub fn kilometers(magnitude: f64) -> Result<Self> {
        Self::new(magnitude, DistanceUnit::Kilometers)
    }

    pub fn miles(magnitude: f64) -> Result<Self> {
        Self::new(magnitude, DistanceUnit::Miles)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// Radius in meters
    pub fn to_meters(&self) -> f64 {
        self.unit.to_meters(self.magnitude)
    }

    /// Check the magnitude against inclusive bounds expressed in the radius unit
    pub fn check_bounds(&self, min: f64, max: f64) -> Result<()> {
        if self.magnitude < min || self.magnitude > max {
            return Err(FootprintError::InvalidRadius {
                value: self.magnitude,
                reason: format!("radius must be between {} and {} {}", min, max, self.unit),
            });
        }
        Ok(())
    }
}
