//! Body height value object.

use serde::{Deserialize, Serialize};

use super::finite;
use crate::constants::{CENTIMETERS_PER_INCH, INCHES_PER_FOOT, MAX_HEIGHT_CM, MIN_HEIGHT_CM};
use crate::error::{DomainError, DomainResult};

/// Height in centimeters, within `[50, 300]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Height(f64);

impl Height {
    pub fn from_centimeters(centimeters: f64) -> DomainResult<Self> {
        let centimeters = finite(centimeters, "height")?;
        if !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&centimeters) {
            return Err(DomainError::validation(format!(
                "Height must be between {} and {} cm",
                MIN_HEIGHT_CM, MAX_HEIGHT_CM
            ))
            .with_meta("field", "height")
            .with_meta("value", centimeters));
        }
        Ok(Self(centimeters))
    }

    pub fn from_inches(inches: f64) -> DomainResult<Self> {
        Self::from_centimeters(finite(inches, "height")? * CENTIMETERS_PER_INCH)
    }

    pub fn from_feet_and_inches(feet: u32, inches: f64) -> DomainResult<Self> {
        Self::from_inches(f64::from(feet) * INCHES_PER_FOOT + finite(inches, "height")?)
    }

    pub fn centimeters(&self) -> f64 {
        self.0
    }

    pub fn meters(&self) -> f64 {
        self.0 / 100.0
    }

    pub fn inches(&self) -> f64 {
        self.0 / CENTIMETERS_PER_INCH
    }

    /// Whole feet plus remaining inches.
    pub fn feet_and_inches(&self) -> (u32, f64) {
        let total = self.inches();
        let feet = (total / INCHES_PER_FOOT).floor();
        (feet as u32, total - feet * INCHES_PER_FOOT)
    }
}
