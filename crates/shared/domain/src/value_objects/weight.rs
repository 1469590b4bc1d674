//! Body weight value object.

use serde::{Deserialize, Serialize};

use super::finite;
use crate::constants::{MAX_WEIGHT_KG, POUNDS_PER_KILOGRAM};
use crate::error::{DomainError, DomainResult};

/// Weight in kilograms, within `(0, 500]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl Weight {
    pub fn from_kilograms(kilograms: f64) -> DomainResult<Self> {
        let kilograms = finite(kilograms, "weight")?;
        if kilograms <= 0.0 || kilograms > MAX_WEIGHT_KG {
            return Err(DomainError::validation(format!(
                "Weight must be greater than 0 and at most {} kg",
                MAX_WEIGHT_KG
            ))
            .with_meta("field", "weight")
            .with_meta("value", kilograms));
        }
        Ok(Self(kilograms))
    }

    pub fn from_pounds(pounds: f64) -> DomainResult<Self> {
        Self::from_kilograms(finite(pounds, "weight")? / POUNDS_PER_KILOGRAM)
    }

    pub fn kilograms(&self) -> f64 {
        self.0
    }

    pub fn pounds(&self) -> f64 {
        self.0 * POUNDS_PER_KILOGRAM
    }
}
