//! Shared configuration structures.

use domain::constants::{
    DEFAULT_ACTIVITY_LEVEL, DEFAULT_CARBS_PCT, DEFAULT_COMPLIANCE_TOLERANCE_PCT, DEFAULT_FAT_PCT,
    DEFAULT_PROTEIN_PCT,
};
use domain::MacroSplit;
use serde::{Deserialize, Serialize};

/// Default page number
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound for items per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// Defaults fed into the nutrition calculator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NutritionConfig {
    /// Activity multiplier applied to BMR
    pub activity_level: f64,
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
    /// Allowed deviation from target, in percent
    pub compliance_tolerance_pct: f64,
}

impl NutritionConfig {
    pub fn macro_split(&self) -> MacroSplit {
        MacroSplit {
            protein_pct: self.protein_pct,
            carbs_pct: self.carbs_pct,
            fat_pct: self.fat_pct,
        }
    }
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            activity_level: DEFAULT_ACTIVITY_LEVEL,
            protein_pct: DEFAULT_PROTEIN_PCT,
            carbs_pct: DEFAULT_CARBS_PCT,
            fat_pct: DEFAULT_FAT_PCT,
            compliance_tolerance_pct: DEFAULT_COMPLIANCE_TOLERANCE_PCT,
        }
    }
}

/// Pagination limits for list queries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}
