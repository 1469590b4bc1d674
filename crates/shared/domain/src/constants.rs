//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ADMIN";

/// Dietitian role, owns clients and diet plans
pub const ROLE_DIETITIAN: &str = "DIETITIAN";

/// Client role (self-service access)
pub const ROLE_CLIENT: &str = "CLIENT";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_DIETITIAN, ROLE_CLIENT];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Exclusive lower / inclusive upper bound for body weight in kilograms
pub const MAX_WEIGHT_KG: f64 = 500.0;

/// Inclusive bounds for body height in centimeters
pub const MIN_HEIGHT_CM: f64 = 50.0;
pub const MAX_HEIGHT_CM: f64 = 300.0;

/// Maximum body fat percentage
pub const MAX_BODY_FAT_PERCENTAGE: f64 = 100.0;

// =============================================================================
// Unit conversion
// =============================================================================

pub const POUNDS_PER_KILOGRAM: f64 = 2.204_622_621_85;
pub const CENTIMETERS_PER_INCH: f64 = 2.54;
pub const INCHES_PER_FOOT: f64 = 12.0;

// =============================================================================
// Nutrition
// =============================================================================

/// Energy density of protein and carbohydrates (kcal per gram)
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;

/// Energy density of fat (kcal per gram)
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Recommended fiber per 1000 kcal
pub const FIBER_GRAMS_PER_1000_KCAL: f64 = 14.0;

/// Sedentary activity multiplier used when none is given
pub const DEFAULT_ACTIVITY_LEVEL: f64 = 1.2;

/// Default macro split, percent of total calories
pub const DEFAULT_PROTEIN_PCT: f64 = 30.0;
pub const DEFAULT_CARBS_PCT: f64 = 40.0;
pub const DEFAULT_FAT_PCT: f64 = 30.0;

/// Allowed deviation when checking that a macro split sums to 100
pub const MACRO_SPLIT_TOLERANCE: f64 = 0.1;

/// Default compliance tolerance in percent
pub const DEFAULT_COMPLIANCE_TOLERANCE_PCT: f64 = 10.0;

/// Fiber is compliant at or above this share of target
pub const FIBER_MIN_COMPLIANCE_PCT: f64 = 80.0;

// =============================================================================
// Diet plans
// =============================================================================

/// Version assigned to every freshly created diet plan
pub const INITIAL_PLAN_VERSION: u32 = 1;
