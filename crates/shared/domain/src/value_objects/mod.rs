//! Value objects - immutable, self-validating scalars.
//!
//! Every constructor fed by caller input returns a `DomainResult`.
//! Deserialization is trusted rehydration and does not re-validate.

mod date_range;
mod email;
mod height;
mod nutritional_value;
mod password;
mod weight;

pub use date_range::DateRange;
pub use email::Email;
pub use height::Height;
pub use nutritional_value::NutritionalValue;
pub use password::Password;
pub use weight::Weight;

/// Reject NaN and infinities before range checks.
pub(crate) fn finite(value: f64, field: &str) -> crate::DomainResult<f64> {
    crate::error::ensure(value.is_finite(), || {
        crate::DomainError::validation(format!("{} must be a finite number", field))
            .with_meta("field", field)
    })?;
    Ok(value)
}

/// Round half away from zero to the given number of decimals.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
