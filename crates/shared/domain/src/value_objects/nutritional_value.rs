//! Nutritional value object.

use serde::{Deserialize, Serialize};

use super::finite;
use crate::constants::{KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN};
use crate::error::{DomainError, DomainResult};

/// Energy and nutrient amounts. Calories in kcal, sodium in mg, the rest in grams.
///
/// All amounts are non-negative. `add` and `multiply` return new instances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionalValue {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    #[serde(default)]
    fiber: f64,
    #[serde(default)]
    sugar: f64,
    #[serde(default)]
    sodium: f64,
}

fn non_negative(value: f64, field: &str) -> DomainResult<f64> {
    let value = finite(value, field)?;
    if value < 0.0 {
        return Err(DomainError::validation(format!("{} cannot be negative", field))
            .with_meta("field", field)
            .with_meta("value", value));
    }
    Ok(value)
}

impl NutritionalValue {
    /// Required amounts; fiber, sugar and sodium start at zero.
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> DomainResult<Self> {
        Ok(Self {
            calories: non_negative(calories, "calories")?,
            protein: non_negative(protein, "protein")?,
            carbs: non_negative(carbs, "carbs")?,
            fat: non_negative(fat, "fat")?,
            fiber: 0.0,
            sugar: 0.0,
            sodium: 0.0,
        })
    }

    pub fn with_fiber(self, grams: f64) -> DomainResult<Self> {
        Ok(Self {
            fiber: non_negative(grams, "fiber")?,
            ..self
        })
    }

    pub fn with_sugar(self, grams: f64) -> DomainResult<Self> {
        Ok(Self {
            sugar: non_negative(grams, "sugar")?,
            ..self
        })
    }

    pub fn with_sodium(self, milligrams: f64) -> DomainResult<Self> {
        Ok(Self {
            sodium: non_negative(milligrams, "sodium")?,
            ..self
        })
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn calories(&self) -> f64 {
        self.calories
    }

    pub fn protein(&self) -> f64 {
        self.protein
    }

    pub fn carbs(&self) -> f64 {
        self.carbs
    }

    pub fn fat(&self) -> f64 {
        self.fat
    }

    pub fn fiber(&self) -> f64 {
        self.fiber
    }

    pub fn sugar(&self) -> f64 {
        self.sugar
    }

    pub fn sodium(&self) -> f64 {
        self.sodium
    }

    /// Component-wise sum. Sums of non-negative amounts stay valid.
    pub fn add(&self, other: &NutritionalValue) -> NutritionalValue {
        NutritionalValue {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
            sugar: self.sugar + other.sugar,
            sodium: self.sodium + other.sodium,
        }
    }

    /// Scale every amount, e.g. by a number of servings.
    ///
    /// # Errors
    /// Returns a validation error for a negative or non-finite factor.
    pub fn multiply(&self, factor: f64) -> DomainResult<NutritionalValue> {
        let factor = non_negative(factor, "factor")?;
        Ok(NutritionalValue {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
            fiber: self.fiber * factor,
            sugar: self.sugar * factor,
            sodium: self.sodium * factor,
        })
    }

    /// Energy implied by the macronutrients (4/4/9 kcal per gram).
    pub fn calories_from_macros(&self) -> f64 {
        self.protein * KCAL_PER_GRAM_PROTEIN
            + self.carbs * KCAL_PER_GRAM_CARBS
            + self.fat * KCAL_PER_GRAM_FAT
    }
}
