//! Nutritional calculator.
//!
//! Stateless functions: energy estimation (Mifflin-St Jeor), macro
//! distribution, goal compliance scoring and nutrient totals.

use serde::{Deserialize, Serialize};

use crate::client::Gender;
use crate::constants::{
    DEFAULT_CARBS_PCT, DEFAULT_COMPLIANCE_TOLERANCE_PCT, DEFAULT_FAT_PCT, DEFAULT_PROTEIN_PCT,
    FIBER_GRAMS_PER_1000_KCAL, FIBER_MIN_COMPLIANCE_PCT, KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT,
    KCAL_PER_GRAM_PROTEIN, MACRO_SPLIT_TOLERANCE,
};
use crate::error::{DomainError, DomainResult};
use crate::value_objects::{round_to, Height, NutritionalValue, Weight};

/// Activity multipliers applied to BMR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// 1-3 days/week
    LightlyActive,
    /// 3-5 days/week
    ModeratelyActive,
    /// 6-7 days/week
    VeryActive,
    /// Physical job or twice-daily training
    ExtraActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

/// Share of total calories per macronutrient, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self {
            protein_pct: DEFAULT_PROTEIN_PCT,
            carbs_pct: DEFAULT_CARBS_PCT,
            fat_pct: DEFAULT_FAT_PCT,
        }
    }
}

/// Daily gram targets derived from a calorie budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub fiber: u32,
}

/// Compliance of a single nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientCompliance {
    /// actual / target * 100, rounded to two decimals
    pub percentage: f64,
    pub compliant: bool,
}

/// Daily targets to score intake against. `None` leaves a nutrient unscored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceTargets {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
}

impl From<&NutritionalValue> for ComplianceTargets {
    fn from(target: &NutritionalValue) -> Self {
        Self {
            calories: Some(target.calories()),
            protein: Some(target.protein()),
            carbs: Some(target.carbs()),
            fat: Some(target.fat()),
            fiber: Some(target.fiber()),
        }
    }
}

/// Per-nutrient results; a nutrient without a target is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<NutrientCompliance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<NutrientCompliance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<NutrientCompliance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<NutrientCompliance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber: Option<NutrientCompliance>,
    pub overall_compliant: bool,
    pub warnings: Vec<String>,
}

fn positive(value: f64, field: &str) -> DomainResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::validation(format!("{} must be greater than 0", field))
            .with_meta("field", field));
    }
    Ok(value)
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day (unrounded).
///
/// # Errors
/// Fails for non-positive inputs and for [`Gender::Other`], which the
/// equation does not cover.
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> DomainResult<f64> {
    let weight_kg = positive(weight_kg, "weight")?;
    let height_cm = positive(height_cm, "height")?;
    let age = positive(f64::from(age), "age")?;

    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    match gender {
        Gender::Male => Ok(base + 5.0),
        Gender::Female => Ok(base - 161.0),
        Gender::Other => Err(DomainError::validation(
            "Energy estimation requires gender MALE or FEMALE",
        )
        .with_meta("field", "gender")),
    }
}

/// Total daily energy expenditure: BMR × `activity_level`, rounded.
///
/// Pass [`crate::constants::DEFAULT_ACTIVITY_LEVEL`] for the sedentary default.
pub fn daily_calories(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    activity_level: f64,
) -> DomainResult<u32> {
    let activity_level = positive(activity_level, "activity level")?;
    let bmr = basal_metabolic_rate(weight_kg, height_cm, age, gender)?;
    Ok((bmr * activity_level).round().max(0.0) as u32)
}

/// Split a calorie budget into gram targets.
///
/// # Errors
/// Fails unless the three percentages sum to 100 (±0.1).
pub fn macronutrients(total_calories: f64, split: MacroSplit) -> DomainResult<MacroTargets> {
    if !total_calories.is_finite() || total_calories < 0.0 {
        return Err(DomainError::validation("Total calories cannot be negative")
            .with_meta("field", "total_calories"));
    }

    let sum = split.protein_pct + split.carbs_pct + split.fat_pct;
    if (sum - 100.0).abs() > MACRO_SPLIT_TOLERANCE {
        return Err(DomainError::validation(format!(
            "Macronutrient percentages must sum to 100 (got {})",
            sum
        ))
        .with_meta("field", "macro_split"));
    }

    let grams = |pct: f64, kcal_per_gram: f64| (total_calories * pct / 100.0 / kcal_per_gram).round() as u32;

    Ok(MacroTargets {
        protein: grams(split.protein_pct, KCAL_PER_GRAM_PROTEIN),
        carbs: grams(split.carbs_pct, KCAL_PER_GRAM_CARBS),
        fat: grams(split.fat_pct, KCAL_PER_GRAM_FAT),
        fiber: (total_calories / 1000.0 * FIBER_GRAMS_PER_1000_KCAL).round() as u32,
    })
}

/// Unrounded actual / target * 100. Multiplying first keeps exact
/// boundaries such as 2200 of 2000 at 110.
fn ratio_pct(actual: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return if actual <= 0.0 { 100.0 } else { f64::INFINITY };
    }
    actual * 100.0 / target
}

fn symmetric(actual: f64, target: f64, tolerance_pct: f64) -> NutrientCompliance {
    let raw = ratio_pct(actual, target);
    NutrientCompliance {
        percentage: round_to(raw, 2),
        compliant: raw >= 100.0 - tolerance_pct && raw <= 100.0 + tolerance_pct,
    }
}

fn at_least(actual: f64, target: f64, floor_pct: f64) -> NutrientCompliance {
    let raw = ratio_pct(actual, target);
    NutrientCompliance { percentage: round_to(raw, 2), compliant: raw >= floor_pct }
}

/// Score `actual` intake against every dimension of `target`.
///
/// Calories, protein, carbs and fat must land within ±`tolerance_pct` of
/// target. Fiber only has a floor at 80% of target.
pub fn check_compliance(actual: &NutritionalValue, target: &NutritionalValue, tolerance_pct: f64) -> ComplianceReport {
    check_targets(actual, &ComplianceTargets::from(target), tolerance_pct)
}

/// Score `actual` intake against the targets that are set.
///
/// Unset targets are skipped: they produce no result, no warning and do
/// not affect `overall_compliant`.
pub fn check_targets(actual: &NutritionalValue, targets: &ComplianceTargets, tolerance_pct: f64) -> ComplianceReport {
    let calories = targets.calories.map(|t| symmetric(actual.calories(), t, tolerance_pct));
    let protein = targets.protein.map(|t| symmetric(actual.protein(), t, tolerance_pct));
    let carbs = targets.carbs.map(|t| symmetric(actual.carbs(), t, tolerance_pct));
    let fat = targets.fat.map(|t| symmetric(actual.fat(), t, tolerance_pct));
    let fiber = targets.fiber.map(|t| at_least(actual.fiber(), t, FIBER_MIN_COMPLIANCE_PCT));

    let mut warnings = Vec::new();
    if let Some(result) = calories.filter(|c| !c.compliant) {
        let direction = if result.percentage > 100.0 { "above" } else { "below" };
        warnings.push(format!(
            "Calorie intake is {} target ({:.1}% of target)",
            direction, result.percentage
        ));
    }
    for (name, result) in [("Protein", protein), ("Carbohydrate", carbs), ("Fat", fat)] {
        if let Some(result) = result.filter(|r| !r.compliant) {
            warnings.push(format!(
                "{} intake is outside the target range ({:.1}% of target)",
                name, result.percentage
            ));
        }
    }
    if let Some(result) = fiber.filter(|f| !f.compliant) {
        warnings.push(format!(
            "Fiber intake is below {}% of target ({:.1}% of target)",
            FIBER_MIN_COMPLIANCE_PCT, result.percentage
        ));
    }

    ComplianceReport {
        overall_compliant: [calories, protein, carbs, fat, fiber]
            .iter()
            .flatten()
            .all(|result| result.compliant),
        calories,
        protein,
        carbs,
        fat,
        fiber,
        warnings,
    }
}

/// [`check_compliance`] with the default 10% tolerance.
pub fn check_compliance_default(actual: &NutritionalValue, target: &NutritionalValue) -> ComplianceReport {
    check_compliance(actual, target, DEFAULT_COMPLIANCE_TOLERANCE_PCT)
}

/// Total of all values; zero for an empty slice.
pub fn sum(values: &[NutritionalValue]) -> NutritionalValue {
    values
        .iter()
        .fold(NutritionalValue::zero(), |total, value| total.add(value))
}

/// kg / m², rounded to one decimal.
pub fn body_mass_index(weight: &Weight, height: &Height) -> f64 {
    let meters = height.meters();
    round_to(weight.kilograms() / (meters * meters), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_ACTIVITY_LEVEL;
    use crate::error::ErrorKind;

    fn target() -> NutritionalValue {
        NutritionalValue::new(2000.0, 150.0, 200.0, 67.0)
            .and_then(|v| v.with_fiber(28.0))
            .unwrap()
    }

    #[test]
    fn test_bmr_by_gender() {
        let male = basal_metabolic_rate(80.0, 180.0, 30, Gender::Male).unwrap();
        let female = basal_metabolic_rate(80.0, 180.0, 30, Gender::Female).unwrap();
        assert_eq!(male, 1780.0);
        assert_eq!(female, 1614.0);
        assert!(basal_metabolic_rate(80.0, 180.0, 30, Gender::Other).is_err());
    }

    #[test]
    fn test_daily_calories_applies_activity() {
        assert_eq!(daily_calories(80.0, 180.0, 30, Gender::Male, DEFAULT_ACTIVITY_LEVEL).unwrap(), 2136);
        assert_eq!(
            daily_calories(60.0, 165.0, 25, Gender::Female, ActivityLevel::ModeratelyActive.multiplier()).unwrap(),
            2085
        );
        assert!(daily_calories(0.0, 180.0, 30, Gender::Male, 1.2).is_err());
        assert!(daily_calories(80.0, 180.0, 30, Gender::Male, 0.0).is_err());
    }

    #[test]
    fn test_macronutrients_default_split() {
        let targets = macronutrients(2000.0, MacroSplit::default()).unwrap();
        assert_eq!(targets, MacroTargets { protein: 150, carbs: 200, fat: 67, fiber: 28 });
    }

    #[test]
    fn test_macronutrients_split_must_sum_to_100() {
        let split = MacroSplit { protein_pct: 30.0, carbs_pct: 40.0, fat_pct: 31.0 };
        let err = macronutrients(2000.0, split).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let close = MacroSplit { protein_pct: 30.05, carbs_pct: 40.0, fat_pct: 30.0 };
        assert!(macronutrients(2000.0, close).is_ok());
    }

    #[test]
    fn test_compliance_at_exact_target() {
        let report = check_compliance_default(&target(), &target());
        assert!(report.overall_compliant);
        assert!(report.warnings.is_empty());
        assert_eq!(report.calories.unwrap().percentage, 100.0);
    }

    #[test]
    fn test_calorie_boundary_is_inclusive() {
        let at_boundary = NutritionalValue::new(2200.0, 150.0, 200.0, 67.0)
            .and_then(|v| v.with_fiber(28.0))
            .unwrap();
        let report = check_compliance(&at_boundary, &target(), 10.0);
        assert!(report.calories.unwrap().compliant);
        assert!(report.overall_compliant);

        let past_boundary = NutritionalValue::new(2200.2, 150.0, 200.0, 67.0)
            .and_then(|v| v.with_fiber(28.0))
            .unwrap();
        let report = check_compliance(&past_boundary, &target(), 10.0);
        assert_eq!(report.calories.unwrap().percentage, 110.01);
        assert!(!report.calories.unwrap().compliant);
        assert!(!report.overall_compliant);
        assert!(report.warnings[0].contains("above"));
    }

    #[test]
    fn test_calories_below_target_warning() {
        let low = NutritionalValue::new(1500.0, 150.0, 200.0, 67.0)
            .and_then(|v| v.with_fiber(28.0))
            .unwrap();
        let report = check_compliance_default(&low, &target());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("below"));
    }

    #[test]
    fn test_fiber_has_no_upper_bound() {
        let lots = NutritionalValue::new(2000.0, 150.0, 200.0, 67.0)
            .and_then(|v| v.with_fiber(90.0))
            .unwrap();
        assert!(check_compliance_default(&lots, &target()).fiber.unwrap().compliant);

        let little = NutritionalValue::new(2000.0, 150.0, 200.0, 67.0)
            .and_then(|v| v.with_fiber(22.0))
            .unwrap();
        let report = check_compliance_default(&little, &target());
        assert!(!report.fiber.unwrap().compliant);
        assert!(!report.overall_compliant);
        assert!(report.warnings[0].starts_with("Fiber"));
    }

    #[test]
    fn test_zero_target_dimension() {
        let zero_target = NutritionalValue::zero();
        let report = check_compliance_default(&NutritionalValue::zero(), &zero_target);
        assert!(report.overall_compliant);

        let report = check_compliance_default(&target(), &zero_target);
        assert!(!report.calories.unwrap().compliant);
        assert!(report.fiber.unwrap().compliant);
    }

    #[test]
    fn test_tolerance_compares_before_rounding() {
        // 2200.08 / 2000 is 110.004%, which rounds to 110.0 for display
        let just_past = NutritionalValue::new(2200.08, 150.0, 200.0, 67.0)
            .and_then(|v| v.with_fiber(28.0))
            .unwrap();
        let report = check_compliance(&just_past, &target(), 10.0);
        let calories = report.calories.unwrap();
        assert_eq!(calories.percentage, 110.0);
        assert!(!calories.compliant);
        assert!(!report.overall_compliant);

        let fiber_just_short = NutritionalValue::new(2000.0, 150.0, 200.0, 67.0)
            .and_then(|v| v.with_fiber(22.3999))
            .unwrap();
        let report = check_compliance(&fiber_just_short, &target(), 10.0);
        let fiber = report.fiber.unwrap();
        assert_eq!(fiber.percentage, 80.0);
        assert!(!fiber.compliant);
    }

    #[test]
    fn test_unset_targets_are_skipped() {
        let targets = ComplianceTargets { calories: Some(2000.0), ..ComplianceTargets::default() };
        let intake = NutritionalValue::new(2000.0, 100.0, 250.0, 60.0).unwrap();
        let report = check_targets(&intake, &targets, 10.0);
        assert!(report.overall_compliant);
        assert!(report.warnings.is_empty());
        assert_eq!(report.calories.unwrap().percentage, 100.0);
        assert!(report.protein.is_none());
        assert!(report.fiber.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("protein").is_none());
    }

    #[test]
    fn test_no_targets_is_trivially_compliant() {
        let report = check_targets(&target(), &ComplianceTargets::default(), 10.0);
        assert!(report.overall_compliant);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_sum() {
        assert_eq!(sum(&[]), NutritionalValue::zero());

        let meal = NutritionalValue::new(500.0, 30.0, 50.0, 20.0).unwrap();
        let total = sum(&[meal, meal, meal]);
        assert_eq!(total.calories(), 1500.0);
        assert_eq!(total.fat(), 60.0);
    }

    #[test]
    fn test_body_mass_index() {
        let bmi = body_mass_index(
            &Weight::from_kilograms(70.0).unwrap(),
            &Height::from_centimeters(175.0).unwrap(),
        );
        assert_eq!(bmi, 22.9);
    }
}
