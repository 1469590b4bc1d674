//! Food item aggregate - an entry in the food catalogue.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{optional_text, required_text, DomainError, DomainResult};
use crate::value_objects::NutritionalValue;

/// Food groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodCategory {
    Proteins,
    Grains,
    Vegetables,
    Fruits,
    Dairy,
    FatsAndOils,
    Legumes,
    NutsAndSeeds,
    Beverages,
    Snacks,
    Other,
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the serde representation
        let name = match self {
            FoodCategory::Proteins => "PROTEINS",
            FoodCategory::Grains => "GRAINS",
            FoodCategory::Vegetables => "VEGETABLES",
            FoodCategory::Fruits => "FRUITS",
            FoodCategory::Dairy => "DAIRY",
            FoodCategory::FatsAndOils => "FATS_AND_OILS",
            FoodCategory::Legumes => "LEGUMES",
            FoodCategory::NutsAndSeeds => "NUTS_AND_SEEDS",
            FoodCategory::Beverages => "BEVERAGES",
            FoodCategory::Snacks => "SNACKS",
            FoodCategory::Other => "OTHER",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingUnit {
    G,
    Ml,
    Piece,
    Cup,
    Tbsp,
    Tsp,
}

/// Food item creation data transfer object
#[derive(Debug, Clone)]
pub struct CreateFoodItem {
    pub name: String,
    pub description: Option<String>,
    pub category: FoodCategory,
    pub serving_size: f64,
    pub serving_unit: ServingUnit,
    pub nutritional_value: NutritionalValue,
}

/// Persisted shape of a [`FoodItem`]. Nutrients are stored as flat columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItemProps {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: FoodCategory,
    pub serving_size: f64,
    pub serving_unit: ServingUnit,
    #[serde(flatten)]
    pub nutritional_value: NutritionalValue,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Nutrition figures are per one serving of `serving_size` `serving_unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodItem {
    props: FoodItemProps,
}

fn check_serving_size(serving_size: f64) -> DomainResult<()> {
    if !serving_size.is_finite() || serving_size <= 0.0 {
        return Err(DomainError::validation("Serving size must be greater than 0")
            .with_meta("field", "serving_size"));
    }
    Ok(())
}

impl FoodItem {
    pub fn create(id: Uuid, data: CreateFoodItem) -> DomainResult<Self> {
        check_serving_size(data.serving_size)?;
        let now = Utc::now();

        Ok(Self {
            props: FoodItemProps {
                id,
                name: required_text(&data.name, "Name")?,
                description: optional_text(data.description),
                category: data.category,
                serving_size: data.serving_size,
                serving_unit: data.serving_unit,
                nutritional_value: data.nutritional_value,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        })
    }

    /// Rehydrate from persisted data without validation.
    pub fn reconstitute(props: FoodItemProps) -> Self {
        Self { props }
    }

    pub fn to_props(&self) -> FoodItemProps {
        self.props.clone()
    }

    pub fn id(&self) -> Uuid {
        self.props.id
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }

    pub fn description(&self) -> Option<&str> {
        self.props.description.as_deref()
    }

    pub fn category(&self) -> FoodCategory {
        self.props.category
    }

    pub fn serving_size(&self) -> f64 {
        self.props.serving_size
    }

    pub fn serving_unit(&self) -> ServingUnit {
        self.props.serving_unit
    }

    pub fn nutritional_value(&self) -> NutritionalValue {
        self.props.nutritional_value
    }

    pub fn is_active(&self) -> bool {
        self.props.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.props.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.props.updated_at
    }

    /// Nutrition for `servings` servings.
    ///
    /// # Errors
    /// `servings` must be greater than 0.
    pub fn nutritional_value_for_servings(&self, servings: f64) -> DomainResult<NutritionalValue> {
        if !servings.is_finite() || servings <= 0.0 {
            return Err(DomainError::validation("Servings must be greater than 0")
                .with_meta("field", "servings"));
        }
        self.props.nutritional_value.multiply(servings)
    }

    /// Nutrition for an amount in grams. Only for gram-based servings.
    pub fn nutritional_value_for_grams(&self, grams: f64) -> DomainResult<NutritionalValue> {
        if self.props.serving_unit != ServingUnit::G {
            return Err(DomainError::business_rule(format!(
                "{} is not measured in grams",
                self.props.name
            ))
            .with_meta("serving_unit", format!("{:?}", self.props.serving_unit)));
        }
        self.nutritional_value_for_servings(grams / self.props.serving_size)
    }

    pub fn update_details(
        &mut self,
        name: &str,
        description: Option<String>,
        category: FoodCategory,
    ) -> DomainResult<()> {
        let name = required_text(name, "Name")?;
        self.props.name = name;
        self.props.description = optional_text(description);
        self.props.category = category;
        self.touch();
        Ok(())
    }

    pub fn update_serving(&mut self, serving_size: f64, serving_unit: ServingUnit) -> DomainResult<()> {
        check_serving_size(serving_size)?;
        self.props.serving_size = serving_size;
        self.props.serving_unit = serving_unit;
        self.touch();
        Ok(())
    }

    pub fn update_nutrition(&mut self, nutritional_value: NutritionalValue) {
        self.props.nutritional_value = nutritional_value;
        self.touch();
    }

    pub fn activate(&mut self) {
        self.props.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.props.is_active = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.props.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken() -> FoodItem {
        FoodItem::create(
            Uuid::new_v4(),
            CreateFoodItem {
                name: "Chicken breast".to_string(),
                description: None,
                category: FoodCategory::Proteins,
                serving_size: 100.0,
                serving_unit: ServingUnit::G,
                nutritional_value: NutritionalValue::new(165.0, 31.0, 0.0, 3.6).unwrap(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_servings_must_be_positive() {
        let food = chicken();
        assert!(food.nutritional_value_for_servings(0.0).is_err());
        assert!(food.nutritional_value_for_servings(-2.0).is_err());

        let double = food.nutritional_value_for_servings(2.0).unwrap();
        assert_eq!(double, food.nutritional_value().multiply(2.0).unwrap());
        assert_eq!(double.protein(), 62.0);
    }

    #[test]
    fn test_value_for_grams() {
        let food = chicken();
        let portion = food.nutritional_value_for_grams(150.0).unwrap();
        assert_eq!(portion.calories(), 247.5);
    }

    #[test]
    fn test_value_for_grams_requires_gram_unit() {
        let mut food = chicken();
        food.update_serving(1.0, ServingUnit::Piece).unwrap();
        assert!(food.nutritional_value_for_grams(100.0).is_err());
    }

    #[test]
    fn test_serving_size_must_be_positive() {
        let mut food = chicken();
        assert!(food.update_serving(0.0, ServingUnit::G).is_err());
        assert_eq!(food.serving_size(), 100.0);
    }

    #[test]
    fn test_props_flatten_nutrients() {
        let json = serde_json::to_value(chicken().to_props()).unwrap();
        assert_eq!(json["protein"], 31.0);
        assert_eq!(json["category"], "PROTEINS");
        assert_eq!(json["serving_unit"], "g");
    }

    #[test]
    fn test_deactivate() {
        let mut food = chicken();
        food.deactivate();
        assert!(!food.is_active());
    }
}
