//! Food catalogue specifications.

use serde_json::Value;

use super::{record_of, Filter, Record, Specification};
use crate::food_item::{FoodCategory, FoodItem};

impl Record for FoodItem {
    fn to_record(&self) -> Value {
        record_of(&self.to_props())
    }
}

/// Foods with at least `min_protein` g protein and at most `max_calories`
/// kcal per serving.
#[derive(Debug, Clone)]
pub struct HighProteinLowCalorieFoods {
    pub min_protein: f64,
    pub max_calories: f64,
}

impl Specification<FoodItem> for HighProteinLowCalorieFoods {
    fn is_satisfied_by(&self, food: &FoodItem) -> bool {
        let value = food.nutritional_value();
        value.protein() >= self.min_protein && value.calories() <= self.max_calories
    }

    fn to_filter(&self) -> Filter {
        Filter::gte("protein", self.min_protein).and(Filter::lte("calories", self.max_calories))
    }

    fn describe(&self) -> String {
        format!(
            "foods with protein >= {} and calories <= {}",
            self.min_protein, self.max_calories
        )
    }
}

#[derive(Debug, Clone)]
pub struct FoodsByCategory {
    pub category: FoodCategory,
}

impl Specification<FoodItem> for FoodsByCategory {
    fn is_satisfied_by(&self, food: &FoodItem) -> bool {
        food.category() == self.category
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("category", self.category.to_string())
    }

    fn describe(&self) -> String {
        format!("{} foods", self.category)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActiveFoods;

impl Specification<FoodItem> for ActiveFoods {
    fn is_satisfied_by(&self, food: &FoodItem) -> bool {
        food.is_active()
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("is_active", true)
    }

    fn describe(&self) -> String {
        "active foods".to_string()
    }
}

/// Case-insensitive name search.
#[derive(Debug, Clone)]
pub struct FoodNameContains {
    pub term: String,
}

impl Specification<FoodItem> for FoodNameContains {
    fn is_satisfied_by(&self, food: &FoodItem) -> bool {
        food.name().to_lowercase().contains(&self.term.to_lowercase())
    }

    fn to_filter(&self) -> Filter {
        Filter::like("name", &self.term)
    }

    fn describe(&self) -> String {
        format!("foods named like '{}'", self.term)
    }
}
