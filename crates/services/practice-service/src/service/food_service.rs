//! Food service - food catalogue and portion nutrition.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::nutrition::sum;
use domain::specification::{ActiveFoods, FoodNameContains, FoodsByCategory, HighProteinLowCalorieFoods};
use domain::{CreateFoodItem, FoodCategory, FoodItem, NutritionalValue, Specification};

use crate::repository::{FoodItemRepository, SortOrder};

/// A number of servings of one food.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Portion {
    pub food_id: Uuid,
    pub servings: f64,
}

#[async_trait]
pub trait FoodService: Send + Sync {
    async fn create_food(&self, data: CreateFoodItem) -> AppResult<FoodItem>;

    async fn get_food(&self, id: Uuid) -> AppResult<FoodItem>;

    /// Active foods whose name contains `term`, by name
    async fn search_foods(&self, term: &str) -> AppResult<Vec<FoodItem>>;

    async fn foods_in_category(&self, category: FoodCategory) -> AppResult<Vec<FoodItem>>;

    /// Active foods meeting the protein floor and calorie cap, most protein first
    async fn high_protein_foods(&self, min_protein: f64, max_calories: f64) -> AppResult<Vec<FoodItem>>;

    async fn nutrition_for_servings(&self, id: Uuid, servings: f64) -> AppResult<NutritionalValue>;

    async fn nutrition_for_grams(&self, id: Uuid, grams: f64) -> AppResult<NutritionalValue>;

    /// Summed nutrition of a meal
    async fn meal_total(&self, portions: &[Portion]) -> AppResult<NutritionalValue>;

    async fn update_nutrition(&self, id: Uuid, value: NutritionalValue) -> AppResult<FoodItem>;

    /// Hide a food from the catalogue
    async fn deactivate_food(&self, id: Uuid) -> AppResult<()>;
}

pub struct FoodManager {
    foods: Arc<dyn FoodItemRepository>,
}

impl FoodManager {
    pub fn new(foods: Arc<dyn FoodItemRepository>) -> Self {
        Self { foods }
    }
}

#[async_trait]
impl FoodService for FoodManager {
    async fn create_food(&self, data: CreateFoodItem) -> AppResult<FoodItem> {
        let food = FoodItem::create(self.foods.next_id(), data)?;
        let food = self.foods.create(&food).await?;

        info!(food_id = %food.id(), category = %food.category(), "Food item created");
        Ok(food)
    }

    async fn get_food(&self, id: Uuid) -> AppResult<FoodItem> {
        self.foods.find_by_id(id).await?.ok_or_not_found("FoodItem", id)
    }

    async fn search_foods(&self, term: &str) -> AppResult<Vec<FoodItem>> {
        let spec = FoodNameContains {
            term: term.to_string(),
        }
        .and(ActiveFoods);
        self.foods.find_sorted(&spec.to_filter(), &SortOrder::asc("name")).await
    }

    async fn foods_in_category(&self, category: FoodCategory) -> AppResult<Vec<FoodItem>> {
        let spec = FoodsByCategory { category }.and(ActiveFoods);
        self.foods.find_sorted(&spec.to_filter(), &SortOrder::asc("name")).await
    }

    async fn high_protein_foods(&self, min_protein: f64, max_calories: f64) -> AppResult<Vec<FoodItem>> {
        let spec = HighProteinLowCalorieFoods {
            min_protein,
            max_calories,
        }
        .and(ActiveFoods);
        self.foods.find_sorted(&spec.to_filter(), &SortOrder::desc("protein")).await
    }

    async fn nutrition_for_servings(&self, id: Uuid, servings: f64) -> AppResult<NutritionalValue> {
        let food = self.get_food(id).await?;
        Ok(food.nutritional_value_for_servings(servings)?)
    }

    async fn nutrition_for_grams(&self, id: Uuid, grams: f64) -> AppResult<NutritionalValue> {
        let food = self.get_food(id).await?;
        Ok(food.nutritional_value_for_grams(grams)?)
    }

    async fn meal_total(&self, portions: &[Portion]) -> AppResult<NutritionalValue> {
        let mut values = Vec::with_capacity(portions.len());
        for portion in portions {
            values.push(self.nutrition_for_servings(portion.food_id, portion.servings).await?);
        }
        Ok(sum(&values))
    }

    async fn update_nutrition(&self, id: Uuid, value: NutritionalValue) -> AppResult<FoodItem> {
        let mut food = self.get_food(id).await?;
        food.update_nutrition(value);
        self.foods.update(&food).await
    }

    async fn deactivate_food(&self, id: Uuid) -> AppResult<()> {
        self.foods.delete(id).await?;
        info!(food_id = %id, "Food item deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use domain::{FoodItemBuilder, ServingUnit};

    async fn seeded() -> (FoodManager, Vec<Uuid>) {
        let service = FoodManager::new(Arc::new(InMemoryStore::new()));
        let foods = [
            ("Chicken breast", FoodCategory::Proteins, NutritionalValue::new(165.0, 31.0, 0.0, 3.6)),
            ("Greek yogurt", FoodCategory::Dairy, NutritionalValue::new(59.0, 10.0, 3.6, 0.4)),
            ("Brown rice", FoodCategory::Grains, NutritionalValue::new(111.0, 2.6, 23.0, 0.9)),
            ("Chickpeas", FoodCategory::Legumes, NutritionalValue::new(164.0, 8.9, 27.4, 2.6)),
        ];

        let mut ids = Vec::new();
        for (name, category, value) in foods {
            let food = FoodItemBuilder::new(name, category)
                .nutrition(value.unwrap())
                .build()
                .unwrap();
            ids.push(service.foods.create(&food).await.unwrap().id());
        }
        (service, ids)
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_sorted() {
        let (service, _) = seeded().await;

        let found = service.search_foods("CHIC").await.unwrap();
        let names: Vec<&str> = found.iter().map(FoodItem::name).collect();

        assert_eq!(names, ["Chicken breast", "Chickpeas"]);
    }

    #[tokio::test]
    async fn test_high_protein_foods_skip_deactivated() {
        let (service, ids) = seeded().await;
        service.deactivate_food(ids[1]).await.unwrap();

        let found = service.high_protein_foods(8.0, 200.0).await.unwrap();
        let names: Vec<&str> = found.iter().map(FoodItem::name).collect();

        assert_eq!(names, ["Chicken breast", "Chickpeas"]);
        assert!(!service.get_food(ids[1]).await.unwrap().is_active());
    }

    #[tokio::test]
    async fn test_meal_total_sums_portions() {
        let (service, ids) = seeded().await;

        let total = service
            .meal_total(&[
                Portion { food_id: ids[0], servings: 2.0 },
                Portion { food_id: ids[2], servings: 1.5 },
            ])
            .await
            .unwrap();

        assert_eq!(total.calories(), 496.5);
        assert!((total.protein() - 65.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_meal_with_unknown_food() {
        let (service, _) = seeded().await;

        let err = service
            .meal_total(&[Portion { food_id: Uuid::new_v4(), servings: 1.0 }])
            .await
            .unwrap_err();

        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_grams_need_gram_servings() {
        let service = FoodManager::new(Arc::new(InMemoryStore::new()));
        let milk = FoodItemBuilder::new("Milk", FoodCategory::Dairy)
            .serving(250.0, ServingUnit::Ml)
            .build()
            .unwrap();
        let id = service.foods.create(&milk).await.unwrap().id();

        let err = service.nutrition_for_grams(id, 100.0).await.unwrap_err();

        assert_eq!(err.code(), "BUSINESS_RULE_VIOLATION");
    }
}
