//! Fluent construction helpers over the entity factories.
//!
//! Builders only collect arguments; `build` delegates to the entity's
//! `create`, so every validation rule still applies.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::client::{Client, CreateClient, Gender};
use crate::diet_plan::{CreateDietPlan, DietPlan, NutritionalGoals};
use crate::error::DomainResult;
use crate::food_item::{CreateFoodItem, FoodCategory, FoodItem, ServingUnit};
use crate::value_objects::{DateRange, NutritionalValue};

pub struct ClientBuilder {
    id: Uuid,
    dietitian_id: Uuid,
    data: CreateClient,
}

impl ClientBuilder {
    pub fn new(dietitian_id: Uuid, first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            dietitian_id,
            data: CreateClient {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                ..CreateClient::default()
            },
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.data.phone = Some(phone.to_string());
        self
    }

    pub fn date_of_birth(mut self, date: NaiveDate) -> Self {
        self.data.date_of_birth = Some(date);
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.data.gender = Some(gender);
        self
    }

    pub fn allergy(mut self, allergy: &str) -> Self {
        self.data.allergies.push(allergy.to_string());
        self
    }

    pub fn medical_condition(mut self, condition: &str) -> Self {
        self.data.medical_conditions.push(condition.to_string());
        self
    }

    pub fn medication(mut self, medication: &str) -> Self {
        self.data.medications.push(medication.to_string());
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.data.notes = Some(notes.to_string());
        self
    }

    pub fn build(self) -> DomainResult<Client> {
        Client::create(self.id, self.dietitian_id, self.data)
    }
}

pub struct DietPlanBuilder {
    id: Uuid,
    name: String,
    description: Option<String>,
    client_id: Uuid,
    dietitian_id: Uuid,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    goals: NutritionalGoals,
}

impl DietPlanBuilder {
    /// Open-ended plan starting now.
    pub fn new(name: &str, client_id: Uuid, dietitian_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            client_id,
            dietitian_id,
            start: Utc::now(),
            end: None,
            goals: NutritionalGoals::default(),
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn starting(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    pub fn ending(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn target_calories(mut self, kcal: f64) -> Self {
        self.goals.target_calories = Some(kcal);
        self
    }

    /// Protein, carbs and fat targets in grams.
    pub fn target_macros(mut self, protein: f64, carbs: f64, fat: f64) -> Self {
        self.goals.target_protein = Some(protein);
        self.goals.target_carbs = Some(carbs);
        self.goals.target_fat = Some(fat);
        self
    }

    pub fn target_fiber(mut self, grams: f64) -> Self {
        self.goals.target_fiber = Some(grams);
        self
    }

    pub fn goals(mut self, goals: NutritionalGoals) -> Self {
        self.goals = goals;
        self
    }

    pub fn build(self) -> DomainResult<DietPlan> {
        let date_range = DateRange::new(self.start, self.end)?;
        DietPlan::create(
            self.id,
            CreateDietPlan {
                name: self.name,
                description: self.description,
                client_id: self.client_id,
                dietitian_id: self.dietitian_id,
                date_range,
                goals: self.goals,
            },
        )
    }
}

pub struct FoodItemBuilder {
    id: Uuid,
    name: String,
    description: Option<String>,
    category: FoodCategory,
    serving_size: f64,
    serving_unit: ServingUnit,
    nutritional_value: NutritionalValue,
}

impl FoodItemBuilder {
    /// 100 g serving with zero nutrients.
    pub fn new(name: &str, category: FoodCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            category,
            serving_size: 100.0,
            serving_unit: ServingUnit::G,
            nutritional_value: NutritionalValue::zero(),
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn serving(mut self, size: f64, unit: ServingUnit) -> Self {
        self.serving_size = size;
        self.serving_unit = unit;
        self
    }

    pub fn nutrition(mut self, value: NutritionalValue) -> Self {
        self.nutritional_value = value;
        self
    }

    pub fn build(self) -> DomainResult<FoodItem> {
        FoodItem::create(
            self.id,
            CreateFoodItem {
                name: self.name,
                description: self.description,
                category: self.category,
                serving_size: self.serving_size,
                serving_unit: self.serving_unit,
                nutritional_value: self.nutritional_value,
            },
        )
    }
}
