//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! validated value objects, the practice aggregates, the diet plan lifecycle,
//! nutrition calculations and specification predicates. Nothing here performs
//! I/O or logs.

pub mod builders;
pub mod client;
pub mod client_metrics;
pub mod constants;
pub mod diet_plan;
pub mod error;
pub mod food_item;
pub mod nutrition;
pub mod plan_lifecycle;
pub mod specification;
pub mod user;
pub mod value_objects;

pub use builders::{ClientBuilder, DietPlanBuilder, FoodItemBuilder};
pub use client::{Client, ClientProps, CreateClient, Gender};
pub use client_metrics::{BmiCategory, ClientMetrics, ClientMetricsProps, RecordMetrics};
pub use diet_plan::{CreateDietPlan, DietPlan, DietPlanProps, NutritionalGoals};
pub use error::{DomainError, DomainResult, DomainResultExt, ErrorKind, ErrorMetadata};
pub use food_item::{CreateFoodItem, FoodCategory, FoodItem, FoodItemProps, ServingUnit};
pub use nutrition::{ActivityLevel, ComplianceReport, ComplianceTargets, MacroSplit, MacroTargets, NutrientCompliance};
pub use plan_lifecycle::{DietPlanStatus, PlanAction};
pub use specification::{Filter, FilterValue, Record, SoftDeletable, Specification};
pub use user::{User, UserProps, UserResponse, UserRole};
pub use value_objects::{DateRange, Email, Height, NutritionalValue, Password, Weight};
