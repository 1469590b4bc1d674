//! Application services over the practice gateways.

mod client_service;
mod diet_plan_service;
mod food_service;
mod metrics_service;
mod user_service;

pub use client_service::{ClientManager, ClientService, HealthRecordEdit};
pub use diet_plan_service::{DietPlanManager, DietPlanService};
pub use food_service::{FoodManager, FoodService, Portion};
pub use metrics_service::{DailyNeeds, MetricsManager, MetricsService};
pub use user_service::{RegisterUser, UserManager, UserService};
