//! Practice Service Library
//!
//! Users, clients, body metrics, diet plans and the food catalogue of a
//! nutrition practice, wired over one storage backend.

pub mod config;
pub mod hashing;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::PracticeServiceConfig;
use crate::hashing::{Argon2Hasher, PasswordHasher};
use crate::repository::{
    ClientMetricsRepository, ClientRepository, DietPlanRepository, FoodItemRepository, InMemoryStore,
    UserRepository,
};
use crate::service::{
    ClientManager, ClientService, DietPlanManager, DietPlanService, FoodManager, FoodService, MetricsManager,
    MetricsService, UserManager, UserService,
};

/// Every application service, sharing one store.
#[derive(Clone)]
pub struct PracticeServices {
    pub users: Arc<dyn UserService>,
    pub clients: Arc<dyn ClientService>,
    pub metrics: Arc<dyn MetricsService>,
    pub plans: Arc<dyn DietPlanService>,
    pub foods: Arc<dyn FoodService>,
}

impl PracticeServices {
    /// Services over a fresh in-memory store with Argon2 hashing.
    pub fn in_memory(config: &PracticeServiceConfig) -> Self {
        info!("Using in-memory store");
        Self::with_store(Arc::new(InMemoryStore::new()), Arc::new(Argon2Hasher::new()), config)
    }

    /// Services over any store implementing every gateway.
    pub fn with_store<S>(store: Arc<S>, hasher: Arc<dyn PasswordHasher>, config: &PracticeServiceConfig) -> Self
    where
        S: UserRepository
            + ClientRepository
            + ClientMetricsRepository
            + DietPlanRepository
            + FoodItemRepository
            + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let clients: Arc<dyn ClientRepository> = store.clone();
        let metrics: Arc<dyn ClientMetricsRepository> = store.clone();
        let plans: Arc<dyn DietPlanRepository> = store.clone();
        let foods: Arc<dyn FoodItemRepository> = store;

        Self {
            users: Arc::new(UserManager::new(users.clone(), hasher)),
            clients: Arc::new(ClientManager::new(clients.clone(), users, config.pagination.clone())),
            metrics: Arc::new(MetricsManager::new(metrics, clients.clone(), config.nutrition.clone())),
            plans: Arc::new(DietPlanManager::new(plans, clients, config.nutrition.clone())),
            foods: Arc::new(FoodManager::new(foods)),
        }
    }
}
