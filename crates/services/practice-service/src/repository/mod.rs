//! Repository gateways for the practice aggregates.
//!
//! Every gateway is also a [`SpecificationRepository`] over its aggregate.
//! Specification-driven queries take the persistence face of a
//! specification (`spec.to_filter()`). Finders exclude soft-deleted rows
//! unless stated otherwise; filter queries return exactly what the filter
//! selects.

mod memory;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use memory::{InMemoryStore, StoredEntity};

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppResult, Paginated, PaginationParams};
use domain::{Client, ClientMetrics, DietPlan, Email, Filter, FoodCategory, FoodItem, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordering by a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// Filter-driven queries shared by all gateways.
#[async_trait]
pub trait SpecificationRepository<T: Send + Sync + 'static>: Send + Sync {
    /// All rows matching `filter`, in storage order
    async fn find(&self, filter: &Filter) -> AppResult<Vec<T>>;

    /// First row matching `filter`
    async fn find_one(&self, filter: &Filter) -> AppResult<Option<T>>;

    async fn count(&self, filter: &Filter) -> AppResult<u64>;

    async fn exists(&self, filter: &Filter) -> AppResult<bool>;

    async fn find_paginated(&self, filter: &Filter, page: PaginationParams) -> AppResult<Paginated<T>>;

    async fn find_sorted(&self, filter: &Filter, order: &SortOrder) -> AppResult<Vec<T>>;
}

/// User gateway. Emails are unique across all users, deleted or not.
#[async_trait]
pub trait UserRepository: SpecificationRepository<User> {
    /// Identity for a new user
    fn next_id(&self) -> Uuid;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email including soft-deleted
    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;

    async fn create(&self, user: &User) -> AppResult<User>;

    async fn update(&self, user: &User) -> AppResult<User>;

    /// Soft delete user by ID (sets deleted_at timestamp)
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait ClientRepository: SpecificationRepository<Client> {
    fn next_id(&self) -> Uuid;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Client>>;

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<Client>>;

    async fn find_by_dietitian_id(&self, dietitian_id: Uuid) -> AppResult<Vec<Client>>;

    /// Case-insensitive match on name or email
    async fn search(&self, term: &str) -> AppResult<Vec<Client>>;

    async fn create(&self, client: &Client) -> AppResult<Client>;

    async fn update(&self, client: &Client) -> AppResult<Client>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Metrics are immutable once recorded, so there is no update.
#[async_trait]
pub trait ClientMetricsRepository: SpecificationRepository<ClientMetrics> {
    fn next_id(&self) -> Uuid;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ClientMetrics>>;

    /// Newest first
    async fn find_by_client_id(&self, client_id: Uuid) -> AppResult<Vec<ClientMetrics>>;

    async fn find_latest_by_client_id(&self, client_id: Uuid) -> AppResult<Option<ClientMetrics>>;

    async fn create(&self, metrics: &ClientMetrics) -> AppResult<ClientMetrics>;

    /// Removes the entry; metrics carry no deletion stamp
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Diet plan gateway.
///
/// `update` is an optimistic compare-and-swap on `version`: the stored
/// version must equal the caller's, and the stored copy comes back with the
/// version bumped. A write that would leave two ACTIVE plans for one client
/// fails with a conflict.
#[async_trait]
pub trait DietPlanRepository: SpecificationRepository<DietPlan> {
    fn next_id(&self) -> Uuid;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DietPlan>>;

    async fn find_by_client_id(&self, client_id: Uuid) -> AppResult<Vec<DietPlan>>;

    async fn find_by_dietitian_id(&self, dietitian_id: Uuid) -> AppResult<Vec<DietPlan>>;

    async fn find_active_by_client_id(&self, client_id: Uuid) -> AppResult<Option<DietPlan>>;

    async fn create(&self, plan: &DietPlan) -> AppResult<DietPlan>;

    async fn update(&self, plan: &DietPlan) -> AppResult<DietPlan>;

    /// Persist `previous` (already moved out of ACTIVE) and `next` (now
    /// ACTIVE) as one unit: both writes land or neither does.
    async fn swap_active_plan(&self, previous: &DietPlan, next: &DietPlan) -> AppResult<DietPlan>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Food catalogue gateway. Foods are retired by deactivation.
#[async_trait]
pub trait FoodItemRepository: SpecificationRepository<FoodItem> {
    fn next_id(&self) -> Uuid;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FoodItem>>;

    /// Active foods whose name contains `term`, case-insensitive
    async fn search(&self, term: &str) -> AppResult<Vec<FoodItem>>;

    async fn find_by_category(&self, category: FoodCategory) -> AppResult<Vec<FoodItem>>;

    async fn create(&self, food: &FoodItem) -> AppResult<FoodItem>;

    async fn update(&self, food: &FoodItem) -> AppResult<FoodItem>;

    /// Deactivate the food
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}
