//! In-memory gateway implementing every repository trait.
//!
//! Rows are kept in insertion order behind `tokio` read-write locks.
//! Specification queries evaluate the persistence filter against each row's
//! record, the same fragment a SQL backend would receive.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use common::query::to_sql;
use common::{AppError, AppResult, Paginated, PaginationParams};
use domain::specification::{
    active_plan_for_client, ActiveFoods, ClientNameContains, FoodNameContains, NotDeleted,
};
use domain::{
    Client, ClientMetrics, DietPlan, DietPlanStatus, DomainError, Email, Filter, FoodCategory, FoodItem,
    Record, Specification, User,
};

use super::{
    ClientMetricsRepository, ClientRepository, DietPlanRepository, FoodItemRepository, SortDirection,
    SortOrder, SpecificationRepository, UserRepository,
};

/// Entities the in-memory store can hold.
pub trait StoredEntity: Record + Clone + Send + Sync + 'static {
    /// Table name used when logging the equivalent SQL
    const TABLE: &'static str;

    fn key(&self) -> Uuid;

    fn rows(store: &InMemoryStore) -> &RwLock<Vec<Self>>;
}

impl StoredEntity for User {
    const TABLE: &'static str = "users";

    fn key(&self) -> Uuid {
        self.id()
    }

    fn rows(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.users
    }
}

impl StoredEntity for Client {
    const TABLE: &'static str = "clients";

    fn key(&self) -> Uuid {
        self.id()
    }

    fn rows(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.clients
    }
}

impl StoredEntity for ClientMetrics {
    const TABLE: &'static str = "client_metrics";

    fn key(&self) -> Uuid {
        self.id()
    }

    fn rows(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.metrics
    }
}

impl StoredEntity for DietPlan {
    const TABLE: &'static str = "diet_plans";

    fn key(&self) -> Uuid {
        self.id()
    }

    fn rows(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.plans
    }
}

impl StoredEntity for FoodItem {
    const TABLE: &'static str = "food_items";

    fn key(&self) -> Uuid {
        self.id()
    }

    fn rows(store: &InMemoryStore) -> &RwLock<Vec<Self>> {
        &store.foods
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    clients: RwLock<Vec<Client>>,
    metrics: RwLock<Vec<ClientMetrics>>,
    plans: RwLock<Vec<DietPlan>>,
    foods: RwLock<Vec<FoodItem>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<T: StoredEntity>(&self, filter: &Filter) -> Vec<T> {
        debug!(sql = %to_sql(T::TABLE, filter), "Filter query");
        T::rows(self)
            .read()
            .await
            .iter()
            .filter(|row| filter.matches(&row.to_record()))
            .cloned()
            .collect()
    }

    async fn select_where<T: StoredEntity>(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        T::rows(self).read().await.iter().filter(|row| keep(row)).cloned().collect()
    }

    async fn insert<T: StoredEntity>(&self, row: &T) -> AppResult<T> {
        let mut rows = T::rows(self).write().await;
        if rows.iter().any(|existing| existing.key() == row.key()) {
            return Err(DomainError::conflict(format!("Row {} already exists", row.key()))
                .with_meta("table", T::TABLE)
                .into());
        }
        rows.push(row.clone());
        Ok(row.clone())
    }

    async fn replace<T: StoredEntity>(&self, row: &T, entity: &str) -> AppResult<T> {
        let mut rows = T::rows(self).write().await;
        let slot = rows
            .iter_mut()
            .find(|existing| existing.key() == row.key())
            .ok_or_else(|| AppError::not_found(entity, row.key()))?;
        *slot = row.clone();
        Ok(row.clone())
    }
}

/// Null-last ordering of two record cells. Timestamps compare as instants.
fn compare_cells(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (Value::Null, Value::Null) => return Ordering::Equal,
        (Value::Null, _) => return Ordering::Greater,
        (_, Value::Null) => return Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.to_lowercase().cmp(&y.to_lowercase()),
            }
        }
        _ => a.to_string().cmp(&b.to_string()),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl<T: StoredEntity> SpecificationRepository<T> for InMemoryStore {
    async fn find(&self, filter: &Filter) -> AppResult<Vec<T>> {
        Ok(self.select(filter).await)
    }

    async fn find_one(&self, filter: &Filter) -> AppResult<Option<T>> {
        Ok(self.select(filter).await.into_iter().next())
    }

    async fn count(&self, filter: &Filter) -> AppResult<u64> {
        Ok(self.select::<T>(filter).await.len() as u64)
    }

    async fn exists(&self, filter: &Filter) -> AppResult<bool> {
        Ok(!self.select::<T>(filter).await.is_empty())
    }

    async fn find_paginated(&self, filter: &Filter, page: PaginationParams) -> AppResult<Paginated<T>> {
        let matching: Vec<T> = self.select(filter).await;
        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .collect();
        Ok(Paginated::new(data, page.page.max(1), page.limit(), total))
    }

    async fn find_sorted(&self, filter: &Filter, order: &SortOrder) -> AppResult<Vec<T>> {
        let mut keyed: Vec<(Value, T)> = self
            .select::<T>(filter)
            .await
            .into_iter()
            .map(|row| {
                let key = row.to_record().get(&order.field).cloned().unwrap_or(Value::Null);
                (key, row)
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| compare_cells(a, b, order.direction));
        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }
}

// =============================================================================
// Users
// =============================================================================

fn email_taken(email: &Email) -> AppError {
    DomainError::conflict("Email already registered")
        .with_meta("field", "email")
        .with_meta("email", email)
        .into()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let found = self.select_where(|u: &User| u.id() == id && !u.is_deleted()).await;
        Ok(found.into_iter().next())
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let found = self.select_where(|u: &User| u.email() == email).await;
        Ok(found.into_iter().next())
    }

    async fn create(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email() == user.email()) {
            return Err(email_taken(user.email()));
        }
        if users.iter().any(|u| u.id() == user.id()) {
            return Err(DomainError::conflict(format!("User {} already exists", user.id())).into());
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id() != user.id() && u.email() == user.email()) {
            return Err(email_taken(user.email()));
        }
        let slot = users
            .iter_mut()
            .find(|u| u.id() == user.id())
            .ok_or_else(|| AppError::not_found("User", user.id()))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id() == id && !u.is_deleted())
            .ok_or_else(|| AppError::not_found("User", id))?;
        user.soft_delete();
        Ok(())
    }
}

// =============================================================================
// Clients
// =============================================================================

#[async_trait]
impl ClientRepository for InMemoryStore {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Client>> {
        let found = self.select_where(|c: &Client| c.id() == id && !c.is_deleted()).await;
        Ok(found.into_iter().next())
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<Client>> {
        let found = self
            .select_where(|c: &Client| c.email() == email && !c.is_deleted())
            .await;
        Ok(found.into_iter().next())
    }

    async fn find_by_dietitian_id(&self, dietitian_id: Uuid) -> AppResult<Vec<Client>> {
        Ok(self
            .select_where(|c: &Client| c.dietitian_id() == dietitian_id && !c.is_deleted())
            .await)
    }

    async fn search(&self, term: &str) -> AppResult<Vec<Client>> {
        let spec = ClientNameContains { term: term.to_string() }.and(NotDeleted::new());
        Ok(self.select_where(|c: &Client| spec.is_satisfied_by(c)).await)
    }

    async fn create(&self, client: &Client) -> AppResult<Client> {
        self.insert(client).await
    }

    async fn update(&self, client: &Client) -> AppResult<Client> {
        self.replace(client, "Client").await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut clients = self.clients.write().await;
        let client = clients
            .iter_mut()
            .find(|c| c.id() == id && !c.is_deleted())
            .ok_or_else(|| AppError::not_found("Client", id))?;
        client.soft_delete();
        Ok(())
    }
}

// =============================================================================
// Client metrics
// =============================================================================

#[async_trait]
impl ClientMetricsRepository for InMemoryStore {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ClientMetrics>> {
        let found = self.select_where(|m: &ClientMetrics| m.id() == id).await;
        Ok(found.into_iter().next())
    }

    async fn find_by_client_id(&self, client_id: Uuid) -> AppResult<Vec<ClientMetrics>> {
        let mut history = self
            .select_where(|m: &ClientMetrics| m.client_id() == client_id)
            .await;
        history.sort_by(|a, b| b.recorded_at().cmp(&a.recorded_at()));
        Ok(history)
    }

    async fn find_latest_by_client_id(&self, client_id: Uuid) -> AppResult<Option<ClientMetrics>> {
        Ok(ClientMetricsRepository::find_by_client_id(self, client_id)
            .await?
            .into_iter()
            .next())
    }

    async fn create(&self, metrics: &ClientMetrics) -> AppResult<ClientMetrics> {
        self.insert(metrics).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut metrics = self.metrics.write().await;
        let before = metrics.len();
        metrics.retain(|m| m.id() != id);
        if metrics.len() == before {
            return Err(AppError::not_found("ClientMetrics", id));
        }
        Ok(())
    }
}

// =============================================================================
// Diet plans
// =============================================================================

/// At most one ACTIVE, non-deleted plan per client.
fn check_single_active(plans: &[DietPlan], client_id: Uuid) -> AppResult<()> {
    let active = plans
        .iter()
        .filter(|p| p.client_id() == client_id && p.status() == DietPlanStatus::Active && !p.is_deleted())
        .count();
    if active > 1 {
        warn!(client_id = %client_id, active, "Rejected write leaving several active diet plans");
        return Err(DomainError::conflict("Client already has an active diet plan")
            .with_meta("client_id", client_id)
            .into());
    }
    Ok(())
}

fn check_version(stored: &DietPlan, incoming: &DietPlan) -> AppResult<()> {
    if stored.version() != incoming.version() {
        warn!(plan_id = %incoming.id(), "Stale diet plan write");
        return Err(DomainError::conflict("Diet plan was modified concurrently")
            .with_meta("plan_id", incoming.id())
            .with_meta("expected_version", incoming.version())
            .with_meta("actual_version", stored.version())
            .into());
    }
    Ok(())
}

fn bumped(plan: &DietPlan) -> DietPlan {
    let mut props = plan.to_props();
    props.version += 1;
    DietPlan::reconstitute(props)
}

/// Stage `plan` over its stored copy, checking the version.
fn stage(staged: &mut [DietPlan], plan: &DietPlan) -> AppResult<DietPlan> {
    let slot = staged
        .iter_mut()
        .find(|p| p.id() == plan.id())
        .ok_or_else(|| AppError::not_found("DietPlan", plan.id()))?;
    check_version(slot, plan)?;
    *slot = bumped(plan);
    Ok(slot.clone())
}

#[async_trait]
impl DietPlanRepository for InMemoryStore {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DietPlan>> {
        let found = self.select_where(|p: &DietPlan| p.id() == id && !p.is_deleted()).await;
        Ok(found.into_iter().next())
    }

    async fn find_by_client_id(&self, client_id: Uuid) -> AppResult<Vec<DietPlan>> {
        Ok(self
            .select_where(|p: &DietPlan| p.client_id() == client_id && !p.is_deleted())
            .await)
    }

    async fn find_by_dietitian_id(&self, dietitian_id: Uuid) -> AppResult<Vec<DietPlan>> {
        Ok(self
            .select_where(|p: &DietPlan| p.dietitian_id() == dietitian_id && !p.is_deleted())
            .await)
    }

    async fn find_active_by_client_id(&self, client_id: Uuid) -> AppResult<Option<DietPlan>> {
        let spec = active_plan_for_client(client_id);
        let found = self.select_where(|p: &DietPlan| spec.is_satisfied_by(p)).await;
        Ok(found.into_iter().next())
    }

    async fn create(&self, plan: &DietPlan) -> AppResult<DietPlan> {
        let mut plans = self.plans.write().await;
        if plans.iter().any(|p| p.id() == plan.id()) {
            return Err(DomainError::conflict(format!("Diet plan {} already exists", plan.id())).into());
        }
        let mut staged = plans.clone();
        staged.push(plan.clone());
        check_single_active(&staged, plan.client_id())?;
        *plans = staged;
        Ok(plan.clone())
    }

    async fn update(&self, plan: &DietPlan) -> AppResult<DietPlan> {
        let mut plans = self.plans.write().await;
        let mut staged = plans.clone();
        let stored = stage(&mut staged, plan)?;
        check_single_active(&staged, plan.client_id())?;
        *plans = staged;
        Ok(stored)
    }

    async fn swap_active_plan(&self, previous: &DietPlan, next: &DietPlan) -> AppResult<DietPlan> {
        if previous.client_id() != next.client_id() {
            return Err(DomainError::validation("Active plan swap must stay within one client")
                .with_meta("previous_client_id", previous.client_id())
                .with_meta("next_client_id", next.client_id())
                .into());
        }

        let mut plans = self.plans.write().await;
        let mut staged = plans.clone();
        stage(&mut staged, previous)?;
        let stored = stage(&mut staged, next)?;
        check_single_active(&staged, next.client_id())?;
        *plans = staged;
        debug!(previous = %previous.id(), next = %next.id(), "Swapped active diet plan");
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut plans = self.plans.write().await;
        let plan = plans
            .iter_mut()
            .find(|p| p.id() == id && !p.is_deleted())
            .ok_or_else(|| AppError::not_found("DietPlan", id))?;
        plan.soft_delete();
        Ok(())
    }
}

// =============================================================================
// Food items
// =============================================================================

#[async_trait]
impl FoodItemRepository for InMemoryStore {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FoodItem>> {
        let found = self.select_where(|f: &FoodItem| f.id() == id).await;
        Ok(found.into_iter().next())
    }

    async fn search(&self, term: &str) -> AppResult<Vec<FoodItem>> {
        let spec = FoodNameContains { term: term.to_string() }.and(ActiveFoods);
        Ok(self.select_where(|f: &FoodItem| spec.is_satisfied_by(f)).await)
    }

    async fn find_by_category(&self, category: FoodCategory) -> AppResult<Vec<FoodItem>> {
        Ok(self
            .select_where(|f: &FoodItem| f.category() == category && f.is_active())
            .await)
    }

    async fn create(&self, food: &FoodItem) -> AppResult<FoodItem> {
        self.insert(food).await
    }

    async fn update(&self, food: &FoodItem) -> AppResult<FoodItem> {
        self.replace(food, "FoodItem").await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut foods = self.foods.write().await;
        let food = foods
            .iter_mut()
            .find(|f| f.id() == id)
            .ok_or_else(|| AppError::not_found("FoodItem", id))?;
        food.deactivate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use domain::specification::{DietPlansByStatus, MetricsForClient};
    use domain::{DietPlanBuilder, FoodItemBuilder, Height, NutritionalValue, RecordMetrics, Weight};
    use std::sync::Arc;

    fn plan(client_id: Uuid) -> DietPlan {
        DietPlanBuilder::new("Plan", client_id, Uuid::new_v4()).build().unwrap()
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let store: Arc<dyn DietPlanRepository> = Arc::new(InMemoryStore::new());
        let draft = store.create(&plan(Uuid::new_v4())).await.unwrap();
        assert_eq!(draft.version(), 1);

        let mut editing = draft.clone();
        editing.update_details("Renamed", None).unwrap();
        let stored = store.update(&editing).await.unwrap();
        assert_eq!(stored.version(), 2);
        assert_eq!(stored.name(), "Renamed");
    }

    #[tokio::test]
    async fn test_stale_update_is_rejected() {
        let store: Arc<dyn DietPlanRepository> = Arc::new(InMemoryStore::new());
        let draft = store.create(&plan(Uuid::new_v4())).await.unwrap();

        let mut first = draft.clone();
        first.update_details("First", None).unwrap();
        store.update(&first).await.unwrap();

        let mut second = draft.clone();
        second.update_details("Second", None).unwrap();
        let err = store.update(&second).await.unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
        assert_eq!(err.metadata().get("actual_version").map(String::as_str), Some("2"));

        let current = store.find_by_id(draft.id()).await.unwrap().unwrap();
        assert_eq!(current.name(), "First");
    }

    #[tokio::test]
    async fn test_second_active_plan_is_rejected() {
        let store: Arc<dyn DietPlanRepository> = Arc::new(InMemoryStore::new());
        let client = Uuid::new_v4();

        let mut first = store.create(&plan(client)).await.unwrap();
        first.activate().unwrap();
        store.update(&first).await.unwrap();

        let mut second = store.create(&plan(client)).await.unwrap();
        second.activate().unwrap();
        let err = store.update(&second).await.unwrap_err();
        assert_eq!(err.to_string(), "Client already has an active diet plan");

        let stored = store.find_by_id(second.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), DietPlanStatus::Draft);
    }

    #[tokio::test]
    async fn test_swap_is_all_or_nothing() {
        let store: Arc<dyn DietPlanRepository> = Arc::new(InMemoryStore::new());
        let client = Uuid::new_v4();

        let mut current = store.create(&plan(client)).await.unwrap();
        current.activate().unwrap();
        let current = store.update(&current).await.unwrap();
        let next = store.create(&plan(client)).await.unwrap();

        // Previous left ACTIVE: the swap must not land at all
        let mut activated = next.clone();
        activated.activate().unwrap();
        assert!(store.swap_active_plan(&current, &activated).await.is_err());
        assert_eq!(
            store.find_active_by_client_id(client).await.unwrap().map(|p| p.id()),
            Some(current.id())
        );

        let mut completed = current.clone();
        completed.complete().unwrap();
        let stored = store.swap_active_plan(&completed, &activated).await.unwrap();
        assert_eq!(stored.status(), DietPlanStatus::Active);
        assert_eq!(
            store.find_active_by_client_id(client).await.unwrap().map(|p| p.id()),
            Some(next.id())
        );

        let finished = store
            .find(&Specification::<DietPlan>::to_filter(&DietPlansByStatus {
                status: DietPlanStatus::Completed,
            }))
            .await
            .unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].id(), current.id());
    }

    #[tokio::test]
    async fn test_sorted_and_paginated_queries() {
        let store = Arc::new(InMemoryStore::new());
        let metrics_repo: Arc<dyn ClientMetricsRepository> = store.clone();
        let client = Uuid::new_v4();
        let now = Utc::now();

        for (days_ago, kg) in [(14, 82.0), (0, 80.0), (7, 81.0)] {
            let mut data = RecordMetrics::new(
                Weight::from_kilograms(kg).unwrap(),
                Height::from_centimeters(180.0).unwrap(),
            );
            data.recorded_at = Some(now - Duration::days(days_ago));
            let metrics = ClientMetrics::create(metrics_repo.next_id(), client, data).unwrap();
            metrics_repo.create(&metrics).await.unwrap();
        }

        let filter = MetricsForClient { client_id: client }.to_filter();
        let newest_first = metrics_repo
            .find_sorted(&filter, &SortOrder::desc("recorded_at"))
            .await
            .unwrap();
        let weights: Vec<f64> = newest_first.iter().map(|m| m.weight().kilograms()).collect();
        assert_eq!(weights, vec![80.0, 81.0, 82.0]);

        let latest = metrics_repo.find_latest_by_client_id(client).await.unwrap().unwrap();
        assert_eq!(latest.weight().kilograms(), 80.0);

        let page = metrics_repo
            .find_paginated(&filter, PaginationParams::new(2, 2))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.meta.total_pages, 2);
        assert_eq!(metrics_repo.count(&filter).await.unwrap(), 3);

        let beyond = metrics_repo
            .find_paginated(&filter, PaginationParams::new(u64::MAX, 20))
            .await
            .unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.meta.total, 3);
    }

    #[tokio::test]
    async fn test_food_delete_deactivates() {
        let store: Arc<dyn FoodItemRepository> = Arc::new(InMemoryStore::new());
        let food = FoodItemBuilder::new("Greek yogurt", FoodCategory::Dairy)
            .nutrition(NutritionalValue::new(59.0, 10.0, 3.6, 0.4).unwrap())
            .build()
            .unwrap();
        store.create(&food).await.unwrap();
        assert_eq!(store.search("yog").await.unwrap().len(), 1);

        store.delete(food.id()).await.unwrap();
        assert!(store.search("yog").await.unwrap().is_empty());
        assert!(!store.find_by_id(food.id()).await.unwrap().unwrap().is_active());
        assert!(!store.exists(&ActiveFoods.to_filter()).await.unwrap());
    }
}
