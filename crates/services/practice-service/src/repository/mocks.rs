//! mockall doubles for the gateways used by service unit tests.
//!
//! The gateways extend [`SpecificationRepository`], so the mocks are
//! declared with `mock!` to implement both traits.

use async_trait::async_trait;
use mockall::mock;
use uuid::Uuid;

use common::{AppResult, Paginated, PaginationParams};
use domain::{Client, DietPlan, Email, Filter, User};

use super::{ClientRepository, DietPlanRepository, SortOrder, SpecificationRepository, UserRepository};

mock! {
    pub Users {}

    #[async_trait]
    impl SpecificationRepository<User> for Users {
        async fn find(&self, filter: &Filter) -> AppResult<Vec<User>>;
        async fn find_one(&self, filter: &Filter) -> AppResult<Option<User>>;
        async fn count(&self, filter: &Filter) -> AppResult<u64>;
        async fn exists(&self, filter: &Filter) -> AppResult<bool>;
        async fn find_paginated(&self, filter: &Filter, page: PaginationParams) -> AppResult<Paginated<User>>;
        async fn find_sorted(&self, filter: &Filter, order: &SortOrder) -> AppResult<Vec<User>>;
    }

    #[async_trait]
    impl UserRepository for Users {
        fn next_id(&self) -> Uuid;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
        async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;
        async fn create(&self, user: &User) -> AppResult<User>;
        async fn update(&self, user: &User) -> AppResult<User>;
        async fn delete(&self, id: Uuid) -> AppResult<()>;
    }
}

mock! {
    pub Clients {}

    #[async_trait]
    impl SpecificationRepository<Client> for Clients {
        async fn find(&self, filter: &Filter) -> AppResult<Vec<Client>>;
        async fn find_one(&self, filter: &Filter) -> AppResult<Option<Client>>;
        async fn count(&self, filter: &Filter) -> AppResult<u64>;
        async fn exists(&self, filter: &Filter) -> AppResult<bool>;
        async fn find_paginated(&self, filter: &Filter, page: PaginationParams) -> AppResult<Paginated<Client>>;
        async fn find_sorted(&self, filter: &Filter, order: &SortOrder) -> AppResult<Vec<Client>>;
    }

    #[async_trait]
    impl ClientRepository for Clients {
        fn next_id(&self) -> Uuid;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Client>>;
        async fn find_by_email(&self, email: &Email) -> AppResult<Option<Client>>;
        async fn find_by_dietitian_id(&self, dietitian_id: Uuid) -> AppResult<Vec<Client>>;
        async fn search(&self, term: &str) -> AppResult<Vec<Client>>;
        async fn create(&self, client: &Client) -> AppResult<Client>;
        async fn update(&self, client: &Client) -> AppResult<Client>;
        async fn delete(&self, id: Uuid) -> AppResult<()>;
    }
}

mock! {
    pub DietPlans {}

    #[async_trait]
    impl SpecificationRepository<DietPlan> for DietPlans {
        async fn find(&self, filter: &Filter) -> AppResult<Vec<DietPlan>>;
        async fn find_one(&self, filter: &Filter) -> AppResult<Option<DietPlan>>;
        async fn count(&self, filter: &Filter) -> AppResult<u64>;
        async fn exists(&self, filter: &Filter) -> AppResult<bool>;
        async fn find_paginated(&self, filter: &Filter, page: PaginationParams) -> AppResult<Paginated<DietPlan>>;
        async fn find_sorted(&self, filter: &Filter, order: &SortOrder) -> AppResult<Vec<DietPlan>>;
    }

    #[async_trait]
    impl DietPlanRepository for DietPlans {
        fn next_id(&self) -> Uuid;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DietPlan>>;
        async fn find_by_client_id(&self, client_id: Uuid) -> AppResult<Vec<DietPlan>>;
        async fn find_by_dietitian_id(&self, dietitian_id: Uuid) -> AppResult<Vec<DietPlan>>;
        async fn find_active_by_client_id(&self, client_id: Uuid) -> AppResult<Option<DietPlan>>;
        async fn create(&self, plan: &DietPlan) -> AppResult<DietPlan>;
        async fn update(&self, plan: &DietPlan) -> AppResult<DietPlan>;
        async fn swap_active_plan(&self, previous: &DietPlan, next: &DietPlan) -> AppResult<DietPlan>;
        async fn delete(&self, id: Uuid) -> AppResult<()>;
    }
}
