//! Diet plan service - plan lifecycle, versioning and compliance.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppResult, NutritionConfig, OptionExt};
use domain::nutrition::{check_targets, sum};
use domain::specification::{DietPlansByDietitian, DietPlansByStatus, DietPlansForClient, NotDeleted};
use domain::{
    ComplianceReport, CreateDietPlan, DateRange, DietPlan, DietPlanStatus, DomainError, NutritionalGoals,
    NutritionalValue, Specification,
};

use crate::repository::{ClientRepository, DietPlanRepository, SortOrder};

#[async_trait]
pub trait DietPlanService: Send + Sync {
    /// Create a DRAFT plan for a client of the given dietitian
    async fn create_plan(&self, data: CreateDietPlan) -> AppResult<DietPlan>;

    async fn get_plan(&self, id: Uuid) -> AppResult<DietPlan>;

    /// Plans of a client, newest first, optionally narrowed to one status
    async fn list_plans(&self, client_id: Uuid, status: Option<DietPlanStatus>) -> AppResult<Vec<DietPlan>>;

    async fn plans_of_dietitian(&self, dietitian_id: Uuid) -> AppResult<Vec<DietPlan>>;

    async fn active_plan(&self, client_id: Uuid) -> AppResult<Option<DietPlan>>;

    /// Activate a DRAFT plan, completing the client's current active plan
    async fn activate_plan(&self, id: Uuid) -> AppResult<DietPlan>;

    async fn complete_plan(&self, id: Uuid) -> AppResult<DietPlan>;

    async fn cancel_plan(&self, id: Uuid) -> AppResult<DietPlan>;

    /// Persist a DRAFT copy derived from an existing plan
    async fn create_new_version(&self, id: Uuid) -> AppResult<DietPlan>;

    async fn update_details(&self, id: Uuid, name: &str, description: Option<String>) -> AppResult<DietPlan>;

    async fn update_goals(&self, id: Uuid, goals: NutritionalGoals) -> AppResult<DietPlan>;

    async fn reschedule(&self, id: Uuid, date_range: DateRange) -> AppResult<DietPlan>;

    /// Score a day of intake against the plan's goals
    async fn evaluate_compliance(&self, id: Uuid, intake: &[NutritionalValue]) -> AppResult<ComplianceReport>;

    async fn delete_plan(&self, id: Uuid) -> AppResult<()>;
}

pub struct DietPlanManager {
    plans: Arc<dyn DietPlanRepository>,
    clients: Arc<dyn ClientRepository>,
    nutrition: NutritionConfig,
}

impl DietPlanManager {
    pub fn new(
        plans: Arc<dyn DietPlanRepository>,
        clients: Arc<dyn ClientRepository>,
        nutrition: NutritionConfig,
    ) -> Self {
        Self {
            plans,
            clients,
            nutrition,
        }
    }

    /// Load, mutate, store.
    async fn edit<F>(&self, id: Uuid, change: F) -> AppResult<DietPlan>
    where
        F: FnOnce(&mut DietPlan) -> Result<(), DomainError> + Send,
    {
        let mut plan = self.get_plan(id).await?;
        change(&mut plan)?;
        self.plans.update(&plan).await
    }
}

#[async_trait]
impl DietPlanService for DietPlanManager {
    async fn create_plan(&self, data: CreateDietPlan) -> AppResult<DietPlan> {
        let client = self
            .clients
            .find_by_id(data.client_id)
            .await?
            .ok_or_not_found("Client", data.client_id)?;

        if client.dietitian_id() != data.dietitian_id {
            return Err(DomainError::business_rule("Client is not assigned to this dietitian")
                .with_meta("client_id", data.client_id)
                .with_meta("dietitian_id", data.dietitian_id)
                .into());
        }

        let plan = DietPlan::create(self.plans.next_id(), data)?;
        let plan = self.plans.create(&plan).await?;

        info!(plan_id = %plan.id(), client_id = %plan.client_id(), "Diet plan created");
        Ok(plan)
    }

    async fn get_plan(&self, id: Uuid) -> AppResult<DietPlan> {
        self.plans.find_by_id(id).await?.ok_or_not_found("DietPlan", id)
    }

    async fn list_plans(&self, client_id: Uuid, status: Option<DietPlanStatus>) -> AppResult<Vec<DietPlan>> {
        let mut filter = DietPlansForClient { client_id }
            .and(NotDeleted::new())
            .to_filter();
        if let Some(status) = status {
            filter = filter.and(Specification::<DietPlan>::to_filter(&DietPlansByStatus { status }));
        }
        self.plans.find_sorted(&filter, &SortOrder::desc("created_at")).await
    }

    async fn plans_of_dietitian(&self, dietitian_id: Uuid) -> AppResult<Vec<DietPlan>> {
        let spec = DietPlansByDietitian { dietitian_id }.and(NotDeleted::new());
        self.plans
            .find_sorted(&spec.to_filter(), &SortOrder::desc("created_at"))
            .await
    }

    async fn active_plan(&self, client_id: Uuid) -> AppResult<Option<DietPlan>> {
        self.plans.find_active_by_client_id(client_id).await
    }

    async fn activate_plan(&self, id: Uuid) -> AppResult<DietPlan> {
        let mut plan = self.get_plan(id).await?;
        plan.activate()?;

        match self.plans.find_active_by_client_id(plan.client_id()).await? {
            Some(mut current) => {
                current.complete()?;
                let stored = self.plans.swap_active_plan(&current, &plan).await?;
                info!(
                    plan_id = %id,
                    replaced = %current.id(),
                    client_id = %plan.client_id(),
                    "Diet plan activated, previous plan completed"
                );
                Ok(stored)
            }
            None => {
                let stored = self.plans.update(&plan).await?;
                info!(plan_id = %id, client_id = %plan.client_id(), "Diet plan activated");
                Ok(stored)
            }
        }
    }

    async fn complete_plan(&self, id: Uuid) -> AppResult<DietPlan> {
        let plan = self.edit(id, DietPlan::complete).await?;
        info!(plan_id = %id, "Diet plan completed");
        Ok(plan)
    }

    async fn cancel_plan(&self, id: Uuid) -> AppResult<DietPlan> {
        let plan = self.edit(id, DietPlan::cancel).await?;
        info!(plan_id = %id, "Diet plan cancelled");
        Ok(plan)
    }

    async fn create_new_version(&self, id: Uuid) -> AppResult<DietPlan> {
        let source = self.get_plan(id).await?;
        let copy = source.create_new_version(self.plans.next_id());
        let copy = self.plans.create(&copy).await?;

        info!(plan_id = %copy.id(), derived_from = %id, "Diet plan version created");
        Ok(copy)
    }

    async fn update_details(&self, id: Uuid, name: &str, description: Option<String>) -> AppResult<DietPlan> {
        self.edit(id, |plan| plan.update_details(name, description)).await
    }

    async fn update_goals(&self, id: Uuid, goals: NutritionalGoals) -> AppResult<DietPlan> {
        self.edit(id, |plan| plan.update_goals(goals)).await
    }

    async fn reschedule(&self, id: Uuid, date_range: DateRange) -> AppResult<DietPlan> {
        self.edit(id, |plan| plan.update_date_range(date_range)).await
    }

    async fn evaluate_compliance(&self, id: Uuid, intake: &[NutritionalValue]) -> AppResult<ComplianceReport> {
        let plan = self.get_plan(id).await?;
        let goals = plan.goals();
        if goals.is_empty() {
            return Err(DomainError::business_rule("Diet plan has no nutritional goals")
                .with_meta("plan_id", id)
                .into());
        }

        let report = check_targets(
            &sum(intake),
            &goals.compliance_targets(),
            self.nutrition.compliance_tolerance_pct,
        );
        if !report.overall_compliant {
            warn!(plan_id = %id, warnings = ?report.warnings, "Intake outside plan goals");
        }
        Ok(report)
    }

    async fn delete_plan(&self, id: Uuid) -> AppResult<()> {
        self.plans.delete(id).await?;
        info!(plan_id = %id, "Diet plan deleted");
        Ok(())
    }
}
