//! Diet plan aggregate.
//!
//! Lifecycle legality comes from [`crate::plan_lifecycle`]. The entity only
//! guards its own transitions; keeping a single ACTIVE plan per client is the
//! job of the orchestrating use case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::INITIAL_PLAN_VERSION;
use crate::error::{optional_text, required_text, DomainError, DomainResult};
use crate::nutrition::ComplianceTargets;
use crate::plan_lifecycle::{transition, DietPlanStatus, PlanAction};
use crate::value_objects::DateRange;

/// Optional daily targets. Present values are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionalGoals {
    pub target_calories: Option<f64>,
    pub target_protein: Option<f64>,
    pub target_carbs: Option<f64>,
    pub target_fat: Option<f64>,
    pub target_fiber: Option<f64>,
}

impl NutritionalGoals {
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("target_calories", self.target_calories),
            ("target_protein", self.target_protein),
            ("target_carbs", self.target_carbs),
            ("target_fat", self.target_fat),
            ("target_fiber", self.target_fiber),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(DomainError::validation(format!("{} cannot be negative", field))
                        .with_meta("field", field));
                }
            }
        }
        Ok(())
    }

    /// Goals as compliance targets; missing entries stay unscored.
    pub fn compliance_targets(&self) -> ComplianceTargets {
        ComplianceTargets {
            calories: self.target_calories,
            protein: self.target_protein,
            carbs: self.target_carbs,
            fat: self.target_fat,
            fiber: self.target_fiber,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == NutritionalGoals::default()
    }
}

/// Diet plan creation data transfer object
#[derive(Debug, Clone)]
pub struct CreateDietPlan {
    pub name: String,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub dietitian_id: Uuid,
    pub date_range: DateRange,
    pub goals: NutritionalGoals,
}

/// Persisted shape of a [`DietPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietPlanProps {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub dietitian_id: Uuid,
    pub date_range: DateRange,
    pub status: DietPlanStatus,
    #[serde(flatten)]
    pub goals: NutritionalGoals,
    /// Optimistic-locking counter, compared by the persistence gateway
    pub version: u32,
    /// Plan this one was copied from by `create_new_version`
    pub derived_from: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DietPlan {
    props: DietPlanProps,
}

fn require_id(id: Uuid, field: &str) -> DomainResult<()> {
    if id.is_nil() {
        return Err(DomainError::validation(format!("{} is required", field)).with_meta("field", field));
    }
    Ok(())
}

impl DietPlan {
    /// Create a DRAFT plan at version 1.
    pub fn create(id: Uuid, data: CreateDietPlan) -> DomainResult<Self> {
        require_id(data.client_id, "client_id")?;
        require_id(data.dietitian_id, "dietitian_id")?;
        data.goals.validate()?;
        let now = Utc::now();

        Ok(Self {
            props: DietPlanProps {
                id,
                name: required_text(&data.name, "Name")?,
                description: optional_text(data.description),
                client_id: data.client_id,
                dietitian_id: data.dietitian_id,
                date_range: data.date_range,
                status: DietPlanStatus::Draft,
                goals: data.goals,
                version: INITIAL_PLAN_VERSION,
                derived_from: None,
                is_active: false,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        })
    }

    /// Rehydrate from persisted data without validation.
    pub fn reconstitute(props: DietPlanProps) -> Self {
        Self { props }
    }

    pub fn to_props(&self) -> DietPlanProps {
        self.props.clone()
    }

    pub fn id(&self) -> Uuid {
        self.props.id
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }

    pub fn description(&self) -> Option<&str> {
        self.props.description.as_deref()
    }

    pub fn client_id(&self) -> Uuid {
        self.props.client_id
    }

    pub fn dietitian_id(&self) -> Uuid {
        self.props.dietitian_id
    }

    pub fn date_range(&self) -> DateRange {
        self.props.date_range
    }

    pub fn status(&self) -> DietPlanStatus {
        self.props.status
    }

    pub fn goals(&self) -> NutritionalGoals {
        self.props.goals
    }

    pub fn version(&self) -> u32 {
        self.props.version
    }

    pub fn derived_from(&self) -> Option<Uuid> {
        self.props.derived_from
    }

    pub fn is_active(&self) -> bool {
        self.props.is_active
    }

    pub fn is_terminal(&self) -> bool {
        self.props.status.is_terminal()
    }

    pub fn allowed_actions(&self) -> Vec<PlanAction> {
        self.props.status.allowed_actions()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.props.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.props.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.props.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.props.deleted_at.is_some()
    }

    /// DRAFT → ACTIVE. Marks the plan active.
    pub fn activate(&mut self) -> DomainResult<()> {
        self.apply(PlanAction::Activate)?;
        self.props.is_active = true;
        Ok(())
    }

    /// ACTIVE → COMPLETED. Marks the plan inactive.
    pub fn complete(&mut self) -> DomainResult<()> {
        self.apply(PlanAction::Complete)?;
        self.props.is_active = false;
        Ok(())
    }

    /// Any non-terminal state → CANCELLED. Marks the plan inactive.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.apply(PlanAction::Cancel)?;
        self.props.is_active = false;
        Ok(())
    }

    pub fn update_details(&mut self, name: &str, description: Option<String>) -> DomainResult<()> {
        let name = required_text(name, "Name")?;
        self.props.name = name;
        self.props.description = optional_text(description);
        self.touch();
        Ok(())
    }

    pub fn update_goals(&mut self, goals: NutritionalGoals) -> DomainResult<()> {
        goals.validate()?;
        self.props.goals = goals;
        self.touch();
        Ok(())
    }

    /// Reschedule. Not allowed once the plan is completed or cancelled.
    pub fn update_date_range(&mut self, date_range: DateRange) -> DomainResult<()> {
        if self.is_terminal() {
            return Err(DomainError::business_rule(format!(
                "Cannot reschedule a {} diet plan",
                self.props.status.as_str().to_lowercase()
            ))
            .with_meta("status", self.props.status));
        }
        self.props.date_range = date_range;
        self.touch();
        Ok(())
    }

    /// Copy into a brand-new DRAFT plan.
    ///
    /// The copy starts its own lineage at version 1 and records the source
    /// in `derived_from`; the source's version is left untouched.
    pub fn create_new_version(&self, id: Uuid) -> DietPlan {
        let now = Utc::now();
        DietPlan {
            props: DietPlanProps {
                id,
                name: self.props.name.clone(),
                description: self.props.description.clone(),
                client_id: self.props.client_id,
                dietitian_id: self.props.dietitian_id,
                date_range: self.props.date_range,
                status: DietPlanStatus::Draft,
                goals: self.props.goals,
                version: INITIAL_PLAN_VERSION,
                derived_from: Some(self.props.id),
                is_active: false,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        }
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.props.deleted_at = Some(now);
        self.props.is_active = false;
        self.props.updated_at = now;
    }

    fn apply(&mut self, action: PlanAction) -> DomainResult<()> {
        let next = transition(self.props.status, action)?;
        self.props.status = next;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.props.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn draft() -> DietPlan {
        DietPlan::create(
            Uuid::new_v4(),
            CreateDietPlan {
                name: "Cutting phase".to_string(),
                description: Some("12 weeks".to_string()),
                client_id: Uuid::new_v4(),
                dietitian_id: Uuid::new_v4(),
                date_range: DateRange::open_ended(Utc::now()),
                goals: NutritionalGoals {
                    target_calories: Some(1800.0),
                    target_protein: Some(140.0),
                    ..Default::default()
                },
            },
        )
        .unwrap()
    }

    fn in_status(status: DietPlanStatus) -> DietPlan {
        let mut plan = draft();
        match status {
            DietPlanStatus::Draft => {}
            DietPlanStatus::Active => plan.activate().unwrap(),
            DietPlanStatus::Completed => {
                plan.activate().unwrap();
                plan.complete().unwrap();
            }
            DietPlanStatus::Cancelled => plan.cancel().unwrap(),
        }
        plan
    }

    #[test]
    fn test_new_plan_is_draft_v1() {
        let plan = draft();
        assert_eq!(plan.status(), DietPlanStatus::Draft);
        assert_eq!(plan.version(), 1);
        assert!(!plan.is_active());
    }

    #[test]
    fn test_negative_goal_rejected() {
        let mut plan = draft();
        let goals = NutritionalGoals { target_fat: Some(-1.0), ..Default::default() };
        assert_eq!(plan.update_goals(goals).unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(plan.goals().target_calories, Some(1800.0));
    }

    #[test]
    fn test_activate_and_cancel_toggle_active_flag() {
        let mut plan = draft();
        plan.activate().unwrap();
        assert!(plan.is_active());
        assert_eq!(plan.status(), DietPlanStatus::Active);

        plan.cancel().unwrap();
        assert!(!plan.is_active());
        assert_eq!(plan.status(), DietPlanStatus::Cancelled);
    }

    #[test]
    fn test_complete_clears_active_flag() {
        let mut plan = in_status(DietPlanStatus::Active);
        assert!(plan.is_active());

        plan.complete().unwrap();
        assert!(!plan.is_active());
        assert_eq!(plan.status(), DietPlanStatus::Completed);
        assert!(!plan.to_props().is_active);
    }

    #[test]
    fn test_illegal_actions_leave_status_unchanged() {
        for status in DietPlanStatus::ALL {
            for action in PlanAction::ALL {
                let mut plan = in_status(status);
                if status.allowed_actions().contains(&action) {
                    continue;
                }
                let result = match action {
                    PlanAction::Activate => plan.activate(),
                    PlanAction::Complete => plan.complete(),
                    PlanAction::Cancel => plan.cancel(),
                };
                assert_eq!(result.unwrap_err().kind(), ErrorKind::BusinessRule);
                assert_eq!(plan.status(), status, "{status} / {action}");
            }
        }
    }

    #[test]
    fn test_create_new_version_starts_fresh_lineage() {
        let original = in_status(DietPlanStatus::Completed);
        let copy = original.create_new_version(Uuid::new_v4());

        assert_eq!(copy.status(), DietPlanStatus::Draft);
        assert_eq!(copy.version(), 1);
        assert_eq!(copy.derived_from(), Some(original.id()));
        assert_eq!(copy.name(), original.name());
        assert_eq!(copy.goals(), original.goals());
        assert_eq!(copy.client_id(), original.client_id());
        assert_eq!(original.version(), 1);
    }

    #[test]
    fn test_reschedule_terminal_plan_rejected() {
        let mut plan = in_status(DietPlanStatus::Cancelled);
        let err = plan.update_date_range(DateRange::open_ended(Utc::now())).unwrap_err();
        assert_eq!(err.to_string(), "Cannot reschedule a cancelled diet plan");
    }

    #[test]
    fn test_goals_compliance_targets_keep_unset() {
        let goals = NutritionalGoals { target_calories: Some(2000.0), ..NutritionalGoals::default() };
        let targets = goals.compliance_targets();
        assert_eq!(targets.calories, Some(2000.0));
        assert_eq!(targets.protein, None);
        assert_eq!(targets.fiber, None);
    }

    #[test]
    fn test_props_serialize_flat_goals() {
        let json = serde_json::to_value(draft().to_props()).unwrap();
        assert_eq!(json["status"], "DRAFT");
        assert_eq!(json["target_calories"], 1800.0);
        let back: DietPlanProps = serde_json::from_value(json).unwrap();
        assert_eq!(back.goals.target_protein, Some(140.0));
    }
}
