//! Diet plan specifications.

use serde_json::Value;
use uuid::Uuid;

use super::{record_of, And, Filter, NotDeleted, Record, SoftDeletable, Specification};
use crate::diet_plan::DietPlan;
use crate::plan_lifecycle::DietPlanStatus;

impl Record for DietPlan {
    fn to_record(&self) -> Value {
        record_of(&self.to_props())
    }
}

impl SoftDeletable for DietPlan {
    fn is_deleted(&self) -> bool {
        DietPlan::is_deleted(self)
    }
}

#[derive(Debug, Clone)]
pub struct DietPlansByStatus {
    pub status: DietPlanStatus,
}

impl Specification<DietPlan> for DietPlansByStatus {
    fn is_satisfied_by(&self, plan: &DietPlan) -> bool {
        plan.status() == self.status
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("status", self.status.as_str())
    }

    fn describe(&self) -> String {
        format!("{} diet plans", self.status)
    }
}

#[derive(Debug, Clone)]
pub struct DietPlansForClient {
    pub client_id: Uuid,
}

impl Specification<DietPlan> for DietPlansForClient {
    fn is_satisfied_by(&self, plan: &DietPlan) -> bool {
        plan.client_id() == self.client_id
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("client_id", self.client_id)
    }

    fn describe(&self) -> String {
        format!("diet plans of client {}", self.client_id)
    }
}

#[derive(Debug, Clone)]
pub struct DietPlansByDietitian {
    pub dietitian_id: Uuid,
}

impl Specification<DietPlan> for DietPlansByDietitian {
    fn is_satisfied_by(&self, plan: &DietPlan) -> bool {
        plan.dietitian_id() == self.dietitian_id
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("dietitian_id", self.dietitian_id)
    }

    fn describe(&self) -> String {
        format!("diet plans authored by {}", self.dietitian_id)
    }
}

/// The (at most one) ACTIVE, non-deleted plan of a client.
pub fn active_plan_for_client(
    client_id: Uuid,
) -> And<And<DietPlansForClient, DietPlansByStatus>, NotDeleted<DietPlan>> {
    DietPlansForClient { client_id }
        .and(DietPlansByStatus { status: DietPlanStatus::Active })
        .and(NotDeleted::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diet_plan::{CreateDietPlan, NutritionalGoals};
    use crate::specification::testing::assert_faces_agree;
    use crate::value_objects::DateRange;
    use chrono::Utc;

    fn plan(client_id: Uuid, status: DietPlanStatus) -> DietPlan {
        let mut plan = DietPlan::create(
            Uuid::new_v4(),
            CreateDietPlan {
                name: "Plan".to_string(),
                description: None,
                client_id,
                dietitian_id: Uuid::new_v4(),
                date_range: DateRange::open_ended(Utc::now()),
                goals: NutritionalGoals::default(),
            },
        )
        .unwrap();
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
    fn test_active_plan_for_client() {
        let client = Uuid::new_v4();
        let mut deleted_active = plan(client, DietPlanStatus::Active);
        deleted_active.soft_delete();
        let plans = vec![
            plan(client, DietPlanStatus::Draft),
            plan(client, DietPlanStatus::Active),
            plan(client, DietPlanStatus::Completed),
            plan(Uuid::new_v4(), DietPlanStatus::Active),
            deleted_active,
        ];

        let spec = active_plan_for_client(client);
        let matching: Vec<&DietPlan> = plans.iter().filter(|p| spec.is_satisfied_by(p)).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id(), plans[1].id());
        assert_faces_agree(&spec, &plans);
    }

    #[test]
    fn test_status_specs_faces_agree() {
        let client = Uuid::new_v4();
        let plans: Vec<DietPlan> = DietPlanStatus::ALL.iter().map(|s| plan(client, *s)).collect();

        for status in DietPlanStatus::ALL {
            let spec = DietPlansByStatus { status };
            assert_eq!(plans.iter().filter(|p| spec.is_satisfied_by(p)).count(), 1);
            assert_faces_agree(&spec, &plans);
        }

        let finished = DietPlansByStatus { status: DietPlanStatus::Completed }
            .or(DietPlansByStatus { status: DietPlanStatus::Cancelled });
        assert_eq!(plans.iter().filter(|p| finished.is_satisfied_by(p)).count(), 2);
        assert_faces_agree(&finished, &plans);
        assert_faces_agree(&DietPlansByDietitian { dietitian_id: plans[0].dietitian_id() }, &plans);
    }
}
