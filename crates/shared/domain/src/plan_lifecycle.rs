//! Diet plan lifecycle.
//!
//! States are a plain enum; legality of every (state, action) pair is read
//! from [`TRANSITION_TABLE`]. COMPLETED and CANCELLED are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DietPlanStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

impl DietPlanStatus {
    pub const ALL: [DietPlanStatus; 4] = [
        DietPlanStatus::Draft,
        DietPlanStatus::Active,
        DietPlanStatus::Completed,
        DietPlanStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietPlanStatus::Draft => "DRAFT",
            DietPlanStatus::Active => "ACTIVE",
            DietPlanStatus::Completed => "COMPLETED",
            DietPlanStatus::Cancelled => "CANCELLED",
        }
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DietPlanStatus::Completed | DietPlanStatus::Cancelled)
    }

    /// Actions that are legal from this state.
    pub fn allowed_actions(&self) -> Vec<PlanAction> {
        PlanAction::ALL
            .into_iter()
            .filter(|action| transition(*self, *action).is_ok())
            .collect()
    }
}

impl fmt::Display for DietPlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietPlanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DietPlanStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::validation(format!("Invalid diet plan status: {}", s))
                    .with_meta("field", "status")
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanAction {
    Activate,
    Complete,
    Cancel,
}

impl PlanAction {
    pub const ALL: [PlanAction; 3] = [PlanAction::Activate, PlanAction::Complete, PlanAction::Cancel];
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanAction::Activate => "activate",
            PlanAction::Complete => "complete",
            PlanAction::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

/// Outcome of an action in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Allowed(DietPlanStatus),
    Denied(&'static str),
}

/// One row per (state, action) pair.
pub const TRANSITION_TABLE: [(DietPlanStatus, PlanAction, Transition); 12] = {
    use DietPlanStatus::*;
    use PlanAction::*;
    use Transition::*;

    [
        (Draft, Activate, Allowed(Active)),
        (Draft, Complete, Denied("Only active diet plans can be completed")),
        (Draft, Cancel, Allowed(Cancelled)),
        (Active, Activate, Denied("Diet plan is already active")),
        (Active, Complete, Allowed(Completed)),
        (Active, Cancel, Allowed(Cancelled)),
        (Completed, Activate, Denied("Cannot activate a completed diet plan")),
        (Completed, Complete, Denied("Only active diet plans can be completed")),
        (Completed, Cancel, Denied("Cannot cancel a completed diet plan")),
        (Cancelled, Activate, Denied("Cannot activate a cancelled diet plan")),
        (Cancelled, Complete, Denied("Only active diet plans can be completed")),
        (Cancelled, Cancel, Denied("Diet plan is already cancelled")),
    ]
};

/// Look up the next state for `action` taken in `from`.
///
/// # Errors
/// Returns a business rule error for every denied pair.
pub fn transition(from: DietPlanStatus, action: PlanAction) -> DomainResult<DietPlanStatus> {
    let rule = TRANSITION_TABLE
        .iter()
        .find(|(state, act, _)| *state == from && *act == action)
        .map(|(_, _, outcome)| *outcome)
        .unwrap_or(Transition::Denied("Unsupported diet plan transition"));

    match rule {
        Transition::Allowed(next) => Ok(next),
        Transition::Denied(reason) => Err(DomainError::business_rule(reason)
            .with_meta("status", from)
            .with_meta("action", action)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_table_covers_every_pair() {
        for status in DietPlanStatus::ALL {
            for action in PlanAction::ALL {
                let rows = TRANSITION_TABLE
                    .iter()
                    .filter(|(s, a, _)| *s == status && *a == action)
                    .count();
                assert_eq!(rows, 1, "{status} / {action}");
            }
        }
    }

    #[test]
    fn test_legal_transitions() {
        use DietPlanStatus::*;
        assert_eq!(transition(Draft, PlanAction::Activate).unwrap(), Active);
        assert_eq!(transition(Draft, PlanAction::Cancel).unwrap(), Cancelled);
        assert_eq!(transition(Active, PlanAction::Complete).unwrap(), Completed);
        assert_eq!(transition(Active, PlanAction::Cancel).unwrap(), Cancelled);
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for status in [DietPlanStatus::Completed, DietPlanStatus::Cancelled] {
            assert!(status.is_terminal());
            assert!(status.allowed_actions().is_empty());
            for action in PlanAction::ALL {
                let err = transition(status, action).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::BusinessRule);
            }
        }
    }

    #[test]
    fn test_denial_messages() {
        assert_eq!(
            transition(DietPlanStatus::Completed, PlanAction::Activate).unwrap_err().to_string(),
            "Cannot activate a completed diet plan"
        );
        assert_eq!(
            transition(DietPlanStatus::Cancelled, PlanAction::Activate).unwrap_err().to_string(),
            "Cannot activate a cancelled diet plan"
        );
        assert_eq!(
            transition(DietPlanStatus::Draft, PlanAction::Complete).unwrap_err().to_string(),
            "Only active diet plans can be completed"
        );
        assert_eq!(
            transition(DietPlanStatus::Completed, PlanAction::Cancel).unwrap_err().to_string(),
            "Cannot cancel a completed diet plan"
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("active".parse::<DietPlanStatus>().unwrap(), DietPlanStatus::Active);
        assert_eq!(" DRAFT ".parse::<DietPlanStatus>().unwrap(), DietPlanStatus::Draft);
        assert!("PAUSED".parse::<DietPlanStatus>().is_err());
    }

    #[test]
    fn test_allowed_actions_from_draft() {
        assert_eq!(
            DietPlanStatus::Draft.allowed_actions(),
            vec![PlanAction::Activate, PlanAction::Cancel]
        );
    }
}
