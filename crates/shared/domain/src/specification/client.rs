//! Client specifications.

use serde_json::Value;
use uuid::Uuid;

use super::{record_of, Filter, Record, SoftDeletable, Specification};
use crate::client::Client;

impl Record for Client {
    fn to_record(&self) -> Value {
        record_of(&self.to_props())
    }
}

impl SoftDeletable for Client {
    fn is_deleted(&self) -> bool {
        Client::is_deleted(self)
    }
}

/// All non-deleted clients of a dietitian, active or not.
#[derive(Debug, Clone)]
pub struct ClientsOfDietitian {
    pub dietitian_id: Uuid,
}

impl Specification<Client> for ClientsOfDietitian {
    fn is_satisfied_by(&self, client: &Client) -> bool {
        client.dietitian_id() == self.dietitian_id && !client.is_deleted()
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("dietitian_id", self.dietitian_id).and(Filter::is_null("deleted_at"))
    }

    fn describe(&self) -> String {
        format!("clients of dietitian {}", self.dietitian_id)
    }
}

/// Active, non-deleted clients of a dietitian.
#[derive(Debug, Clone)]
pub struct ActiveClientsOfDietitian {
    pub dietitian_id: Uuid,
}

impl Specification<Client> for ActiveClientsOfDietitian {
    fn is_satisfied_by(&self, client: &Client) -> bool {
        client.dietitian_id() == self.dietitian_id && client.is_active() && !client.is_deleted()
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("dietitian_id", self.dietitian_id)
            .and(Filter::eq("is_active", true))
            .and(Filter::is_null("deleted_at"))
    }

    fn describe(&self) -> String {
        format!("active clients of dietitian {}", self.dietitian_id)
    }
}

/// Clients with an allergy on record (exact entry).
#[derive(Debug, Clone)]
pub struct ClientsWithAllergy {
    pub allergy: String,
}

impl Specification<Client> for ClientsWithAllergy {
    fn is_satisfied_by(&self, client: &Client) -> bool {
        client.allergies().iter().any(|a| a == self.allergy.trim())
    }

    fn to_filter(&self) -> Filter {
        Filter::contains("allergies", self.allergy.trim())
    }

    fn describe(&self) -> String {
        format!("clients allergic to {}", self.allergy.trim())
    }
}

/// Free-text search over first name, last name and email.
#[derive(Debug, Clone)]
pub struct ClientNameContains {
    pub term: String,
}

impl Specification<Client> for ClientNameContains {
    fn is_satisfied_by(&self, client: &Client) -> bool {
        let term = self.term.to_lowercase();
        [client.first_name(), client.last_name(), client.email().value()]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    fn to_filter(&self) -> Filter {
        Filter::like("first_name", &self.term)
            .or(Filter::like("last_name", &self.term))
            .or(Filter::like("email", &self.term))
    }

    fn describe(&self) -> String {
        format!("clients matching '{}'", self.term)
    }
}
