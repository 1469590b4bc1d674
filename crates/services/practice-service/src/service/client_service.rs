//! Client service - client records owned by dietitians.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use common::{AppResult, OptionExt, Paginated, PaginationConfig, PaginationParams};
use domain::specification::{ActiveClientsOfDietitian, ClientNameContains, ClientsOfDietitian, ClientsWithAllergy};
use domain::{Client, CreateClient, DomainError, Email, Specification, User};

use crate::repository::{ClientRepository, SortOrder, UserRepository};

/// One change to a client's allergy, condition or medication lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthRecordEdit {
    AddAllergy(String),
    RemoveAllergy(String),
    AddMedicalCondition(String),
    RemoveMedicalCondition(String),
    AddMedication(String),
    RemoveMedication(String),
}

impl HealthRecordEdit {
    fn apply(&self, client: &mut Client) -> AppResult<()> {
        match self {
            HealthRecordEdit::AddAllergy(value) => client.add_allergy(value)?,
            HealthRecordEdit::RemoveAllergy(value) => client.remove_allergy(value),
            HealthRecordEdit::AddMedicalCondition(value) => client.add_medical_condition(value)?,
            HealthRecordEdit::RemoveMedicalCondition(value) => client.remove_medical_condition(value),
            HealthRecordEdit::AddMedication(value) => client.add_medication(value)?,
            HealthRecordEdit::RemoveMedication(value) => client.remove_medication(value),
        }
        Ok(())
    }
}

#[async_trait]
pub trait ClientService: Send + Sync {
    /// Create a client owned by `dietitian_id`
    async fn create_client(&self, dietitian_id: Uuid, data: CreateClient) -> AppResult<Client>;

    async fn get_client(&self, id: Uuid) -> AppResult<Client>;

    /// Active clients of a dietitian, by last name
    async fn list_clients(&self, dietitian_id: Uuid, page: PaginationParams) -> AppResult<Paginated<Client>>;

    /// Name or email search within a dietitian's clients
    async fn search_clients(&self, dietitian_id: Uuid, term: &str) -> AppResult<Vec<Client>>;

    async fn clients_with_allergy(&self, dietitian_id: Uuid, allergy: &str) -> AppResult<Vec<Client>>;

    async fn edit_health_record(&self, id: Uuid, edit: HealthRecordEdit) -> AppResult<Client>;

    async fn update_notes(&self, id: Uuid, notes: Option<String>) -> AppResult<Client>;

    async fn update_contact(&self, id: Uuid, email: &str, phone: Option<String>) -> AppResult<Client>;

    /// Hand a client over to another dietitian
    async fn reassign_client(&self, id: Uuid, dietitian_id: Uuid) -> AppResult<Client>;

    async fn delete_client(&self, id: Uuid) -> AppResult<()>;
}

pub struct ClientManager {
    clients: Arc<dyn ClientRepository>,
    users: Arc<dyn UserRepository>,
    pagination: PaginationConfig,
}

impl ClientManager {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        users: Arc<dyn UserRepository>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            clients,
            users,
            pagination,
        }
    }

    /// The user must exist, be active and be allowed to own clients.
    async fn require_dietitian(&self, dietitian_id: Uuid) -> AppResult<User> {
        let user = self
            .users
            .find_by_id(dietitian_id)
            .await?
            .ok_or_not_found("User", dietitian_id)?;

        if !user.role().can_manage_clients() || !user.is_active() {
            return Err(DomainError::business_rule("Clients can only be assigned to an active dietitian")
                .with_meta("dietitian_id", dietitian_id)
                .with_meta("role", user.role())
                .into());
        }
        Ok(user)
    }

    async fn ensure_email_free(&self, email: &Email, owner: Option<Uuid>) -> AppResult<()> {
        if let Some(existing) = self.clients.find_by_email(email).await? {
            if Some(existing.id()) != owner {
                return Err(DomainError::conflict("A client with this email already exists")
                    .with_meta("field", "email")
                    .into());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ClientService for ClientManager {
    async fn create_client(&self, dietitian_id: Uuid, data: CreateClient) -> AppResult<Client> {
        self.require_dietitian(dietitian_id).await?;

        let client = Client::create(self.clients.next_id(), dietitian_id, data)?;
        self.ensure_email_free(client.email(), None).await?;
        let client = self.clients.create(&client).await?;

        info!(client_id = %client.id(), dietitian_id = %dietitian_id, "Client created");
        Ok(client)
    }

    async fn get_client(&self, id: Uuid) -> AppResult<Client> {
        self.clients.find_by_id(id).await?.ok_or_not_found("Client", id)
    }

    async fn list_clients(&self, dietitian_id: Uuid, page: PaginationParams) -> AppResult<Paginated<Client>> {
        let spec = ActiveClientsOfDietitian { dietitian_id };
        self.clients
            .find_paginated(&spec.to_filter(), page.within(&self.pagination))
            .await
    }

    async fn search_clients(&self, dietitian_id: Uuid, term: &str) -> AppResult<Vec<Client>> {
        let spec = ClientsOfDietitian { dietitian_id }.and(ClientNameContains {
            term: term.to_string(),
        });
        self.clients.find_sorted(&spec.to_filter(), &SortOrder::asc("last_name")).await
    }

    async fn clients_with_allergy(&self, dietitian_id: Uuid, allergy: &str) -> AppResult<Vec<Client>> {
        let spec = ClientsOfDietitian { dietitian_id }.and(ClientsWithAllergy {
            allergy: allergy.to_string(),
        });
        self.clients.find(&spec.to_filter()).await
    }

    async fn edit_health_record(&self, id: Uuid, edit: HealthRecordEdit) -> AppResult<Client> {
        let mut client = self.get_client(id).await?;
        edit.apply(&mut client)?;
        self.clients.update(&client).await
    }

    async fn update_notes(&self, id: Uuid, notes: Option<String>) -> AppResult<Client> {
        let mut client = self.get_client(id).await?;
        client.update_notes(notes);
        self.clients.update(&client).await
    }

    async fn update_contact(&self, id: Uuid, email: &str, phone: Option<String>) -> AppResult<Client> {
        let email = Email::create(email)?;
        self.ensure_email_free(&email, Some(id)).await?;

        let mut client = self.get_client(id).await?;
        client.update_contact(email, phone);
        self.clients.update(&client).await
    }

    async fn reassign_client(&self, id: Uuid, dietitian_id: Uuid) -> AppResult<Client> {
        let mut client = self.get_client(id).await?;
        self.require_dietitian(dietitian_id).await?;

        let previous = client.dietitian_id();
        client.assign_to_dietitian(dietitian_id)?;
        let client = self.clients.update(&client).await?;

        info!(client_id = %id, from = %previous, to = %dietitian_id, "Client reassigned");
        Ok(client)
    }

    async fn delete_client(&self, id: Uuid) -> AppResult<()> {
        self.clients.delete(id).await?;
        info!(client_id = %id, "Client deleted");
        Ok(())
    }
}
