//! User aggregate and related types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_CLIENT, ROLE_DIETITIAN};
use crate::error::{required_text, DomainError, DomainResult};
use crate::value_objects::{Email, Password};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Dietitian,
    Client,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Dietitians and admins may own and edit client records
    pub fn can_manage_clients(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Dietitian)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Dietitian => ROLE_DIETITIAN,
            UserRole::Client => ROLE_CLIENT,
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_DIETITIAN => Ok(UserRole::Dietitian),
            ROLE_CLIENT => Ok(UserRole::Client),
            _ => Err(DomainError::validation(format!("Invalid role: {}", s)).with_meta("field", "role")),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted shape of a [`User`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProps {
    pub id: Uuid,
    pub email: Email,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// User aggregate. The id is assigned by the persistence gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    props: UserProps,
}

fn require_hashed(password: &Password) -> DomainResult<()> {
    if !password.is_hashed() {
        return Err(DomainError::validation("Password must be hashed before it is stored")
            .with_meta("field", "password"));
    }
    Ok(())
}

impl User {
    /// Create a new, active user.
    ///
    /// # Errors
    /// Fails when a name is blank or the password is not a hash.
    pub fn create(
        id: Uuid,
        email: Email,
        password: Password,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> DomainResult<Self> {
        require_hashed(&password)?;
        let now = Utc::now();

        Ok(Self {
            props: UserProps {
                id,
                email,
                password_hash: password.value().to_string(),
                first_name: required_text(first_name, "First name")?,
                last_name: required_text(last_name, "Last name")?,
                role,
                is_active: true,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        })
    }

    /// Rehydrate from persisted data without validation.
    pub fn reconstitute(props: UserProps) -> Self {
        Self { props }
    }

    pub fn to_props(&self) -> UserProps {
        self.props.clone()
    }

    pub fn id(&self) -> Uuid {
        self.props.id
    }

    pub fn email(&self) -> &Email {
        &self.props.email
    }

    pub fn password(&self) -> Password {
        Password::from_hash(self.props.password_hash.clone())
    }

    pub fn first_name(&self) -> &str {
        &self.props.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.props.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.props.first_name, self.props.last_name)
    }

    pub fn role(&self) -> UserRole {
        self.props.role
    }

    pub fn is_active(&self) -> bool {
        self.props.is_active
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

    /// Check if user is soft deleted
    pub fn is_deleted(&self) -> bool {
        self.props.deleted_at.is_some()
    }

    pub fn update_email(&mut self, email: Email) {
        self.props.email = email;
        self.touch();
    }

    /// Replace the stored hash. Plaintext values are rejected.
    pub fn update_password(&mut self, password: Password) -> DomainResult<()> {
        require_hashed(&password)?;
        self.props.password_hash = password.value().to_string();
        self.touch();
        Ok(())
    }

    pub fn update_profile(&mut self, first_name: &str, last_name: &str) -> DomainResult<()> {
        let first_name = required_text(first_name, "First name")?;
        let last_name = required_text(last_name, "Last name")?;
        self.props.first_name = first_name;
        self.props.last_name = last_name;
        self.touch();
        Ok(())
    }

    pub fn update_role(&mut self, role: UserRole) {
        self.props.role = role;
        self.touch();
    }

    pub fn activate(&mut self) {
        self.props.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.props.is_active = false;
        self.touch();
    }

    /// Stamp the deletion and force the user inactive.
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.props.deleted_at = Some(now);
        self.props.is_active = false;
        self.props.updated_at = now;
    }

    /// Clear the deletion stamp. The user stays inactive until activated.
    pub fn restore(&mut self) {
        self.props.deleted_at = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.props.updated_at = Utc::now();
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            role: user.role().to_string(),
            is_active: user.is_active(),
            created_at: user.created_at(),
            deleted_at: user.deleted_at(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}
