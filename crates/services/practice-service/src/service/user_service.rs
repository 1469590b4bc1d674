//! User service - registration, credentials and profile upkeep.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::specification::{ActiveUsers, NotDeleted, UsersByRole};
use domain::{DomainError, Email, Password, Specification, User, UserRole};

use crate::hashing::PasswordHasher;
use crate::repository::{SortOrder, UserRepository};

/// Registration input with a plaintext password
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Validate, hash and store a new user
    async fn register(&self, data: RegisterUser) -> AppResult<User>;

    /// Check credentials of an active user
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;

    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Active users holding `role`, by last name
    async fn list_users_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;

    async fn update_profile(&self, id: Uuid, first_name: &str, last_name: &str) -> AppResult<User>;

    async fn change_password(&self, id: Uuid, current: &str, new_password: &str) -> AppResult<User>;

    async fn deactivate_user(&self, id: Uuid) -> AppResult<User>;

    /// Soft delete user (sets deleted_at timestamp)
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserManager {
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    fn invalid_credentials() -> AppError {
        AppError::unauthorized("Invalid credentials")
    }

    /// Validate a plaintext password and return its stored form.
    fn hashed(&self, plain_text: &str) -> AppResult<Password> {
        let checked = Password::create(plain_text)?;
        Ok(Password::from_hash(self.hasher.hash(checked.value())?))
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, data: RegisterUser) -> AppResult<User> {
        let email = Email::create(&data.email)?;
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email already registered")
                .with_meta("field", "email")
                .into());
        }

        let password = self.hashed(&data.password)?;
        let user = User::create(
            self.repo.next_id(),
            email,
            password,
            &data.first_name,
            &data.last_name,
            data.role,
        )?;
        let user = self.repo.create(&user).await?;

        info!(user_id = %user.id(), role = %user.role(), "User registered");
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let email = Email::create(email).map_err(|_| Self::invalid_credentials())?;
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or_else(Self::invalid_credentials)?;

        if !self.hasher.verify(password, user.password().value())? {
            warn!(user_id = %user.id(), "Failed login attempt");
            return Err(Self::invalid_credentials());
        }
        if !user.is_active() {
            return Err(AppError::unauthorized("Account is deactivated"));
        }
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found("User", id)
    }

    async fn list_users_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let spec = UsersByRole { role }.and(ActiveUsers).and(NotDeleted::new());
        self.repo.find_sorted(&spec.to_filter(), &SortOrder::asc("last_name")).await
    }

    async fn update_profile(&self, id: Uuid, first_name: &str, last_name: &str) -> AppResult<User> {
        let mut user = self.get_user(id).await?;
        user.update_profile(first_name, last_name)?;
        self.repo.update(&user).await
    }

    async fn change_password(&self, id: Uuid, current: &str, new_password: &str) -> AppResult<User> {
        let mut user = self.get_user(id).await?;
        if !self.hasher.verify(current, user.password().value())? {
            return Err(Self::invalid_credentials());
        }

        user.update_password(self.hashed(new_password)?)?;
        let user = self.repo.update(&user).await?;
        info!(user_id = %id, "Password changed");
        Ok(user)
    }

    async fn deactivate_user(&self, id: Uuid) -> AppResult<User> {
        let mut user = self.get_user(id).await?;
        user.deactivate();
        self.repo.update(&user).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
