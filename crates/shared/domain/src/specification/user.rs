//! User specifications.

use serde_json::Value;

use super::{record_of, Filter, Record, SoftDeletable, Specification};
use crate::user::{User, UserRole};
use crate::value_objects::Email;

impl Record for User {
    fn to_record(&self) -> Value {
        record_of(&self.to_props())
    }
}

impl SoftDeletable for User {
    fn is_deleted(&self) -> bool {
        User::is_deleted(self)
    }
}

#[derive(Debug, Clone)]
pub struct UsersByRole {
    pub role: UserRole,
}

impl Specification<User> for UsersByRole {
    fn is_satisfied_by(&self, user: &User) -> bool {
        user.role() == self.role
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("role", self.role.as_str())
    }

    fn describe(&self) -> String {
        format!("users with role {}", self.role)
    }
}

/// Active and not soft-deleted.
#[derive(Debug, Clone, Default)]
pub struct ActiveUsers;

impl Specification<User> for ActiveUsers {
    fn is_satisfied_by(&self, user: &User) -> bool {
        user.is_active() && !user.is_deleted()
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("is_active", true).and(Filter::is_null("deleted_at"))
    }

    fn describe(&self) -> String {
        "active users".to_string()
    }
}

/// Exact (normalized) email match, deleted users included.
#[derive(Debug, Clone)]
pub struct UserWithEmail {
    pub email: Email,
}

impl Specification<User> for UserWithEmail {
    fn is_satisfied_by(&self, user: &User) -> bool {
        user.email() == &self.email
    }

    fn to_filter(&self) -> Filter {
        Filter::eq("email", self.email.value())
    }

    fn describe(&self) -> String {
        format!("user with email {}", self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::testing::assert_faces_agree;
    use crate::value_objects::Password;
    use uuid::Uuid;

    fn user(email: &str, role: UserRole) -> User {
        User::create(
            Uuid::new_v4(),
            Email::create(email).unwrap(),
            Password::from_hash("hash"),
            "First",
            "Last",
            role,
        )
        .unwrap()
    }

    #[test]
    fn test_user_specs_faces_agree() {
        let mut deleted = user("gone@clinic.com", UserRole::Dietitian);
        deleted.soft_delete();
        let users = vec![
            user("admin@clinic.com", UserRole::Admin),
            user("rd@clinic.com", UserRole::Dietitian),
            user("me@mail.com", UserRole::Client),
            deleted,
        ];

        let dietitians = UsersByRole { role: UserRole::Dietitian };
        assert_eq!(users.iter().filter(|u| dietitians.is_satisfied_by(u)).count(), 2);

        assert_faces_agree(&dietitians, &users);
        assert_faces_agree(&ActiveUsers, &users);
        assert_faces_agree(&dietitians.and(ActiveUsers), &users);
        assert_faces_agree(
            &UserWithEmail { email: Email::create("RD@clinic.com").unwrap() },
            &users,
        );
    }
}
