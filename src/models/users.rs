use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// UI hint only. Privileged handlers re-check the admins table on
    /// every request.
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminCheckResponse {
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_ok};

    fn registration(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: "Amina Diallo".to_string(),
        }
    }

    #[test]
    fn well_formed_registrations_validate() {
        assert_ok!(registration("amina@example.com", "s3cret-enough").validate());
        assert_ok!(registration("a.b+tag@mail.example.org", "123456").validate());
    }

    #[test]
    fn malformed_emails_are_rejected() {
        assert_err!(registration("no-at-sign", "s3cret-enough").validate());
        assert_err!(registration("@example.com", "s3cret-enough").validate());
        assert_err!(registration("user@", "s3cret-enough").validate());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert_err!(registration("amina@example.com", "12345").validate());
        assert_err!(registration("amina@example.com", "").validate());
    }

    #[test]
    fn empty_full_names_are_rejected() {
        let mut request = registration("amina@example.com", "s3cret-enough");
        request.full_name = String::new();
        assert_err!(request.validate());
    }
}
