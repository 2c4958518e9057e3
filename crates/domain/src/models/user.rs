//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::role::RoleName;

/// A stored user account.
///
/// Not `Serialize`: the password hash must never reach a response.
/// Use [`UserResponse`] or [`UserSummary`] for output.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: i64,
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last", falling back to the username when no name is set.
    pub fn display_name(&self) -> String {
        full_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }
}

/// Joins first and last name, falling back to `fallback` when both are empty.
pub fn full_name(first: Option<&str>, last: Option<&str>, fallback: &str) -> String {
    let name = [first.unwrap_or(""), last.unwrap_or("")]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// Minimal user projection embedded in guard and incident responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// User as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: i64,
    pub role: Option<RoleName>,
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_user(user: &User, role: Option<RoleName>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role_id: user.role_id,
            role,
            active: user.active,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Insert payload handed to the store. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: i64,
}

/// Partial update handed to the store. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<i64>,
    pub active: Option<bool>,
}

/// Request payload for creating a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "First name must be at least 2 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Last name must be at least 2 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub role_id: i64,
}

/// Request payload for updating a user.
///
/// `username` is accepted only so that an attempt to change it can be rejected
/// with a validation error instead of being silently dropped.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 2, max = 100, message = "First name must be at least 2 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Last name must be at least 2 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub role_id: Option<i64>,

    pub active: Option<bool>,
}

/// Login request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response: a bearer token and the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: "jdoe".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("john@example.com".to_string()),
            phone: None,
            role_id: 4,
            active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_response_has_no_password() {
        let user = sample_user();
        let json = serde_json::to_value(UserResponse::from_user(&user, Some(RoleName::Guard)))
            .unwrap();

        assert_eq!(json["username"], "jdoe");
        assert_eq!(json["role"], "guard");
        assert_eq!(json["roleId"], 4);
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2id"));
    }

    #[test]
    fn test_user_summary_from_user() {
        let summary = UserSummary::from(&sample_user());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["lastName"], "Doe");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_display_name() {
        let mut user = sample_user();
        assert_eq!(user.display_name(), "John Doe");

        user.last_name = None;
        assert_eq!(user.display_name(), "John");

        user.first_name = None;
        assert_eq!(user.display_name(), "jdoe");
    }

    #[test]
    fn test_create_user_request_validation() {
        let request = CreateUserRequest {
            username: "ab".to_string(),
            password: "12345".to_string(),
            first_name: None,
            last_name: None,
            email: Some("not-an-email".to_string()),
            phone: None,
            role_id: 1,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_create_user_request_valid() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"username":"chief","password":"secret1","firstName":"Ana","roleId":2}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.role_id, 2);
    }
}
