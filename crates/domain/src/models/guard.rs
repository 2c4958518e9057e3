//! Guard domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use super::user::UserSummary;

/// Employment status of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardStatus {
    #[default]
    Active,
    Inactive,
    #[serde(alias = "on-leave")]
    OnLeave,
}

impl GuardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardStatus::Active => "active",
            GuardStatus::Inactive => "inactive",
            GuardStatus::OnLeave => "on_leave",
        }
    }
}

impl FromStr for GuardStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GuardStatus::Active),
            "inactive" => Ok(GuardStatus::Inactive),
            "on_leave" | "on-leave" => Ok(GuardStatus::OnLeave),
            _ => Err(format!("Unknown guard status: {}", s)),
        }
    }
}

/// A guard profile. Always linked 1:1 to a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guard {
    pub id: i64,
    pub user_id: i64,
    /// Human-readable code such as `G-2023-045`.
    #[serde(rename = "guardId")]
    pub guard_code: String,
    pub national_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub join_date: NaiveDate,
    pub position: String,
    pub status: GuardStatus,
    pub performance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Guard with its user summary embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardResponse {
    #[serde(flatten)]
    pub guard: Guard,
    pub user: Option<UserSummary>,
}

/// Guard projection embedded in schedule responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardSummary {
    pub id: i64,
    #[serde(rename = "guardId")]
    pub guard_code: String,
    pub position: String,
}

impl From<&Guard> for GuardSummary {
    fn from(guard: &Guard) -> Self {
        Self {
            id: guard.id,
            guard_code: guard.guard_code.clone(),
            position: guard.position.clone(),
        }
    }
}

/// Guard profile insert payload. The user id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewGuard {
    pub guard_code: String,
    pub national_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub join_date: NaiveDate,
    pub position: String,
    pub status: GuardStatus,
    pub performance: f64,
}

/// Partial guard update.
#[derive(Debug, Clone, Default)]
pub struct GuardPatch {
    pub guard_code: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub position: Option<String>,
    pub status: Option<GuardStatus>,
    pub performance: Option<f64>,
}

/// Request payload for creating a guard together with its user account.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuardRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "First name must be at least 2 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 100, message = "Last name must be at least 2 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[serde(rename = "guardId")]
    #[validate(custom(function = "shared::validation::validate_guard_code"))]
    pub guard_code: String,

    #[validate(length(min = 3, max = 50, message = "National ID must be at least 3 characters"))]
    pub national_id: String,

    pub date_of_birth: Option<NaiveDate>,

    pub address: Option<String>,

    pub emergency_contact: Option<String>,

    pub join_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 100, message = "Position is required"))]
    pub position: String,

    pub status: Option<GuardStatus>,

    #[validate(custom(function = "shared::validation::validate_performance"))]
    pub performance: Option<f64>,
}

/// Request payload for updating a guard profile.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuardRequest {
    #[serde(rename = "guardId")]
    #[validate(custom(function = "shared::validation::validate_guard_code"))]
    pub guard_code: Option<String>,

    #[validate(length(min = 3, max = 50, message = "National ID must be at least 3 characters"))]
    pub national_id: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    pub address: Option<String>,

    pub emergency_contact: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Position is required"))]
    pub position: Option<String>,

    pub status: Option<GuardStatus>,

    #[validate(custom(function = "shared::validation::validate_performance"))]
    pub performance: Option<f64>,
}

impl From<UpdateGuardRequest> for GuardPatch {
    fn from(request: UpdateGuardRequest) -> Self {
        Self {
            guard_code: request.guard_code,
            national_id: request.national_id,
            date_of_birth: request.date_of_birth,
            address: request.address,
            emergency_contact: request.emergency_contact,
            position: request.position,
            status: request.status,
            performance: request.performance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request_json() -> serde_json::Value {
        serde_json::json!({
            "username": "jsmith",
            "password": "secret1",
            "firstName": "John",
            "lastName": "Smith",
            "guardId": "G-2023-045",
            "nationalId": "880101-1234",
            "position": "Guard"
        })
    }

    #[test]
    fn test_guard_status_serialization() {
        assert_eq!(
            serde_json::to_string(&GuardStatus::OnLeave).unwrap(),
            "\"on_leave\""
        );
        let status: GuardStatus = serde_json::from_str("\"on-leave\"").unwrap();
        assert_eq!(status, GuardStatus::OnLeave);
        assert_eq!(GuardStatus::from_str("inactive").unwrap(), GuardStatus::Inactive);
        assert!(GuardStatus::from_str("retired").is_err());
    }

    #[test]
    fn test_create_guard_request_valid() {
        let request: CreateGuardRequest = serde_json::from_value(valid_request_json()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.guard_code, "G-2023-045");
    }

    #[test]
    fn test_create_guard_request_rejects_bad_guard_code() {
        let mut json = valid_request_json();
        json["guardId"] = serde_json::json!("045");
        let request: CreateGuardRequest = serde_json::from_value(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_guard_request_rejects_short_fields() {
        let mut json = valid_request_json();
        json["firstName"] = serde_json::json!("J");
        json["nationalId"] = serde_json::json!("12");
        json["position"] = serde_json::json!("");
        let request: CreateGuardRequest = serde_json::from_value(json).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("national_id"));
        assert!(fields.contains_key("position"));
    }

    #[test]
    fn test_update_guard_request_rejects_out_of_range_performance() {
        let request = UpdateGuardRequest {
            performance: Some(120.0),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_guard_serializes_code_as_guard_id() {
        let now = Utc::now();
        let guard = Guard {
            id: 1,
            user_id: 2,
            guard_code: "G-2024-001".to_string(),
            national_id: "ABC123".to_string(),
            date_of_birth: None,
            address: None,
            emergency_contact: None,
            join_date: now.date_naive(),
            position: "Team Leader".to_string(),
            status: GuardStatus::Active,
            performance: 88.0,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(GuardResponse { guard, user: None }).unwrap();
        assert_eq!(json["guardId"], "G-2024-001");
        assert_eq!(json["userId"], 2);
        assert!(json["user"].is_null());
    }
}
