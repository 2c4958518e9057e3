//! Client domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use super::location::Location;
use crate::errors::DomainError;

/// Contract status of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Pending => "pending",
        }
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            "pending" => Ok(ClientStatus::Pending),
            _ => Err(format!("Unknown client status: {}", s)),
        }
    }
}

/// A customer of the guard company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client with its sites embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub address: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub status: ClientStatus,
}

#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub status: Option<ClientStatus>,
}

/// Request payload for creating a client.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 200, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(length(min = 5, max = 500, message = "Address must be at least 5 characters"))]
    pub address: String,

    #[validate(length(min = 2, max = 100, message = "Contact person must be at least 2 characters"))]
    pub contact_person: String,

    #[validate(length(min = 5, max = 30, message = "Contact phone must be at least 5 characters"))]
    pub contact_phone: String,

    #[validate(email(message = "Invalid email address"))]
    pub contact_email: String,

    pub contract_start: Option<NaiveDate>,

    pub contract_end: Option<NaiveDate>,

    pub status: Option<ClientStatus>,
}

impl CreateClientRequest {
    pub fn into_new_client(self) -> NewClient {
        NewClient {
            name: self.name,
            address: self.address,
            contact_person: self.contact_person,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            contract_start: self.contract_start,
            contract_end: self.contract_end,
            status: self.status.unwrap_or_default(),
        }
    }
}

/// Request payload for updating a client.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    #[validate(length(min = 2, max = 200, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 5, max = 500, message = "Address must be at least 5 characters"))]
    pub address: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Contact person must be at least 2 characters"))]
    pub contact_person: Option<String>,

    #[validate(length(min = 5, max = 30, message = "Contact phone must be at least 5 characters"))]
    pub contact_phone: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub contact_email: Option<String>,

    pub contract_start: Option<NaiveDate>,

    pub contract_end: Option<NaiveDate>,

    pub status: Option<ClientStatus>,
}

impl From<UpdateClientRequest> for ClientPatch {
    fn from(request: UpdateClientRequest) -> Self {
        Self {
            name: request.name,
            address: request.address,
            contact_person: request.contact_person,
            contact_phone: request.contact_phone,
            contact_email: request.contact_email,
            contract_start: request.contract_start,
            contract_end: request.contract_end,
            status: request.status,
        }
    }
}

/// Checks that a contract does not end before it starts.
pub fn check_contract_period(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), DomainError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(DomainError::validation(
            "Contract end date must not be before contract start date",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_client_request_thresholds() {
        let request: CreateClientRequest = serde_json::from_value(serde_json::json!({
            "name": "A",
            "address": "Main",
            "contactPerson": "B",
            "contactPhone": "123",
            "contactEmail": "nope"
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("address"));
        assert!(fields.contains_key("contact_person"));
        assert!(fields.contains_key("contact_phone"));
        assert!(fields.contains_key("contact_email"));
    }

    #[test]
    fn test_create_client_request_defaults_status() {
        let request: CreateClientRequest = serde_json::from_value(serde_json::json!({
            "name": "Acme Corp",
            "address": "12 Harbour Road",
            "contactPerson": "Jane Roe",
            "contactPhone": "+44 20 7946 0000",
            "contactEmail": "jane@acme.test",
            "contractStart": "2024-01-01"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let new_client = request.into_new_client();
        assert_eq!(new_client.status, ClientStatus::Active);
        assert_eq!(new_client.contract_start, Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_check_contract_period() {
        assert!(check_contract_period(None, None).is_ok());
        assert!(check_contract_period(Some(date(2024, 1, 1)), None).is_ok());
        assert!(check_contract_period(Some(date(2024, 1, 1)), Some(date(2024, 1, 1))).is_ok());
        assert!(check_contract_period(Some(date(2024, 1, 1)), Some(date(2025, 1, 1))).is_ok());
        assert!(matches!(
            check_contract_period(Some(date(2024, 6, 1)), Some(date(2024, 5, 31))),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_client_status_round_trip() {
        for status in [ClientStatus::Active, ClientStatus::Inactive, ClientStatus::Pending] {
            assert_eq!(ClientStatus::from_str(status.as_str()).unwrap(), status);
        }
    }
}
