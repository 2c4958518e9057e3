//! Location (client site) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    #[default]
    Active,
    Inactive,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Active => "active",
            LocationStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for LocationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LocationStatus::Active),
            "inactive" => Ok(LocationStatus::Inactive),
            _ => Err(format!("Unknown location status: {}", s)),
        }
    }
}

/// A site belonging to a client where guards are deployed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: LocationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Location projection embedded in schedule and incident responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

impl From<&Location> for LocationSummary {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id,
            name: location.name.clone(),
            address: location.address.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub client_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: LocationStatus,
}

#[derive(Debug, Clone, Default)]
pub struct LocationPatch {
    pub client_id: Option<i64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<LocationStatus>,
}

/// Request payload for creating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    pub client_id: i64,

    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(max = 500, message = "Address is too long"))]
    pub address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,

    pub status: Option<LocationStatus>,
}

impl CreateLocationRequest {
    pub fn into_new_location(self) -> NewLocation {
        NewLocation {
            client_id: self.client_id,
            name: self.name,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            status: self.status.unwrap_or_default(),
        }
    }
}

/// Request payload for updating a location.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub client_id: Option<i64>,

    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Address is too long"))]
    pub address: Option<String>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,

    pub status: Option<LocationStatus>,
}

impl From<UpdateLocationRequest> for LocationPatch {
    fn from(request: UpdateLocationRequest) -> Self {
        Self {
            client_id: request.client_id,
            name: request.name,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
            status: request.status,
        }
    }
}

/// Query parameters for listing locations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub client_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_location_request_coordinates() {
        let request: CreateLocationRequest = serde_json::from_value(serde_json::json!({
            "clientId": 1,
            "name": "North Gate",
            "latitude": 91.0,
            "longitude": -181.0
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("longitude"));
    }

    #[test]
    fn test_create_location_request_without_coordinates() {
        let request: CreateLocationRequest = serde_json::from_value(serde_json::json!({
            "clientId": 3,
            "name": "Warehouse B"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let location = request.into_new_location();
        assert_eq!(location.client_id, 3);
        assert_eq!(location.status, LocationStatus::Active);
        assert!(location.latitude.is_none());
    }

    #[test]
    fn test_create_location_request_requires_client() {
        let result: Result<CreateLocationRequest, _> =
            serde_json::from_value(serde_json::json!({ "name": "Orphan Site" }));
        assert!(result.is_err());
    }
}
