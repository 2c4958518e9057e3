//! Incident, incident category and incident photo domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use super::location::LocationSummary;
use super::user::UserSummary;

/// Incident lifecycle state. Transitions are linear: see
/// [`crate::services::incident_lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    Open,
    Investigating,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Closed => "closed",
        }
    }

    /// The single state reachable from this one without an override.
    pub fn next(&self) -> Option<IncidentStatus> {
        match self {
            IncidentStatus::Open => Some(IncidentStatus::Investigating),
            IncidentStatus::Investigating => Some(IncidentStatus::Resolved),
            IncidentStatus::Resolved => Some(IncidentStatus::Closed),
            IncidentStatus::Closed => None,
        }
    }

    /// Open and investigating incidents mark a site on the dashboard map.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, IncidentStatus::Open | IncidentStatus::Investigating)
    }
}

impl FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(IncidentStatus::Open),
            "investigating" => Ok(IncidentStatus::Investigating),
            "resolved" => Ok(IncidentStatus::Resolved),
            "closed" => Ok(IncidentStatus::Closed),
            _ => Err(format!("Unknown incident status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl IncidentPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentPriority::Low => "low",
            IncidentPriority::Medium => "medium",
            IncidentPriority::High => "high",
            IncidentPriority::Critical => "critical",
        }
    }
}

impl FromStr for IncidentPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(IncidentPriority::Low),
            "medium" => Ok(IncidentPriority::Medium),
            "high" => Ok(IncidentPriority::High),
            "critical" => Ok(IncidentPriority::Critical),
            _ => Err(format!("Unknown incident priority: {}", s)),
        }
    }
}

/// Default priority attached to an incident category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl CategoryPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryPriority::Low => "low",
            CategoryPriority::Medium => "medium",
            CategoryPriority::High => "high",
        }
    }
}

impl FromStr for CategoryPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(CategoryPriority::Low),
            "medium" => Ok(CategoryPriority::Medium),
            "high" => Ok(CategoryPriority::High),
            _ => Err(format!("Unknown category priority: {}", s)),
        }
    }
}

impl From<CategoryPriority> for IncidentPriority {
    fn from(priority: CategoryPriority) -> Self {
        match priority {
            CategoryPriority::Low => IncidentPriority::Low,
            CategoryPriority::Medium => IncidentPriority::Medium,
            CategoryPriority::High => IncidentPriority::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub priority: CategoryPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub priority: CategoryPriority,
}

impl From<&IncidentCategory> for CategorySummary {
    fn from(category: &IncidentCategory) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            priority: category.priority,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewIncidentCategory {
    pub name: String,
    pub description: Option<String>,
    pub priority: CategoryPriority,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentCategoryRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description is too long"))]
    pub description: Option<String>,

    pub priority: Option<CategoryPriority>,
}

impl From<CreateIncidentCategoryRequest> for NewIncidentCategory {
    fn from(request: CreateIncidentCategoryRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            priority: request.priority.unwrap_or_default(),
        }
    }
}

/// An incident reported by a user, optionally at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: i64,
    pub reported_by: i64,
    pub location_id: Option<i64>,
    pub category_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: IncidentStatus,
    pub priority: IncidentPriority,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentPhoto {
    pub id: i64,
    pub incident_id: i64,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

/// Incident enriched with reporter, location, category and photos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentView {
    #[serde(flatten)]
    pub incident: Incident,
    pub reporter: Option<UserSummary>,
    pub location: Option<LocationSummary>,
    pub category: Option<CategorySummary>,
    pub photos: Vec<IncidentPhoto>,
}

#[derive(Debug, Clone)]
pub struct NewIncident {
    pub reported_by: i64,
    pub location_id: Option<i64>,
    pub category_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: IncidentStatus,
    pub priority: IncidentPriority,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct IncidentPatch {
    pub location_id: Option<i64>,
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<IncidentStatus>,
    pub priority: Option<IncidentPriority>,
    /// The patch applies only while the incident still has this status.
    pub expected_status: Option<IncidentStatus>,
}

/// Incident fields of a report. Any reporter in the submitted form is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 5000, message = "Description must be at least 10 characters"))]
    pub description: String,

    pub location_id: Option<i64>,

    pub category_id: Option<i64>,

    pub date: Option<DateTime<Utc>>,

    pub priority: Option<IncidentPriority>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,
}

/// Request payload for updating an incident.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,

    pub location_id: Option<i64>,

    pub category_id: Option<i64>,

    pub status: Option<IncidentStatus>,

    pub priority: Option<IncidentPriority>,
}

impl From<UpdateIncidentRequest> for IncidentPatch {
    fn from(request: UpdateIncidentRequest) -> Self {
        Self {
            location_id: request.location_id,
            category_id: request.category_id,
            title: request.title,
            description: request.description,
            status: request.status,
            priority: request.priority,
            expected_status: None,
        }
    }
}

/// One uploaded photo, before it is stored.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Query parameters for listing incidents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentQuery {
    pub reported_by: Option<i64>,
    pub location_id: Option<i64>,
    pub status: Option<IncidentStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentFilter {
    All,
    ReportedBy(i64),
    Location(i64),
    Status(IncidentStatus),
}

impl From<IncidentQuery> for IncidentFilter {
    /// The first filter present wins, in the order reporter, location, status.
    fn from(query: IncidentQuery) -> Self {
        if let Some(user_id) = query.reported_by {
            IncidentFilter::ReportedBy(user_id)
        } else if let Some(location_id) = query.location_id {
            IncidentFilter::Location(location_id)
        } else if let Some(status) = query.status {
            IncidentFilter::Status(status)
        } else {
            IncidentFilter::All
        }
    }
}
