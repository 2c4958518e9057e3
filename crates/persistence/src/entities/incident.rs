//! Incident, incident category and incident photo entities.

use chrono::{DateTime, Utc};
use domain::models::incident::CategoryPriority;
use domain::models::{Incident, IncidentCategory, IncidentPhoto, IncidentPriority, IncidentStatus};
use sqlx::FromRow;

/// Database enum for incident_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "incident_status", rename_all = "lowercase")]
pub enum IncidentStatusDb {
    Open,
    Investigating,
    Resolved,
    Closed,
}

impl From<IncidentStatusDb> for IncidentStatus {
    fn from(db: IncidentStatusDb) -> Self {
        match db {
            IncidentStatusDb::Open => Self::Open,
            IncidentStatusDb::Investigating => Self::Investigating,
            IncidentStatusDb::Resolved => Self::Resolved,
            IncidentStatusDb::Closed => Self::Closed,
        }
    }
}

impl From<IncidentStatus> for IncidentStatusDb {
    fn from(status: IncidentStatus) -> Self {
        match status {
            IncidentStatus::Open => Self::Open,
            IncidentStatus::Investigating => Self::Investigating,
            IncidentStatus::Resolved => Self::Resolved,
            IncidentStatus::Closed => Self::Closed,
        }
    }
}

/// Database enum for incident_priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "incident_priority", rename_all = "lowercase")]
pub enum IncidentPriorityDb {
    Low,
    Medium,
    High,
    Critical,
}

impl From<IncidentPriorityDb> for IncidentPriority {
    fn from(db: IncidentPriorityDb) -> Self {
        match db {
            IncidentPriorityDb::Low => Self::Low,
            IncidentPriorityDb::Medium => Self::Medium,
            IncidentPriorityDb::High => Self::High,
            IncidentPriorityDb::Critical => Self::Critical,
        }
    }
}

impl From<IncidentPriority> for IncidentPriorityDb {
    fn from(priority: IncidentPriority) -> Self {
        match priority {
            IncidentPriority::Low => Self::Low,
            IncidentPriority::Medium => Self::Medium,
            IncidentPriority::High => Self::High,
            IncidentPriority::Critical => Self::Critical,
        }
    }
}

/// Database enum for category_priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "category_priority", rename_all = "lowercase")]
pub enum CategoryPriorityDb {
    Low,
    Medium,
    High,
}

impl From<CategoryPriorityDb> for CategoryPriority {
    fn from(db: CategoryPriorityDb) -> Self {
        match db {
            CategoryPriorityDb::Low => Self::Low,
            CategoryPriorityDb::Medium => Self::Medium,
            CategoryPriorityDb::High => Self::High,
        }
    }
}

impl From<CategoryPriority> for CategoryPriorityDb {
    fn from(priority: CategoryPriority) -> Self {
        match priority {
            CategoryPriority::Low => Self::Low,
            CategoryPriority::Medium => Self::Medium,
            CategoryPriority::High => Self::High,
        }
    }
}

/// Database row mapping for the incident_categories table.
#[derive(Debug, Clone, FromRow)]
pub struct IncidentCategoryEntity {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub priority: CategoryPriorityDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IncidentCategoryEntity> for IncidentCategory {
    fn from(entity: IncidentCategoryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            priority: entity.priority.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the incidents table.
#[derive(Debug, Clone, FromRow)]
pub struct IncidentEntity {
    pub id: i64,
    pub reported_by: i64,
    pub location_id: Option<i64>,
    pub category_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: IncidentStatusDb,
    pub priority: IncidentPriorityDb,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<IncidentEntity> for Incident {
    fn from(entity: IncidentEntity) -> Self {
        Self {
            id: entity.id,
            reported_by: entity.reported_by,
            location_id: entity.location_id,
            category_id: entity.category_id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            status: entity.status.into(),
            priority: entity.priority.into(),
            latitude: entity.latitude,
            longitude: entity.longitude,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the incident_photos table.
#[derive(Debug, Clone, FromRow)]
pub struct IncidentPhotoEntity {
    pub id: i64,
    pub incident_id: i64,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<IncidentPhotoEntity> for IncidentPhoto {
    fn from(entity: IncidentPhotoEntity) -> Self {
        Self {
            id: entity.id,
            incident_id: entity.incident_id,
            photo_url: entity.photo_url,
            created_at: entity.created_at,
        }
    }
}
