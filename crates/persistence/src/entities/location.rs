//! Location entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Location, LocationStatus};
use sqlx::FromRow;

/// Database enum for location_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "location_status", rename_all = "lowercase")]
pub enum LocationStatusDb {
    Active,
    Inactive,
}

impl From<LocationStatusDb> for LocationStatus {
    fn from(db: LocationStatusDb) -> Self {
        match db {
            LocationStatusDb::Active => Self::Active,
            LocationStatusDb::Inactive => Self::Inactive,
        }
    }
}

impl From<LocationStatus> for LocationStatusDb {
    fn from(status: LocationStatus) -> Self {
        match status {
            LocationStatus::Active => Self::Active,
            LocationStatus::Inactive => Self::Inactive,
        }
    }
}

/// Database row mapping for the locations table.
#[derive(Debug, Clone, FromRow)]
pub struct LocationEntity {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: LocationStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocationEntity> for Location {
    fn from(entity: LocationEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            name: entity.name,
            address: entity.address,
            latitude: entity.latitude,
            longitude: entity.longitude,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
