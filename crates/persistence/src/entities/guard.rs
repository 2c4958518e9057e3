//! Guard entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Guard, GuardStatus};
use sqlx::FromRow;

/// Database enum for guard_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "guard_status", rename_all = "snake_case")]
pub enum GuardStatusDb {
    Active,
    Inactive,
    OnLeave,
}

impl From<GuardStatusDb> for GuardStatus {
    fn from(db: GuardStatusDb) -> Self {
        match db {
            GuardStatusDb::Active => Self::Active,
            GuardStatusDb::Inactive => Self::Inactive,
            GuardStatusDb::OnLeave => Self::OnLeave,
        }
    }
}

impl From<GuardStatus> for GuardStatusDb {
    fn from(status: GuardStatus) -> Self {
        match status {
            GuardStatus::Active => Self::Active,
            GuardStatus::Inactive => Self::Inactive,
            GuardStatus::OnLeave => Self::OnLeave,
        }
    }
}

/// Database row mapping for the guards table.
#[derive(Debug, Clone, FromRow)]
pub struct GuardEntity {
    pub id: i64,
    pub user_id: i64,
    pub guard_code: String,
    pub national_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub join_date: NaiveDate,
    pub position: String,
    pub status: GuardStatusDb,
    pub performance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GuardEntity> for Guard {
    fn from(entity: GuardEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            guard_code: entity.guard_code,
            national_id: entity.national_id,
            date_of_birth: entity.date_of_birth,
            address: entity.address,
            emergency_contact: entity.emergency_contact,
            join_date: entity.join_date,
            position: entity.position,
            status: entity.status.into(),
            performance: entity.performance,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
