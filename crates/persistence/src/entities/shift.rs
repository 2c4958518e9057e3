//! Shift template entity (database row mapping).

use chrono::{DateTime, NaiveTime, Utc};
use domain::models::Shift;
use sqlx::FromRow;

/// Database row mapping for the shifts table.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftEntity {
    pub id: i64,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShiftEntity> for Shift {
    fn from(entity: ShiftEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            start_time: entity.start_time,
            end_time: entity.end_time,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
