//! Attendance entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Attendance, AttendanceStatus};
use sqlx::FromRow;

/// Database enum for attendance_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
pub enum AttendanceStatusDb {
    OnTime,
    Late,
    Absent,
}

impl From<AttendanceStatusDb> for AttendanceStatus {
    fn from(db: AttendanceStatusDb) -> Self {
        match db {
            AttendanceStatusDb::OnTime => Self::OnTime,
            AttendanceStatusDb::Late => Self::Late,
            AttendanceStatusDb::Absent => Self::Absent,
        }
    }
}

impl From<AttendanceStatus> for AttendanceStatusDb {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::OnTime => Self::OnTime,
            AttendanceStatus::Late => Self::Late,
            AttendanceStatus::Absent => Self::Absent,
        }
    }
}

/// Database row mapping for the attendance table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceEntity {
    pub id: i64,
    pub guard_id: i64,
    pub schedule_id: Option<i64>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: AttendanceStatusDb,
    pub comments: Option<String>,
    pub location_latitude: Option<f64>,
    pub location_longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AttendanceEntity> for Attendance {
    fn from(entity: AttendanceEntity) -> Self {
        Self {
            id: entity.id,
            guard_id: entity.guard_id,
            schedule_id: entity.schedule_id,
            check_in_time: entity.check_in_time,
            check_out_time: entity.check_out_time,
            status: entity.status.into(),
            comments: entity.comments,
            location_latitude: entity.location_latitude,
            location_longitude: entity.location_longitude,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
