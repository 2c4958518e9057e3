//! Schedule entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::{Schedule, ScheduleStatus};
use domain::services::{BookedShift, ScheduledWindow};
use sqlx::FromRow;

/// Database enum for schedule_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "schedule_status", rename_all = "lowercase")]
pub enum ScheduleStatusDb {
    Scheduled,
    Completed,
    Missed,
    Cancelled,
}

impl From<ScheduleStatusDb> for ScheduleStatus {
    fn from(db: ScheduleStatusDb) -> Self {
        match db {
            ScheduleStatusDb::Scheduled => Self::Scheduled,
            ScheduleStatusDb::Completed => Self::Completed,
            ScheduleStatusDb::Missed => Self::Missed,
            ScheduleStatusDb::Cancelled => Self::Cancelled,
        }
    }
}

impl From<ScheduleStatus> for ScheduleStatusDb {
    fn from(status: ScheduleStatus) -> Self {
        match status {
            ScheduleStatus::Scheduled => Self::Scheduled,
            ScheduleStatus::Completed => Self::Completed,
            ScheduleStatus::Missed => Self::Missed,
            ScheduleStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Database row mapping for the schedules table.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleEntity {
    pub id: i64,
    pub guard_id: i64,
    pub location_id: i64,
    pub shift_id: i64,
    pub date: NaiveDate,
    pub status: ScheduleStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScheduleEntity> for Schedule {
    fn from(entity: ScheduleEntity) -> Self {
        Self {
            id: entity.id,
            guard_id: entity.guard_id,
            location_id: entity.location_id,
            shift_id: entity.shift_id,
            date: entity.date,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// A guard's existing schedule joined with its shift times, loaded for the
/// overlap check.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleWindowRow {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<ScheduleWindowRow> for ScheduledWindow {
    fn from(row: ScheduleWindowRow) -> Self {
        ScheduledWindow::new(row.id, row.date, row.start_time, row.end_time)
    }
}

/// A committed schedule with its current shift times, loaded when a shift
/// template is retimed.
#[derive(Debug, Clone, FromRow)]
pub struct BookedShiftRow {
    pub id: i64,
    pub guard_id: i64,
    pub shift_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<BookedShiftRow> for BookedShift {
    fn from(row: BookedShiftRow) -> Self {
        BookedShift {
            schedule_id: row.id,
            guard_id: row.guard_id,
            shift_id: row.shift_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_status_conversion() {
        for status in [
            ScheduleStatus::Scheduled,
            ScheduleStatus::Completed,
            ScheduleStatus::Missed,
            ScheduleStatus::Cancelled,
        ] {
            let db: ScheduleStatusDb = status.into();
            assert_eq!(ScheduleStatus::from(db), status);
        }
    }

    #[test]
    fn test_window_row_wraps_overnight() {
        let row = ScheduleWindowRow {
            id: 7,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        };
        let window: ScheduledWindow = row.into();
        assert_eq!(window.schedule_id, 7);
        assert_eq!(
            window.window.end.date(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }
}
