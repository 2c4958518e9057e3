//! Attendance repository for database operations.

use domain::models::attendance::{AttendanceFilter, AttendancePatch, NewAttendance};
use sqlx::PgPool;

use crate::entities::{AttendanceEntity, AttendanceStatusDb};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a record. A referenced schedule is share-locked and must belong
    /// to the same guard; `None` comes back when it does not.
    pub async fn create(
        &self,
        attendance: &NewAttendance,
    ) -> Result<Option<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("create_attendance");
        let mut tx = self.pool.begin().await?;

        if let Some(schedule_id) = attendance.schedule_id {
            let owner = sqlx::query_scalar::<_, i64>(
                "SELECT guard_id FROM schedules WHERE id = $1 FOR SHARE",
            )
            .bind(schedule_id)
            .fetch_optional(&mut *tx)
            .await?;
            // A missing schedule is left to the foreign key.
            if owner.is_some_and(|guard_id| guard_id != attendance.guard_id) {
                timer.record();
                return Ok(None);
            }
        }

        let row = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            INSERT INTO attendance (guard_id, schedule_id, check_in_time, check_out_time, status,
                                    comments, location_latitude, location_longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, guard_id, schedule_id, check_in_time, check_out_time, status, comments,
                      location_latitude, location_longitude, created_at, updated_at
            "#,
        )
        .bind(attendance.guard_id)
        .bind(attendance.schedule_id)
        .bind(attendance.check_in_time)
        .bind(attendance.check_out_time)
        .bind(AttendanceStatusDb::from(attendance.status))
        .bind(&attendance.comments)
        .bind(attendance.location_latitude)
        .bind(attendance.location_longitude)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(row))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_attendance_by_id");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            SELECT id, guard_id, schedule_id, check_in_time, check_out_time, status, comments,
                   location_latitude, location_longitude, created_at, updated_at
            FROM attendance
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(&self, filter: AttendanceFilter) -> Result<Vec<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_attendance");
        let (guard_id, schedule_id) = match filter {
            AttendanceFilter::All => (None, None),
            AttendanceFilter::Guard(id) => (Some(id), None),
            AttendanceFilter::Schedule(id) => (None, Some(id)),
        };
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            SELECT id, guard_id, schedule_id, check_in_time, check_out_time, status, comments,
                   location_latitude, location_longitude, created_at, updated_at
            FROM attendance
            WHERE ($1::BIGINT IS NULL OR guard_id = $1)
              AND ($2::BIGINT IS NULL OR schedule_id = $2)
            ORDER BY id
            "#,
        )
        .bind(guard_id)
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &AttendancePatch,
    ) -> Result<Option<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_attendance");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            UPDATE attendance SET
                check_in_time = COALESCE($2, check_in_time),
                check_out_time = COALESCE($3, check_out_time),
                status = COALESCE($4, status),
                comments = COALESCE($5, comments),
                location_latitude = COALESCE($6, location_latitude),
                location_longitude = COALESCE($7, location_longitude),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, guard_id, schedule_id, check_in_time, check_out_time, status, comments,
                      location_latitude, location_longitude, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.check_in_time)
        .bind(patch.check_out_time)
        .bind(patch.status.map(AttendanceStatusDb::from))
        .bind(&patch.comments)
        .bind(patch.location_latitude)
        .bind(patch.location_longitude)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
