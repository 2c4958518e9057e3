//! Schedule repository for database operations.
//!
//! Writes run inside a transaction that locks the shift row (shared) and then
//! the guard row, so two concurrent writes for the same guard serialize on the
//! overlap check, and a template retiming waits for them.

use chrono::NaiveDate;
use domain::models::schedule::{NewSchedule, Schedule, ScheduleFilter, SchedulePatch};
use domain::services::{find_conflict, neighbouring_dates, ScheduledWindow, ShiftWindow};
use sqlx::{PgConnection, PgPool};

use crate::entities::{ScheduleEntity, ScheduleStatusDb, ScheduleWindowRow, ShiftEntity};
use crate::metrics::QueryTimer;

/// Outcome of a checked schedule write.
#[derive(Debug)]
pub enum ScheduleWrite {
    Written(ScheduleEntity),
    /// The window overlaps the schedule with this id.
    Conflict(i64),
    /// A referenced guard or shift does not exist.
    MissingReference(&'static str),
    /// The schedule being updated does not exist.
    NotFound,
    /// The guard would change on a schedule that already has attendance.
    HasAttendance,
}

#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a schedule after checking it against the guard's other
    /// non-cancelled schedules.
    pub async fn create_checked(&self, schedule: &NewSchedule) -> Result<ScheduleWrite, sqlx::Error> {
        let timer = QueryTimer::new("create_schedule");
        let mut tx = self.pool.begin().await?;

        if schedule.status.occupies_guard() {
            if let Some(outcome) =
                check_guard_window(&mut *tx, schedule.guard_id, schedule.shift_id, schedule.date, None)
                    .await?
            {
                timer.record();
                return Ok(outcome);
            }
        }

        let row = sqlx::query_as::<_, ScheduleEntity>(
            r#"
            INSERT INTO schedules (guard_id, location_id, shift_id, date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, guard_id, location_id, shift_id, date, status, created_at, updated_at
            "#,
        )
        .bind(schedule.guard_id)
        .bind(schedule.location_id)
        .bind(schedule.shift_id)
        .bind(schedule.date)
        .bind(ScheduleStatusDb::from(schedule.status))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(ScheduleWrite::Written(row))
    }

    /// Apply a patch. The merged schedule is re-checked for overlap, excluding
    /// itself, unless it ends up cancelled.
    pub async fn update_checked(
        &self,
        id: i64,
        patch: &SchedulePatch,
    ) -> Result<ScheduleWrite, sqlx::Error> {
        let timer = QueryTimer::new("update_schedule");
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, ScheduleEntity>(
            r#"
            SELECT id, guard_id, location_id, shift_id, date, status, created_at, updated_at
            FROM schedules
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            timer.record();
            return Ok(ScheduleWrite::NotFound);
        };

        let current = Schedule::from(current);
        let merged = patch.apply_to(&current);

        if merged.guard_id != current.guard_id {
            let attended = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM attendance WHERE schedule_id = $1)",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if attended {
                timer.record();
                return Ok(ScheduleWrite::HasAttendance);
            }
        }

        if merged.status.occupies_guard() {
            if let Some(outcome) =
                check_guard_window(&mut *tx, merged.guard_id, merged.shift_id, merged.date, Some(id))
                    .await?
            {
                timer.record();
                return Ok(outcome);
            }
        }

        let row = sqlx::query_as::<_, ScheduleEntity>(
            r#"
            UPDATE schedules SET
                guard_id = $2,
                location_id = $3,
                shift_id = $4,
                date = $5,
                status = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, guard_id, location_id, shift_id, date, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(merged.guard_id)
        .bind(merged.location_id)
        .bind(merged.shift_id)
        .bind(merged.date)
        .bind(ScheduleStatusDb::from(merged.status))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(ScheduleWrite::Written(row))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_schedule_by_id");
        let result = sqlx::query_as::<_, ScheduleEntity>(
            r#"
            SELECT id, guard_id, location_id, shift_id, date, status, created_at, updated_at
            FROM schedules
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(&self, filter: ScheduleFilter) -> Result<Vec<ScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_schedules");
        let result = match filter {
            ScheduleFilter::Date(date) => {
                sqlx::query_as::<_, ScheduleEntity>(
                    r#"
                    SELECT id, guard_id, location_id, shift_id, date, status, created_at, updated_at
                    FROM schedules
                    WHERE date = $1
                    ORDER BY date, id
                    "#,
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await
            }
            ScheduleFilter::Range { start, end } => {
                sqlx::query_as::<_, ScheduleEntity>(
                    r#"
                    SELECT id, guard_id, location_id, shift_id, date, status, created_at, updated_at
                    FROM schedules
                    WHERE date BETWEEN $1 AND $2
                    ORDER BY date, id
                    "#,
                )
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await
            }
            ScheduleFilter::Guard(guard_id) => {
                sqlx::query_as::<_, ScheduleEntity>(
                    r#"
                    SELECT id, guard_id, location_id, shift_id, date, status, created_at, updated_at
                    FROM schedules
                    WHERE guard_id = $1
                    ORDER BY date, id
                    "#,
                )
                .bind(guard_id)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }
}

/// Locks the shift (shared) and then the guard, loads the guard's neighbouring
/// schedules, and reports why the write must not proceed, if anything.
///
/// Shift updates take the same locks in the same order.
async fn check_guard_window(
    conn: &mut PgConnection,
    guard_id: i64,
    shift_id: i64,
    date: NaiveDate,
    exclude_id: Option<i64>,
) -> Result<Option<ScheduleWrite>, sqlx::Error> {
    let shift = sqlx::query_as::<_, ShiftEntity>(
        "SELECT id, name, start_time, end_time, created_at, updated_at FROM shifts WHERE id = $1 FOR SHARE",
    )
    .bind(shift_id)
    .fetch_optional(&mut *conn)
    .await?;

    let guard = sqlx::query_scalar::<_, i64>("SELECT id FROM guards WHERE id = $1 FOR UPDATE")
        .bind(guard_id)
        .fetch_optional(&mut *conn)
        .await?;
    if guard.is_none() {
        return Ok(Some(ScheduleWrite::MissingReference("Guard")));
    }

    let Some(shift) = shift else {
        return Ok(Some(ScheduleWrite::MissingReference("Shift")));
    };

    let dates = neighbouring_dates(date);
    let first = dates.first().copied().unwrap_or(date);
    let last = dates.last().copied().unwrap_or(date);

    let existing = sqlx::query_as::<_, ScheduleWindowRow>(
        r#"
        SELECT s.id, s.date, sh.start_time, sh.end_time
        FROM schedules s
        JOIN shifts sh ON sh.id = s.shift_id
        WHERE s.guard_id = $1
          AND s.date BETWEEN $2 AND $3
          AND s.status <> 'cancelled'
          AND ($4::BIGINT IS NULL OR s.id <> $4)
        ORDER BY s.id
        "#,
    )
    .bind(guard_id)
    .bind(first)
    .bind(last)
    .bind(exclude_id)
    .fetch_all(&mut *conn)
    .await?;

    let candidate = ShiftWindow::new(date, shift.start_time, shift.end_time);
    let conflict = find_conflict(&candidate, existing.into_iter().map(ScheduledWindow::from));

    Ok(conflict.map(ScheduleWrite::Conflict))
}
