//! Shift template repository for database operations.

use domain::models::shift::{NewShift, ShiftPatch};
use domain::services::{retimed_shift_conflict, BookedShift};
use sqlx::PgPool;

use crate::entities::{BookedShiftRow, ShiftEntity};
use crate::metrics::QueryTimer;

/// Outcome of a checked shift update.
#[derive(Debug)]
pub enum ShiftWrite {
    Written(ShiftEntity),
    /// The new times would make this schedule overlap another of its guard's.
    Conflict(i64),
    NotFound,
}

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, shift: &NewShift) -> Result<ShiftEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_shift");
        let result = sqlx::query_as::<_, ShiftEntity>(
            r#"
            INSERT INTO shifts (name, start_time, end_time)
            VALUES ($1, $2, $3)
            RETURNING id, name, start_time, end_time, created_at, updated_at
            "#,
        )
        .bind(&shift.name)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ShiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_shift_by_id");
        let result = sqlx::query_as::<_, ShiftEntity>(
            "SELECT id, name, start_time, end_time, created_at, updated_at FROM shifts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(&self) -> Result<Vec<ShiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_shifts");
        let result = sqlx::query_as::<_, ShiftEntity>(
            "SELECT id, name, start_time, end_time, created_at, updated_at FROM shifts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update inside a transaction.
    ///
    /// The template row is locked first, then every guard with a committed
    /// schedule on it. When the times change, each of those guards' committed
    /// schedules is re-checked with the new times.
    pub async fn update_checked(&self, id: i64, patch: &ShiftPatch) -> Result<ShiftWrite, sqlx::Error> {
        let timer = QueryTimer::new("update_shift");
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, ShiftEntity>(
            "SELECT id, name, start_time, end_time, created_at, updated_at FROM shifts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current) = current else {
            timer.record();
            return Ok(ShiftWrite::NotFound);
        };

        let start_time = patch.start_time.unwrap_or(current.start_time);
        let end_time = patch.end_time.unwrap_or(current.end_time);
        if (start_time, end_time) != (current.start_time, current.end_time) {
            let guard_ids = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT g.id
                FROM guards g
                WHERE g.id IN (
                    SELECT guard_id FROM schedules
                    WHERE shift_id = $1 AND status <> 'cancelled'
                )
                ORDER BY g.id
                FOR UPDATE
                "#,
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

            if !guard_ids.is_empty() {
                let booked = sqlx::query_as::<_, BookedShiftRow>(
                    r#"
                    SELECT s.id, s.guard_id, s.shift_id, s.date, sh.start_time, sh.end_time
                    FROM schedules s
                    JOIN shifts sh ON sh.id = s.shift_id
                    WHERE s.guard_id = ANY($1)
                      AND s.status <> 'cancelled'
                    ORDER BY s.id
                    "#,
                )
                .bind(&guard_ids)
                .fetch_all(&mut *tx)
                .await?;

                let booked: Vec<BookedShift> = booked.into_iter().map(Into::into).collect();
                if let Some(conflict) = retimed_shift_conflict(id, start_time, end_time, &booked) {
                    timer.record();
                    return Ok(ShiftWrite::Conflict(conflict));
                }
            }
        }

        let row = sqlx::query_as::<_, ShiftEntity>(
            r#"
            UPDATE shifts SET
                name = COALESCE($2, name),
                start_time = $3,
                end_time = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, start_time, end_time, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(ShiftWrite::Written(row))
    }
}
