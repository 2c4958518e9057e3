//! Aggregate queries behind the dashboard views.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::entities::{DashboardCountsRow, LocationFactsRow, StaffFactsRow, UpcomingShiftRow};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn counts(&self) -> Result<DashboardCountsRow, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_counts");
        let result = sqlx::query_as::<_, DashboardCountsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM guards) AS total_guards,
                (SELECT COUNT(*) FROM clients WHERE status = 'active') AS active_clients,
                (SELECT COUNT(*) FROM incidents WHERE status = 'open') AS open_incidents,
                (SELECT COUNT(*) FROM attendance) AS attendance_total,
                (SELECT COUNT(*) FROM attendance WHERE status = 'on_time') AS attendance_on_time
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Guards joined with their user, ordered by guard id.
    pub async fn staff_facts(&self, limit: i64) -> Result<Vec<StaffFactsRow>, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_staff_facts");
        let result = sqlx::query_as::<_, StaffFactsRow>(
            r#"
            SELECT
                g.id, g.user_id, g.guard_code, g.national_id, g.date_of_birth, g.address,
                g.emergency_contact, g.join_date, g.position, g.status, g.performance,
                g.created_at, g.updated_at,
                u.first_name, u.last_name, u.username,
                (
                    SELECT l.name FROM schedules s
                    JOIN locations l ON l.id = s.location_id
                    WHERE s.guard_id = g.id
                    ORDER BY s.date DESC, s.id DESC
                    LIMIT 1
                ) AS last_location,
                (SELECT COUNT(*) FROM attendance a WHERE a.guard_id = g.id) AS attendance_total,
                (
                    SELECT COUNT(*) FROM attendance a
                    WHERE a.guard_id = g.id AND a.status = 'on_time'
                ) AS attendance_on_time,
                (SELECT COUNT(*) FROM incidents i WHERE i.reported_by = g.user_id) AS incidents_reported
            FROM guards g
            JOIN users u ON u.id = g.user_id
            ORDER BY g.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn upcoming_shifts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: i64,
    ) -> Result<Vec<UpcomingShiftRow>, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_upcoming_shifts");
        let result = sqlx::query_as::<_, UpcomingShiftRow>(
            r#"
            SELECT
                s.id AS schedule_id, s.date,
                l.name AS location_name,
                sh.name AS shift_name, sh.start_time, sh.end_time,
                u.first_name, u.last_name, u.username
            FROM schedules s
            JOIN locations l ON l.id = s.location_id
            JOIN shifts sh ON sh.id = s.shift_id
            JOIN guards g ON g.id = s.guard_id
            JOIN users u ON u.id = g.user_id
            WHERE s.date BETWEEN $1 AND $2
              AND s.status <> 'cancelled'
            ORDER BY s.date, sh.start_time, s.id
            LIMIT $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active locations with coordinates plus today's status flags.
    pub async fn location_facts(
        &self,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<LocationFactsRow>, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_location_facts");
        let result = sqlx::query_as::<_, LocationFactsRow>(
            r#"
            SELECT
                l.id AS location_id, l.name, l.latitude, l.longitude,
                EXISTS (
                    SELECT 1 FROM incidents i
                    WHERE i.location_id = l.id AND i.status IN ('open', 'investigating')
                ) AS has_unresolved_incident,
                EXISTS (
                    SELECT 1 FROM attendance a
                    JOIN schedules s ON s.id = a.schedule_id
                    WHERE s.location_id = l.id AND s.date = $1 AND a.status IN ('late', 'absent')
                ) AS has_late_check_in,
                on_site.first_name AS guard_first_name,
                on_site.last_name AS guard_last_name,
                on_site.username AS guard_username
            FROM locations l
            LEFT JOIN LATERAL (
                SELECT u.first_name, u.last_name, u.username
                FROM schedules s
                JOIN guards g ON g.id = s.guard_id
                JOIN users u ON u.id = g.user_id
                WHERE s.location_id = l.id AND s.date = $1 AND s.status <> 'cancelled'
                ORDER BY s.id
                LIMIT 1
            ) on_site ON TRUE
            WHERE l.status = 'active'
              AND l.latitude IS NOT NULL
              AND l.longitude IS NOT NULL
            ORDER BY l.id
            LIMIT $2
            "#,
        )
        .bind(today)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
