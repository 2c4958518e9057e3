//! Incident repository for database operations.

use domain::models::incident::{IncidentFilter, IncidentPatch, NewIncident};
use sqlx::PgPool;

use crate::entities::{IncidentEntity, IncidentPhotoEntity, IncidentPriorityDb, IncidentStatusDb};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the incident and its photo rows in one transaction.
    pub async fn create_with_photos(
        &self,
        incident: &NewIncident,
        photo_urls: &[String],
    ) -> Result<(IncidentEntity, Vec<IncidentPhotoEntity>), sqlx::Error> {
        let timer = QueryTimer::new("create_incident_with_photos");
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, IncidentEntity>(
            r#"
            INSERT INTO incidents (reported_by, location_id, category_id, title, description,
                                   date, status, priority, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, reported_by, location_id, category_id, title, description, date,
                      status, priority, latitude, longitude, created_at, updated_at
            "#,
        )
        .bind(incident.reported_by)
        .bind(incident.location_id)
        .bind(incident.category_id)
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.date)
        .bind(IncidentStatusDb::from(incident.status))
        .bind(IncidentPriorityDb::from(incident.priority))
        .bind(incident.latitude)
        .bind(incident.longitude)
        .fetch_one(&mut *tx)
        .await?;

        let mut photos = Vec::with_capacity(photo_urls.len());
        for url in photo_urls {
            let photo = sqlx::query_as::<_, IncidentPhotoEntity>(
                r#"
                INSERT INTO incident_photos (incident_id, photo_url)
                VALUES ($1, $2)
                RETURNING id, incident_id, photo_url, created_at
                "#,
            )
            .bind(row.id)
            .bind(url)
            .fetch_one(&mut *tx)
            .await?;
            photos.push(photo);
        }

        tx.commit().await?;
        timer.record();
        Ok((row, photos))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<IncidentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_incident_by_id");
        let result = sqlx::query_as::<_, IncidentEntity>(
            r#"
            SELECT id, reported_by, location_id, category_id, title, description, date,
                   status, priority, latitude, longitude, created_at, updated_at
            FROM incidents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List incidents newest first.
    pub async fn list(&self, filter: IncidentFilter) -> Result<Vec<IncidentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_incidents");
        let (reported_by, location_id, status) = match filter {
            IncidentFilter::All => (None, None, None),
            IncidentFilter::ReportedBy(id) => (Some(id), None, None),
            IncidentFilter::Location(id) => (None, Some(id), None),
            IncidentFilter::Status(status) => (None, None, Some(IncidentStatusDb::from(status))),
        };
        let result = sqlx::query_as::<_, IncidentEntity>(
            r#"
            SELECT id, reported_by, location_id, category_id, title, description, date,
                   status, priority, latitude, longitude, created_at, updated_at
            FROM incidents
            WHERE ($1::BIGINT IS NULL OR reported_by = $1)
              AND ($2::BIGINT IS NULL OR location_id = $2)
              AND ($3::incident_status IS NULL OR status = $3)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(reported_by)
        .bind(location_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The most recently created incidents.
    pub async fn recent(&self, limit: i64) -> Result<Vec<IncidentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("recent_incidents");
        let result = sqlx::query_as::<_, IncidentEntity>(
            r#"
            SELECT id, reported_by, location_id, category_id, title, description, date,
                   status, priority, latitude, longitude, created_at, updated_at
            FROM incidents
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. With `expected_status` set, the row is only
    /// written while it still has that status, and `None` comes back otherwise.
    pub async fn update(
        &self,
        id: i64,
        patch: &IncidentPatch,
    ) -> Result<Option<IncidentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_incident");
        let result = sqlx::query_as::<_, IncidentEntity>(
            r#"
            UPDATE incidents SET
                location_id = COALESCE($2, location_id),
                category_id = COALESCE($3, category_id),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                status = COALESCE($6, status),
                priority = COALESCE($7, priority),
                updated_at = NOW()
            WHERE id = $1
              AND ($8::incident_status IS NULL OR status = $8)
            RETURNING id, reported_by, location_id, category_id, title, description, date,
                      status, priority, latitude, longitude, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.location_id)
        .bind(patch.category_id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.status.map(IncidentStatusDb::from))
        .bind(patch.priority.map(IncidentPriorityDb::from))
        .bind(patch.expected_status.map(IncidentStatusDb::from))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn photos(&self, incident_id: i64) -> Result<Vec<IncidentPhotoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_incident_photos");
        let result = sqlx::query_as::<_, IncidentPhotoEntity>(
            r#"
            SELECT id, incident_id, photo_url, created_at
            FROM incident_photos
            WHERE incident_id = $1
            ORDER BY id
            "#,
        )
        .bind(incident_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
