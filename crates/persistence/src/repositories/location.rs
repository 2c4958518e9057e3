//! Location repository for database operations.

use domain::models::location::{LocationPatch, NewLocation};
use sqlx::PgPool;

use crate::entities::{LocationEntity, LocationStatusDb};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, location: &NewLocation) -> Result<LocationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_location");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            INSERT INTO locations (client_id, name, address, latitude, longitude, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, client_id, name, address, latitude, longitude, status,
                      created_at, updated_at
            "#,
        )
        .bind(location.client_id)
        .bind(&location.name)
        .bind(&location.address)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(LocationStatusDb::from(location.status))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<LocationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_location_by_id");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            SELECT id, client_id, name, address, latitude, longitude, status,
                   created_at, updated_at
            FROM locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List locations, optionally only those of one client.
    pub async fn list(&self, client_id: Option<i64>) -> Result<Vec<LocationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_locations");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            SELECT id, client_id, name, address, latitude, longitude, status,
                   created_at, updated_at
            FROM locations
            WHERE ($1::BIGINT IS NULL OR client_id = $1)
            ORDER BY id
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &LocationPatch,
    ) -> Result<Option<LocationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_location");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            UPDATE locations SET
                client_id = COALESCE($2, client_id),
                name = COALESCE($3, name),
                address = COALESCE($4, address),
                latitude = COALESCE($5, latitude),
                longitude = COALESCE($6, longitude),
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, client_id, name, address, latitude, longitude, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.client_id)
        .bind(&patch.name)
        .bind(&patch.address)
        .bind(patch.latitude)
        .bind(patch.longitude)
        .bind(patch.status.map(LocationStatusDb::from))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
