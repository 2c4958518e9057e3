//! Incident category repository for database operations.

use domain::models::incident::NewIncidentCategory;
use sqlx::PgPool;

use crate::entities::{CategoryPriorityDb, IncidentCategoryEntity};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct IncidentCategoryRepository {
    pool: PgPool,
}

impl IncidentCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        category: &NewIncidentCategory,
    ) -> Result<IncidentCategoryEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_incident_category");
        let result = sqlx::query_as::<_, IncidentCategoryEntity>(
            r#"
            INSERT INTO incident_categories (name, description, priority)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, priority, created_at, updated_at
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(CategoryPriorityDb::from(category.priority))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<IncidentCategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_incident_category_by_id");
        let result = sqlx::query_as::<_, IncidentCategoryEntity>(
            r#"
            SELECT id, name, description, priority, created_at, updated_at
            FROM incident_categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(&self) -> Result<Vec<IncidentCategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_incident_categories");
        let result = sqlx::query_as::<_, IncidentCategoryEntity>(
            r#"
            SELECT id, name, description, priority, created_at, updated_at
            FROM incident_categories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
