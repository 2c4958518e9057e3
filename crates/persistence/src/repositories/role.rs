//! Role repository for database operations.

use sqlx::PgPool;

use crate::entities::{RoleEntity, RoleNameDb};
use crate::metrics::QueryTimer;

/// Repository for the fixed role set.
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<RoleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_roles");
        let result = sqlx::query_as::<_, RoleEntity>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<RoleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_role_by_id");
        let result = sqlx::query_as::<_, RoleEntity>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_name(&self, name: RoleNameDb) -> Result<Option<RoleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_role_by_name");
        let result =
            sqlx::query_as::<_, RoleEntity>("SELECT id, name FROM roles WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }
}
