//! Guard repository for database operations.

use domain::models::guard::{GuardPatch, NewGuard};
use domain::models::user::NewUser;
use sqlx::PgPool;

use crate::entities::{GuardEntity, GuardStatusDb, UserEntity};
use crate::metrics::QueryTimer;

/// Repository for guard profile operations.
#[derive(Clone)]
pub struct GuardRepository {
    pool: PgPool,
}

impl GuardRepository {
    /// Creates a new GuardRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the user account and guard profile in one transaction.
    pub async fn create_with_user(
        &self,
        user: &NewUser,
        guard: &NewGuard,
    ) -> Result<(UserEntity, GuardEntity), sqlx::Error> {
        let timer = QueryTimer::new("create_guard_with_user");

        let mut tx = self.pool.begin().await?;

        let user_row = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, email, phone, role_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, password_hash, first_name, last_name, email, phone,
                      role_id, active, last_login, created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.role_id)
        .fetch_one(&mut *tx)
        .await?;

        let guard_row = sqlx::query_as::<_, GuardEntity>(
            r#"
            INSERT INTO guards (user_id, guard_code, national_id, date_of_birth, address,
                                emergency_contact, join_date, position, status, performance)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, guard_code, national_id, date_of_birth, address,
                      emergency_contact, join_date, position, status, performance,
                      created_at, updated_at
            "#,
        )
        .bind(user_row.id)
        .bind(&guard.guard_code)
        .bind(&guard.national_id)
        .bind(guard.date_of_birth)
        .bind(&guard.address)
        .bind(&guard.emergency_contact)
        .bind(guard.join_date)
        .bind(&guard.position)
        .bind(GuardStatusDb::from(guard.status))
        .bind(guard.performance)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok((user_row, guard_row))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<GuardEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_guard_by_id");
        let result = sqlx::query_as::<_, GuardEntity>(
            r#"
            SELECT id, user_id, guard_code, national_id, date_of_birth, address,
                   emergency_contact, join_date, position, status, performance,
                   created_at, updated_at
            FROM guards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_user_id(&self, user_id: i64) -> Result<Option<GuardEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_guard_by_user_id");
        let result = sqlx::query_as::<_, GuardEntity>(
            r#"
            SELECT id, user_id, guard_code, national_id, date_of_birth, address,
                   emergency_contact, join_date, position, status, performance,
                   created_at, updated_at
            FROM guards
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(&self) -> Result<Vec<GuardEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_guards");
        let result = sqlx::query_as::<_, GuardEntity>(
            r#"
            SELECT id, user_id, guard_code, national_id, date_of_birth, address,
                   emergency_contact, join_date, position, status, performance,
                   created_at, updated_at
            FROM guards
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Returns `None` when the guard does not exist.
    pub async fn update(&self, id: i64, patch: &GuardPatch) -> Result<Option<GuardEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_guard");
        let result = sqlx::query_as::<_, GuardEntity>(
            r#"
            UPDATE guards SET
                guard_code = COALESCE($2, guard_code),
                national_id = COALESCE($3, national_id),
                date_of_birth = COALESCE($4, date_of_birth),
                address = COALESCE($5, address),
                emergency_contact = COALESCE($6, emergency_contact),
                position = COALESCE($7, position),
                status = COALESCE($8, status),
                performance = COALESCE($9, performance),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, guard_code, national_id, date_of_birth, address,
                      emergency_contact, join_date, position, status, performance,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.guard_code)
        .bind(&patch.national_id)
        .bind(patch.date_of_birth)
        .bind(&patch.address)
        .bind(&patch.emergency_contact)
        .bind(&patch.position)
        .bind(patch.status.map(GuardStatusDb::from))
        .bind(patch.performance)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
