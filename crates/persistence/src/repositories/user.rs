//! User repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::user::{NewUser, UserPatch};
use sqlx::PgPool;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user account operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user account.
    pub async fn create(&self, user: &NewUser) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
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
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, email, phone,
                   role_id, active, last_login, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Usernames are matched exactly.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, email, phone,
                   role_id, active, last_login, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, email, phone,
                   role_id, active, last_login, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Returns `None` when the user does not exist.
    pub async fn update(&self, id: i64, patch: &UserPatch) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users SET
                password_hash = COALESCE($2, password_hash),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                role_id = COALESCE($7, role_id),
                active = COALESCE($8, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, first_name, last_name, email, phone,
                      role_id, active, last_login, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.password_hash)
        .bind(&patch.first_name)
        .bind(&patch.last_name)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(patch.role_id)
        .bind(patch.active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Stamp the last successful login. Returns the number of rows touched.
    pub async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("record_user_login");
        let result = sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }
}
