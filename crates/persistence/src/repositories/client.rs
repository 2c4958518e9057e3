//! Client repository for database operations.

use domain::models::client::{ClientPatch, NewClient};
use sqlx::PgPool;

use crate::entities::{ClientEntity, ClientStatusDb};
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, client: &NewClient) -> Result<ClientEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            INSERT INTO clients (name, address, contact_person, contact_phone, contact_email,
                                 contract_start, contract_end, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, address, contact_person, contact_phone, contact_email,
                      contract_start, contract_end, status, created_at, updated_at
            "#,
        )
        .bind(&client.name)
        .bind(&client.address)
        .bind(&client.contact_person)
        .bind(&client.contact_phone)
        .bind(&client.contact_email)
        .bind(client.contract_start)
        .bind(client.contract_end)
        .bind(ClientStatusDb::from(client.status))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_client_by_id");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            SELECT id, name, address, contact_person, contact_phone, contact_email,
                   contract_start, contract_end, status, created_at, updated_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list(&self) -> Result<Vec<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_clients");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            SELECT id, name, address, contact_person, contact_phone, contact_email,
                   contract_start, contract_end, status, created_at, updated_at
            FROM clients
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(&self, id: i64, patch: &ClientPatch) -> Result<Option<ClientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_client");
        let result = sqlx::query_as::<_, ClientEntity>(
            r#"
            UPDATE clients SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                contact_person = COALESCE($4, contact_person),
                contact_phone = COALESCE($5, contact_phone),
                contact_email = COALESCE($6, contact_email),
                contract_start = COALESCE($7, contract_start),
                contract_end = COALESCE($8, contract_end),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, address, contact_person, contact_phone, contact_email,
                      contract_start, contract_end, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.address)
        .bind(&patch.contact_person)
        .bind(&patch.contact_phone)
        .bind(&patch.contact_email)
        .bind(patch.contract_start)
        .bind(patch.contract_end)
        .bind(patch.status.map(ClientStatusDb::from))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
