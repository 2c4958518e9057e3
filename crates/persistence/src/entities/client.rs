//! Client entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Client, ClientStatus};
use sqlx::FromRow;

/// Database enum for client_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "client_status", rename_all = "lowercase")]
pub enum ClientStatusDb {
    Active,
    Inactive,
    Pending,
}

impl From<ClientStatusDb> for ClientStatus {
    fn from(db: ClientStatusDb) -> Self {
        match db {
            ClientStatusDb::Active => Self::Active,
            ClientStatusDb::Inactive => Self::Inactive,
            ClientStatusDb::Pending => Self::Pending,
        }
    }
}

impl From<ClientStatus> for ClientStatusDb {
    fn from(status: ClientStatus) -> Self {
        match status {
            ClientStatus::Active => Self::Active,
            ClientStatus::Inactive => Self::Inactive,
            ClientStatus::Pending => Self::Pending,
        }
    }
}

/// Database row mapping for the clients table.
#[derive(Debug, Clone, FromRow)]
pub struct ClientEntity {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub status: ClientStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClientEntity> for Client {
    fn from(entity: ClientEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            address: entity.address,
            contact_person: entity.contact_person,
            contact_phone: entity.contact_phone,
            contact_email: entity.contact_email,
            contract_start: entity.contract_start,
            contract_end: entity.contract_end,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
