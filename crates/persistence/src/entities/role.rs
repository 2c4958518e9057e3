//! Role entity (database row mapping).

use domain::models::{Role, RoleName};
use sqlx::FromRow;

/// Database enum for role_name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "role_name", rename_all = "snake_case")]
pub enum RoleNameDb {
    Admin,
    ChiefOfStaff,
    TeamLeader,
    Guard,
}

impl From<RoleNameDb> for RoleName {
    fn from(db: RoleNameDb) -> Self {
        match db {
            RoleNameDb::Admin => Self::Admin,
            RoleNameDb::ChiefOfStaff => Self::ChiefOfStaff,
            RoleNameDb::TeamLeader => Self::TeamLeader,
            RoleNameDb::Guard => Self::Guard,
        }
    }
}

impl From<RoleName> for RoleNameDb {
    fn from(name: RoleName) -> Self {
        match name {
            RoleName::Admin => Self::Admin,
            RoleName::ChiefOfStaff => Self::ChiefOfStaff,
            RoleName::TeamLeader => Self::TeamLeader,
            RoleName::Guard => Self::Guard,
        }
    }
}

/// Database row mapping for the roles table.
#[derive(Debug, Clone, FromRow)]
pub struct RoleEntity {
    pub id: i64,
    pub name: RoleNameDb,
}

impl From<RoleEntity> for Role {
    fn from(entity: RoleEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.into(),
        }
    }
}
