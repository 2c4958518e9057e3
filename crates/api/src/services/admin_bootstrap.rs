//! Admin bootstrap for initial setup.
//!
//! Creates the configured admin user on startup when no user with that
//! username exists yet. Running it again is a no-op.

use domain::models::role::RoleName;
use domain::models::user::NewUser;
use domain::{StoreError, WorkforceStore};
use shared::password::{hash_password, PasswordError};
use tracing::{info, warn};

use crate::config::AdminBootstrapConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Returns the id of the created user, or `None` when nothing was done.
pub async fn bootstrap_admin(
    store: &dyn WorkforceStore,
    config: &AdminBootstrapConfig,
) -> Result<Option<i64>, BootstrapError> {
    if config.username.is_empty() {
        return Ok(None);
    }

    if config.password.is_empty() {
        warn!("GM__ADMIN__USERNAME is set but GM__ADMIN__PASSWORD is empty - skipping bootstrap");
        return Ok(None);
    }

    if store.find_user_by_username(&config.username).await?.is_some() {
        info!(username = %config.username, "Bootstrap admin already exists - skipping");
        return Ok(None);
    }

    let role = store
        .find_role_by_name(RoleName::Admin)
        .await?
        .ok_or_else(|| BootstrapError::Config("admin role is not seeded".to_string()))?;

    let password_hash = hash_password(&config.password)?;
    let user = store
        .insert_user(NewUser {
            username: config.username.clone(),
            password_hash,
            first_name: Some("System".to_string()),
            last_name: Some("Administrator".to_string()),
            email: None,
            phone: None,
            role_id: role.id,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(Some(user.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::memory_store;
    use shared::password::verify_password;

    fn config(username: &str, password: &str) -> AdminBootstrapConfig {
        AdminBootstrapConfig {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_creates_admin_once() {
        let store = memory_store();
        let cfg = config("root", "BootstrapPass123");

        let id = bootstrap_admin(store.as_ref(), &cfg).await.unwrap();
        assert!(id.is_some());

        let user = store.find_user_by_username("root").await.unwrap().unwrap();
        assert_eq!(user.role_id, 1);
        assert!(verify_password("BootstrapPass123", &user.password_hash).unwrap());

        assert_eq!(bootstrap_admin(store.as_ref(), &cfg).await.unwrap(), None);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skips_when_unconfigured() {
        let store = memory_store();
        assert_eq!(
            bootstrap_admin(store.as_ref(), &config("", "")).await.unwrap(),
            None
        );
        assert_eq!(
            bootstrap_admin(store.as_ref(), &config("root", "")).await.unwrap(),
            None
        );
        assert!(store.list_users().await.unwrap().is_empty());
    }
}
