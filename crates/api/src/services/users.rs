//! User administration.

use std::collections::HashMap;
use std::sync::Arc;

use domain::models::role::RoleName;
use domain::models::user::{
    CreateUserRequest, NewUser, UpdateUserRequest, User, UserPatch, UserResponse,
};
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};
use shared::password::hash_password;
use validator::Validate;

use super::hash_error;

pub struct UserService {
    store: Arc<dyn WorkforceStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateUserRequest,
    ) -> Result<UserResponse, DomainError> {
        authorize(caller, Resource::User, Action::Create)?;
        request.validate()?;

        let password_hash = hash_password(&request.password).map_err(hash_error)?;
        let user = self
            .store
            .insert_user(NewUser {
                username: request.username,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone: request.phone,
                role_id: request.role_id,
            })
            .await?;

        tracing::info!(user_id = user.id, created_by = caller.user_id, "User created");
        self.respond(&user).await
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<UserResponse, DomainError> {
        authorize(caller, Resource::User, Action::Read)?;
        let user = self
            .store
            .find_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))?;
        self.respond(&user).await
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<UserResponse>, DomainError> {
        authorize(caller, Resource::User, Action::Read)?;

        let roles: HashMap<i64, RoleName> = self
            .store
            .list_roles()
            .await?
            .into_iter()
            .map(|role| (role.id, role.name))
            .collect();

        Ok(self
            .store
            .list_users()
            .await?
            .iter()
            .map(|user| UserResponse::from_user(user, roles.get(&user.role_id).copied()))
            .collect())
    }

    /// Partial update. The username is immutable; a new password is re-hashed.
    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, DomainError> {
        authorize(caller, Resource::User, Action::Update)?;
        if request.username.is_some() {
            return Err(DomainError::validation("Username cannot be changed"));
        }
        request.validate()?;

        let password_hash = request
            .password
            .as_deref()
            .map(hash_password)
            .transpose()
            .map_err(hash_error)?;

        let user = self
            .store
            .update_user(
                id,
                UserPatch {
                    password_hash,
                    first_name: request.first_name,
                    last_name: request.last_name,
                    email: request.email,
                    phone: request.phone,
                    role_id: request.role_id,
                    active: request.active,
                },
            )
            .await?;

        tracing::info!(user_id = user.id, updated_by = caller.user_id, "User updated");
        self.respond(&user).await
    }

    pub(crate) async fn respond(&self, user: &User) -> Result<UserResponse, DomainError> {
        let role = self.store.find_role(user.role_id).await?.map(|r| r.name);
        Ok(UserResponse::from_user(user, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, caller, memory_store};

    fn request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            password: "secret123".to_string(),
            first_name: Some("Chief".to_string()),
            last_name: Some("Officer".to_string()),
            email: Some("chief@example.com".to_string()),
            phone: None,
            role_id: 2,
        }
    }

    #[tokio::test]
    async fn test_admin_creates_user_without_exposing_hash() {
        let service = UserService::new(memory_store());
        let created = service.create(&admin(), request("chief")).await.unwrap();

        assert_eq!(created.username, "chief");
        assert_eq!(created.role, Some(RoleName::ChiefOfStaff));

        let json = serde_json::to_value(&created).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[tokio::test]
    async fn test_only_admin_creates_users() {
        let service = UserService::new(memory_store());
        let err = service
            .create(&caller(RoleName::ChiefOfStaff), request("someone"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let service = UserService::new(memory_store());
        service.create(&admin(), request("twin")).await.unwrap();
        let err = service.create(&admin(), request("twin")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_short_username_and_password_rejected() {
        let service = UserService::new(memory_store());
        let mut bad = request("ab");
        bad.password = "123".to_string();
        let err = service.create(&admin(), bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_role_is_not_found() {
        let service = UserService::new(memory_store());
        let mut bad = request("norole");
        bad.role_id = 99;
        let err = service.create(&admin(), bad).await.unwrap_err();
        assert_eq!(err, DomainError::NotFound("Role".to_string()));
    }

    #[tokio::test]
    async fn test_username_is_immutable() {
        let service = UserService::new(memory_store());
        let created = service.create(&admin(), request("fixed")).await.unwrap();

        let err = service
            .update(
                &admin(),
                created.id,
                UpdateUserRequest {
                    username: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rehashes_password_and_deactivates() {
        let store = memory_store();
        let service = UserService::new(store.clone());
        let created = service.create(&admin(), request("mover")).await.unwrap();
        let before = store.find_user(created.id).await.unwrap().unwrap();

        let updated = service
            .update(
                &admin(),
                created.id,
                UpdateUserRequest {
                    password: Some("another-secret".to_string()),
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.active);

        let after = store.find_user(created.id).await.unwrap().unwrap();
        assert_ne!(before.password_hash, after.password_hash);
        assert!(shared::password::verify_password("another-secret", &after.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_chief_of_staff_reads_but_team_leader_does_not() {
        let service = UserService::new(memory_store());
        service.create(&admin(), request("listed")).await.unwrap();

        let users = service.list(&caller(RoleName::ChiefOfStaff)).await.unwrap();
        assert!(users.iter().any(|u| u.username == "listed"));

        assert!(matches!(
            service.list(&caller(RoleName::TeamLeader)).await,
            Err(DomainError::Authorization(_))
        ));
    }
}
