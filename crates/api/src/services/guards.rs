//! Guard profiles and their user accounts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domain::models::guard::{CreateGuardRequest, Guard, GuardResponse, NewGuard, UpdateGuardRequest};
use domain::models::role::RoleName;
use domain::models::user::{NewUser, UserSummary};
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};
use shared::password::hash_password;
use validator::Validate;

use super::hash_error;

pub struct GuardService {
    store: Arc<dyn WorkforceStore>,
}

impl GuardService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    /// Creates the guard's user account (role fixed to `guard`) and profile in
    /// one atomic store operation.
    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateGuardRequest,
    ) -> Result<GuardResponse, DomainError> {
        authorize(caller, Resource::Guard, Action::Create)?;
        request.validate()?;

        let role = self
            .store
            .find_role_by_name(RoleName::Guard)
            .await?
            .ok_or_else(|| DomainError::Internal("Guard role is not seeded".to_string()))?;

        let password_hash = hash_password(&request.password).map_err(hash_error)?;

        let new_user = NewUser {
            username: request.username,
            password_hash,
            first_name: Some(request.first_name),
            last_name: Some(request.last_name),
            email: request.email,
            phone: request.phone,
            role_id: role.id,
        };
        let new_guard = NewGuard {
            guard_code: request.guard_code,
            national_id: request.national_id,
            date_of_birth: request.date_of_birth,
            address: request.address,
            emergency_contact: request.emergency_contact,
            join_date: request.join_date.unwrap_or_else(|| Utc::now().date_naive()),
            position: request.position,
            status: request.status.unwrap_or_default(),
            performance: request.performance.unwrap_or(0.0),
        };

        let (user, guard) = self.store.insert_guard_with_user(new_user, new_guard).await?;

        tracing::info!(
            guard_id = guard.id,
            user_id = user.id,
            guard_code = %guard.guard_code,
            "Guard created"
        );
        Ok(GuardResponse {
            guard,
            user: Some(UserSummary::from(&user)),
        })
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<GuardResponse, DomainError> {
        authorize(caller, Resource::Guard, Action::Read)?;
        let guard = self
            .store
            .find_guard(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Guard"))?;
        self.respond(guard).await
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<GuardResponse>, DomainError> {
        authorize(caller, Resource::Guard, Action::Read)?;

        let users: HashMap<i64, UserSummary> = self
            .store
            .list_users()
            .await?
            .iter()
            .map(|user| (user.id, UserSummary::from(user)))
            .collect();

        Ok(self
            .store
            .list_guards()
            .await?
            .into_iter()
            .map(|guard| GuardResponse {
                user: users.get(&guard.user_id).cloned(),
                guard,
            })
            .collect())
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: UpdateGuardRequest,
    ) -> Result<GuardResponse, DomainError> {
        authorize(caller, Resource::Guard, Action::Update)?;
        request.validate()?;

        let guard = self.store.update_guard(id, request.into()).await?;
        tracing::info!(guard_id = guard.id, updated_by = caller.user_id, "Guard updated");
        self.respond(guard).await
    }

    async fn respond(&self, guard: Guard) -> Result<GuardResponse, DomainError> {
        let user = self.store.find_user(guard.user_id).await?;
        Ok(GuardResponse {
            user: user.as_ref().map(UserSummary::from),
            guard,
        })
    }
}
