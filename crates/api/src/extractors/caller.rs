//! Authenticated caller extractor.
//!
//! Validates the bearer token, then re-reads the user and its role from the
//! store so deactivation and role changes take effect on the next request.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use domain::models::{RoleName, User};
use domain::services::Caller;
use domain::{DomainError, WorkforceStore};
use shared::jwt::{extract_user_id, JwtConfig};

use crate::app::AppState;
use crate::error::ApiError;

/// Returns the token of a `Bearer` authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated user behind a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller {
    pub caller: Caller,
    pub user: User,
}

/// Resolves a raw token into the caller it identifies.
pub async fn authenticate(
    jwt: &JwtConfig,
    store: &dyn WorkforceStore,
    token: &str,
) -> Result<AuthenticatedCaller, DomainError> {
    let claims = jwt.validate_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        DomainError::Authentication("Invalid or expired token".to_string())
    })?;

    let user_id = extract_user_id(&claims)
        .map_err(|_| DomainError::Authentication("Invalid token subject".to_string()))?;

    let user = store
        .find_user(user_id)
        .await?
        .filter(|user| user.active)
        .ok_or_else(|| {
            tracing::debug!(user_id, "Token for unknown or inactive user");
            DomainError::Authentication("User not found or inactive".to_string())
        })?;

    let role = resolve_role(store, user.role_id).await?;

    Ok(AuthenticatedCaller {
        caller: Caller::new(user.id, role),
        user,
    })
}

async fn resolve_role(store: &dyn WorkforceStore, role_id: i64) -> Result<RoleName, DomainError> {
    store
        .find_role(role_id)
        .await?
        .map(|role| role.name)
        .ok_or_else(|| DomainError::Authentication("User has no valid role".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<AuthenticatedCaller>() {
            return Ok(cached.clone());
        }

        let token = bearer_token(&parts.headers).ok_or_else(|| {
            ApiError::Unauthorized("Missing or malformed Authorization header".to_string())
        })?;

        let authenticated = authenticate(&state.jwt, state.store.as_ref(), token).await?;
        parts.extensions.insert(authenticated.clone());
        Ok(authenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthenticatedCaller::from_request_parts(parts, state)
            .await
            .map(|authenticated| authenticated.caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use domain::models::user::NewUser;
    use domain::models::user::UserPatch;
    use persistence::MemoryStore;

    const SECRET: &str = "test_secret_key_for_jwt_testing_1234567890";

    fn jwt() -> JwtConfig {
        JwtConfig::from_secret(SECRET, 3600, 0).unwrap()
    }

    async fn seed_user(store: &MemoryStore, role_id: i64) -> User {
        store
            .insert_user(NewUser {
                username: "caller".to_string(),
                password_hash: "$argon2id$stub".to_string(),
                first_name: None,
                last_name: None,
                email: None,
                phone: None,
                role_id,
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_role_from_store() {
        let store = MemoryStore::new();
        let user = seed_user(&store, 3).await;
        let token = jwt().generate_token(user.id, Some(1)).unwrap().token;

        let authenticated = authenticate(&jwt(), &store, &token).await.unwrap();
        assert_eq!(authenticated.caller.user_id, user.id);
        // The role id in the token is ignored in favour of the stored one.
        assert_eq!(authenticated.caller.role, RoleName::TeamLeader);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_inactive_user() {
        let store = MemoryStore::new();
        let user = seed_user(&store, 1).await;
        store
            .update_user(
                user.id,
                UserPatch {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let token = jwt().generate_token(user.id, Some(1)).unwrap().token;

        let err = authenticate(&jwt(), &store, &token).await.unwrap_err();
        assert!(matches!(err, DomainError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_user_and_bad_token() {
        let store = MemoryStore::new();
        let token = jwt().generate_token(999, None).unwrap().token;
        assert!(matches!(
            authenticate(&jwt(), &store, &token).await,
            Err(DomainError::Authentication(_))
        ));
        assert!(matches!(
            authenticate(&jwt(), &store, "not-a-token").await,
            Err(DomainError::Authentication(_))
        ));
    }
}
