//! Login and session identity.

use std::sync::Arc;

use chrono::Utc;
use domain::models::user::{LoginRequest, LoginResponse, User, UserResponse};
use domain::{DomainError, WorkforceStore};
use shared::jwt::JwtConfig;
use shared::password::verify_password;
use validator::Validate;

use crate::middleware::metrics::record_login;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService {
    store: Arc<dyn WorkforceStore>,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(store: Arc<dyn WorkforceStore>, jwt: Arc<JwtConfig>) -> Self {
        Self { store, jwt }
    }

    /// Verifies credentials, stamps the last login and issues a token.
    ///
    /// Unknown users, wrong passwords and deactivated accounts all fail with
    /// the same message.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, DomainError> {
        request.validate()?;

        let user = match self.verify_credentials(&request).await {
            Ok(user) => user,
            Err(err) => {
                record_login(false);
                return Err(err);
            }
        };

        let now = Utc::now();
        self.store.record_login(user.id, now).await?;

        let issued = self
            .jwt
            .generate_token(user.id, Some(user.role_id))
            .map_err(|e| DomainError::Internal(format!("Failed to issue token: {}", e)))?;

        record_login(true);
        tracing::info!(user_id = user.id, jti = %issued.jti, "User logged in");

        let user = User {
            last_login: Some(now),
            ..user
        };
        Ok(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user: self.profile(&user).await?,
        })
    }

    async fn verify_credentials(&self, request: &LoginRequest) -> Result<User, DomainError> {
        let Some(user) = self.store.find_user_by_username(&request.username).await? else {
            tracing::debug!(username = %request.username, "Login for unknown user");
            return Err(DomainError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        let matches = verify_password(&request.password, &user.password_hash).map_err(|e| {
            DomainError::Internal(format!("Stored hash for user {} unusable: {}", user.id, e))
        })?;

        if !matches {
            tracing::debug!(user_id = user.id, "Login with wrong password");
            return Err(DomainError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        if !user.active {
            tracing::debug!(user_id = user.id, "Login for inactive user");
            return Err(DomainError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    /// Profile of the authenticated user, with the role name resolved.
    pub async fn profile(&self, user: &User) -> Result<UserResponse, DomainError> {
        let role = self.store.find_role(user.role_id).await?.map(|r| r.name);
        Ok(UserResponse::from_user(user, role))
    }
}
