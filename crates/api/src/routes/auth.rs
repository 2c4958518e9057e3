//! Login and current-user endpoints.

use axum::{extract::State, Json};
use domain::models::user::{LoginRequest, LoginResponse, UserResponse};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthenticatedCaller};

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(state.auth().login(request).await?))
}

/// GET /api/auth/user
pub async fn current_user(
    State(state): State<AppState>,
    authenticated: AuthenticatedCaller,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.auth().profile(&authenticated.user).await?))
}
