//! User administration endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::user::{CreateUserRequest, UpdateUserRequest, UserResponse};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

pub async fn list_users(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    Ok(Json(state.users().list(&caller).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.users().create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.users().get(&caller, id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.users().update(&caller, id, request).await?))
}
