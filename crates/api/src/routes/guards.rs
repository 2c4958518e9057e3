//! Guard endpoints. Creating a guard also creates its user account.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::guard::{CreateGuardRequest, GuardResponse, UpdateGuardRequest};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

pub async fn list_guards(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<GuardResponse>>, ApiError> {
    Ok(Json(state.guards().list(&caller).await?))
}

/// POST /api/guards
pub async fn create_guard(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<CreateGuardRequest>,
) -> Result<(StatusCode, Json<GuardResponse>), ApiError> {
    let guard = state.guards().create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(guard)))
}

pub async fn get_guard(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<GuardResponse>, ApiError> {
    Ok(Json(state.guards().get(&caller, id).await?))
}

pub async fn update_guard(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateGuardRequest>,
) -> Result<Json<GuardResponse>, ApiError> {
    Ok(Json(state.guards().update(&caller, id, request).await?))
}
