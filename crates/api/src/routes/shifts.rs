use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::shift::{CreateShiftRequest, Shift, UpdateShiftRequest};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

pub async fn list_shifts(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Shift>>, ApiError> {
    Ok(Json(state.shifts().list(&caller).await?))
}

pub async fn create_shift(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<CreateShiftRequest>,
) -> Result<(StatusCode, Json<Shift>), ApiError> {
    let shift = state.shifts().create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

pub async fn get_shift(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Shift>, ApiError> {
    Ok(Json(state.shifts().get(&caller, id).await?))
}

pub async fn update_shift(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateShiftRequest>,
) -> Result<Json<Shift>, ApiError> {
    Ok(Json(state.shifts().update(&caller, id, request).await?))
}
