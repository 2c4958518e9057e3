//! Client site endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::location::{
    CreateLocationRequest, Location, LocationQuery, UpdateLocationRequest,
};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

/// GET /api/locations?clientId=<id>
pub async fn list_locations(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<Location>>, ApiError> {
    Ok(Json(state.locations().list(&caller, query).await?))
}

pub async fn create_location(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<CreateLocationRequest>,
) -> Result<(StatusCode, Json<Location>), ApiError> {
    let location = state.locations().create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn get_location(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Location>, ApiError> {
    Ok(Json(state.locations().get(&caller, id).await?))
}

pub async fn update_location(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateLocationRequest>,
) -> Result<Json<Location>, ApiError> {
    Ok(Json(state.locations().update(&caller, id, request).await?))
}
