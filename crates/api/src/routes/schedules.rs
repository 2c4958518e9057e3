//! Schedule endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::schedule::{
    CreateScheduleRequest, ScheduleQuery, ScheduleView, UpdateScheduleRequest,
};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

/// List schedules.
///
/// GET /api/schedules?date=YYYY-MM-DD
/// GET /api/schedules?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
/// GET /api/schedules?guardId=<id>
pub async fn list_schedules(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleView>>, ApiError> {
    Ok(Json(state.schedules().list(&caller, query).await?))
}

/// Create a schedule. An overlap with another schedule of the same guard is
/// answered 409 with `conflictingScheduleId`.
///
/// POST /api/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleView>), ApiError> {
    let schedule = state.schedules().create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<ScheduleView>, ApiError> {
    Ok(Json(state.schedules().get(&caller, id).await?))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateScheduleRequest>,
) -> Result<Json<ScheduleView>, ApiError> {
    Ok(Json(state.schedules().update(&caller, id, request).await?))
}
