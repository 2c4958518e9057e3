use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::attendance::{
    Attendance, AttendanceQuery, CreateAttendanceRequest, UpdateAttendanceRequest,
};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

/// GET /api/attendance?guardId=<id> or ?scheduleId=<id>
pub async fn list_attendance(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<Attendance>>, ApiError> {
    Ok(Json(state.attendance().list(&caller, query).await?))
}

pub async fn create_attendance(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<Attendance>), ApiError> {
    let attendance = state.attendance().create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(attendance)))
}

pub async fn get_attendance(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Attendance>, ApiError> {
    Ok(Json(state.attendance().get(&caller, id).await?))
}

pub async fn update_attendance(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateAttendanceRequest>,
) -> Result<Json<Attendance>, ApiError> {
    Ok(Json(state.attendance().update(&caller, id, request).await?))
}
