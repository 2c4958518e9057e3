//! Dashboard endpoints.
//!
//! All views are derived on request. List views take `?limit=`, clamped to
//! 1..=50 with a per-view default.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::dashboard::{
    ActivityItem, DashboardQuery, DashboardStats, LocationSnapshot, StaffPerformance,
    UpcomingShift,
};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.dashboard().stats(&caller).await?))
}

/// GET /api/dashboard/activities
pub async fn activities(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<ActivityItem>>, ApiError> {
    Ok(Json(state.dashboard().activities(&caller, query).await?))
}

/// GET /api/dashboard/performance
pub async fn performance(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<StaffPerformance>>, ApiError> {
    Ok(Json(state.dashboard().performance(&caller, query).await?))
}

/// GET /api/dashboard/shifts
pub async fn upcoming_shifts(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<UpcomingShift>>, ApiError> {
    Ok(Json(state.dashboard().upcoming_shifts(&caller, query).await?))
}

/// GET /api/dashboard/map
pub async fn map(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<LocationSnapshot>>, ApiError> {
    Ok(Json(state.dashboard().map(&caller, query).await?))
}
