//! Incident endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::incident::{IncidentQuery, IncidentView, UpdateIncidentRequest};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, IncidentForm};

/// GET /api/incidents?reportedBy=<id>|locationId=<id>|status=<status>
pub async fn list_incidents(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<IncidentQuery>,
) -> Result<Json<Vec<IncidentView>>, ApiError> {
    Ok(Json(state.incidents().list(&caller, query).await?))
}

/// File a report. Accepts `multipart/form-data` with up to the configured
/// number of `photos` files, or a JSON body without photos. The reporter is
/// always the caller.
///
/// POST /api/incidents
pub async fn create_incident(
    State(state): State<AppState>,
    caller: Caller,
    form: IncidentForm,
) -> Result<(StatusCode, Json<IncidentView>), ApiError> {
    let incident = state
        .incidents()
        .create(&caller, form.request, form.photos)
        .await?;
    Ok((StatusCode::CREATED, Json(incident)))
}

pub async fn get_incident(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<IncidentView>, ApiError> {
    Ok(Json(state.incidents().get(&caller, id).await?))
}

pub async fn update_incident(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateIncidentRequest>,
) -> Result<Json<IncidentView>, ApiError> {
    Ok(Json(state.incidents().update(&caller, id, request).await?))
}
