use axum::{extract::State, http::StatusCode, Json};
use domain::models::incident::{CreateIncidentCategoryRequest, IncidentCategory};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

pub async fn list_categories(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<IncidentCategory>>, ApiError> {
    Ok(Json(state.incident_categories().list(&caller).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<CreateIncidentCategoryRequest>,
) -> Result<(StatusCode, Json<IncidentCategory>), ApiError> {
    let category = state.incident_categories().create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
