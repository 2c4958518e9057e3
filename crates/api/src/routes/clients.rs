use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::client::{Client, ClientDetail, CreateClientRequest, UpdateClientRequest};
use domain::services::Caller;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

pub async fn list_clients(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.clients().list(&caller).await?))
}

pub async fn create_client(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(request): ApiJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let client = state.clients().create(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/clients/:id, with the client's locations embedded.
pub async fn get_client(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<ClientDetail>, ApiError> {
    Ok(Json(state.clients().get(&caller, id).await?))
}

pub async fn update_client(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    Ok(Json(state.clients().update(&caller, id, request).await?))
}
