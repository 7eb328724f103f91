//! Service catalog handlers

use auth::extract::AppJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::ServiceDefinition,
    state::AppState,
};

/// Public catalog
pub async fn list_services(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.services.list().await?))
}

pub async fn create_service(
    State(state): State<AppState>,
    AppJson(definition): AppJson<ServiceDefinition>,
) -> ApiResult<impl IntoResponse> {
    let service = definition.validate().map_err(ApiError::Validation)?;
    let service = state.services.create(service).await?;

    info!("Created service {} ({})", service.id, service.title);
    Ok((StatusCode::CREATED, Json(service)))
}

/// Replace a service definition
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(definition): AppJson<ServiceDefinition>,
) -> ApiResult<impl IntoResponse> {
    let service = definition.validate().map_err(ApiError::Validation)?;
    let service = state
        .services
        .update(id, service)
        .await?
        .ok_or(ApiError::NotFound("Service not found"))?;

    Ok(Json(service))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.services.delete(id).await? {
        return Err(ApiError::NotFound("Service not found"));
    }

    info!("Deleted service {}", id);
    Ok(Json(json!({ "message": "Service deleted" })))
}
