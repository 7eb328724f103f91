//! Liveness and storage check

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (storage, healthy) = match &state.db_pool {
        Some(pool) => match common::database::health_check(pool).await {
            Ok(ok) => ("postgres", ok),
            Err(e) => {
                error!("Database health check failed: {}", e);
                ("postgres", false)
            }
        },
        None => ("memory", true),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "degraded" },
            "service": "api-service",
            "storage": storage,
        })),
    )
}
