//! Contact form handlers

use auth::extract::AppJson;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::ContactSubmission,
    state::AppState,
};

pub async fn submit_message(
    State(state): State<AppState>,
    AppJson(submission): AppJson<ContactSubmission>,
) -> ApiResult<impl IntoResponse> {
    let message = submission.validate().map_err(ApiError::Validation)?;
    let message = state.contacts.create(message).await?;

    info!("Contact message {} received", message.id);
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.contacts.list().await?))
}
