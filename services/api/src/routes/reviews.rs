//! Review handlers

use auth::extract::AppJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{ReviewApproval, ReviewSubmission},
    state::AppState,
};

/// Approved reviews for the public site
pub async fn list_approved_reviews(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reviews.list(true).await?))
}

/// All reviews, approved or not
pub async fn list_all_reviews(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.reviews.list(false).await?))
}

/// Submit a review. It stays hidden until approved.
pub async fn submit_review(
    State(state): State<AppState>,
    AppJson(submission): AppJson<ReviewSubmission>,
) -> ApiResult<impl IntoResponse> {
    let review = submission.validate().map_err(ApiError::Validation)?;
    let review = state.reviews.create(review).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn moderate_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(approval): AppJson<ReviewApproval>,
) -> ApiResult<impl IntoResponse> {
    let approved = approval
        .is_approved
        .ok_or_else(|| ApiError::Validation("isApproved is required".to_string()))?;

    let review = state
        .reviews
        .set_approved(id, approved)
        .await?
        .ok_or(ApiError::NotFound("Review not found"))?;

    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.reviews.delete(id).await? {
        return Err(ApiError::NotFound("Review not found"));
    }
    Ok(Json(json!({ "message": "Review deleted" })))
}
