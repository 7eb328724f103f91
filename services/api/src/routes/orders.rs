//! Order placement and management handlers

use auth::{Principal, extract::AppJson};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{OrderStatus, StatusUpdate},
    orders::OrderDraft,
    state::AppState,
    uploads::UploadedFile,
};

/// Multipart field carrying the payment screenshot
const PROOF_FIELD: &str = "paymentScreenshot";

/// Place an order (multipart: text fields plus `paymentScreenshot`)
pub async fn create_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let mut multipart = multipart.map_err(|e| ApiError::Validation(e.body_text()))?;

    let mut draft = OrderDraft::default();
    let mut proof = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == PROOF_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            proof = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await?;
            draft.set(&name, value);
        }
    }

    let order = state
        .orders
        .create_order(principal.id, draft, proof)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Orders owned by the caller
pub async fn list_my_orders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<impl IntoResponse> {
    let orders = state.orders.list_orders_for(principal.id).await?;
    Ok(Json(orders))
}

/// Every order with its owner
pub async fn list_all_orders(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let orders = state.orders.list_all_orders().await?;
    Ok(Json(orders))
}

/// Move an order through its lifecycle
pub async fn set_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<StatusUpdate>,
) -> ApiResult<impl IntoResponse> {
    let next = payload
        .status
        .trim()
        .parse::<OrderStatus>()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let order = state.orders.set_status(id, next).await?;
    Ok(Json(order))
}
