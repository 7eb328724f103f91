//! Request extractors

use axum::extract::FromRequest;

use crate::error::AuthError;

/// `Json` whose rejections are reported as validation errors in the
/// service's error body format
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct AppJson<T>(pub T);
