use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejections (missing body, wrong content type, malformed
/// JSON) come back as `ApiError` bodies instead of plain text.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
