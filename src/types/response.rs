//! Response helpers shared by handlers.

use axum::{http::StatusCode, response::IntoResponse};

/// No content response helper (DRY - common pattern for DELETE endpoints)
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
