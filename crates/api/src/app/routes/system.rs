use axum::http::StatusCode;
use axum::response::Response;

use crate::app::errors::json_error;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Router fallback, so unmatched paths still get the error envelope.
pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not found")
}
