use axum::{http::StatusCode, http::Uri, Json};
use chrono::Utc;
use serde_json::json;

use crate::server::response::ApiResponse;

/// JSON 404 for any unrouted path.
pub async fn not_found_handler(uri: Uri) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(json!({
            "message": format!("Endpoint '{}' does not exist", uri.path()),
            "timestamp": Utc::now(),
        }))),
    )
}
